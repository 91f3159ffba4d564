//! A small DOM-like element tree owned by the host.
//!
//! [`Document`] is an arena of elements linked by parent / child / sibling
//! handles.  It carries just enough of the browser element model for keyboard
//! navigation: attributes (including `tabindex`), text and labels, a single
//! active (focused) element with an optional caret, and the `dir` attribute
//! for bidi queries.
//!
//! # Example
//!
//! ```
//! use rove_core::dom::{Document, Element, FocusPosition};
//!
//! let mut doc = Document::new(Element::new("div").with_tab_index(0));
//! let root = doc.root();
//! let save = doc.append(root, Element::new("button").with_label("Save")).unwrap();
//!
//! assert_eq!(doc.first_child(root), Some(save));
//! assert!(doc.focus(save, FocusPosition::Start));
//! assert_eq!(doc.active_element(), Some(save));
//! ```

use std::collections::BTreeMap;

const INPUT_TYPES: &[&str] = &[
    "button",
    "checkbox",
    "color",
    "date",
    "datetime-local",
    "email",
    "file",
    "hidden",
    "image",
    "month",
    "number",
    "password",
    "radio",
    "range",
    "reset",
    "search",
    "submit",
    "tel",
    "text",
    "time",
    "url",
    "week",
];

/// Handle to an element inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Arena index of this node.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Where the caret lands when a text entry receives focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusPosition {
    /// Caret at the beginning of the value.
    #[default]
    Start,
    /// Caret after the last character of the value.
    End,
}

/// Errors returned by tree mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// The handle was not issued by this document.
    #[error("node {0:?} does not belong to this document")]
    UnknownNode(NodeId),
    /// The node was destroyed and can no longer be inserted or used as a parent.
    #[error("node {0:?} has been destroyed")]
    Destroyed(NodeId),
    /// The node must be removed from its current parent first.
    #[error("node {0:?} already has a parent")]
    AlreadyAttached(NodeId),
    /// The insertion would make a node its own ancestor.
    #[error("inserting {child:?} under {parent:?} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },
    /// The reference node for `insert_before` is not a child of the parent.
    #[error("{reference:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, reference: NodeId },
}

/// Tags that can take focus without an explicit `tabindex`.
const NATIVELY_FOCUSABLE: [&str; 5] = ["a", "button", "input", "select", "textarea"];

/// Element payload: tag, attributes, text, and accessibility label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: BTreeMap<String, String>,
    text: String,
    label: Option<String>,
    focus_node: Option<NodeId>,
}

impl Element {
    /// Create an element with the given tag name (stored lower-case).
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            text: String::new(),
            label: None,
            focus_node: None,
        }
    }

    /// Set an attribute. Names are stored lower-case.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Set the `tabindex` attribute.
    pub fn with_tab_index(self, tab_index: i32) -> Self {
        self.with_attribute("tabindex", tab_index.to_string())
    }

    /// Set the element's own text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the accessible label used by keyboard search.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The lower-case tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

#[derive(Debug)]
struct Node {
    element: Element,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
    destroyed: bool,
}

impl Node {
    fn new(element: Element) -> Self {
        Self {
            element,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            destroyed: false,
        }
    }
}

/// Arena-backed element tree with a single focus owner.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    active: Option<NodeId>,
    caret: Option<usize>,
}

impl Document {
    /// Create a document whose root is `root`.
    pub fn new(root: Element) -> Self {
        Self {
            nodes: vec![Node::new(root)],
            root: NodeId(0),
            active: None,
            caret: None,
        }
    }

    /// The root element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    fn live(&self, id: NodeId) -> Result<&Node, DomError> {
        match self.node(id) {
            None => Err(DomError::UnknownNode(id)),
            Some(node) if node.destroyed => Err(DomError::Destroyed(id)),
            Some(node) => Ok(node),
        }
    }

    // ── Tree construction ───────────────────────────────────────────────

    /// Create a detached element. Attach it with [`append_child`](Self::append_child).
    pub fn create_element(&mut self, element: Element) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(element));
        id
    }

    /// Create `element` and append it as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, element: Element) -> Result<NodeId, DomError> {
        self.live(parent)?;
        let id = self.create_element(element);
        self.append_child(parent, id)?;
        Ok(id)
    }

    /// Append a detached node as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.check_insert(parent, child)?;
        let prev = self.nodes[parent.0].last_child;
        {
            let node = &mut self.nodes[child.0];
            node.parent = Some(parent);
            node.prev_sibling = prev;
            node.next_sibling = None;
        }
        match prev {
            Some(prev) => self.nodes[prev.0].next_sibling = Some(child),
            None => self.nodes[parent.0].first_child = Some(child),
        }
        self.nodes[parent.0].last_child = Some(child);
        Ok(())
    }

    /// Insert a detached node into `parent` immediately before `reference`.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: NodeId,
    ) -> Result<(), DomError> {
        self.check_insert(parent, child)?;
        if self.live(reference)?.parent != Some(parent) {
            return Err(DomError::NotAChild { parent, reference });
        }
        let prev = self.nodes[reference.0].prev_sibling;
        {
            let node = &mut self.nodes[child.0];
            node.parent = Some(parent);
            node.prev_sibling = prev;
            node.next_sibling = Some(reference);
        }
        self.nodes[reference.0].prev_sibling = Some(child);
        match prev {
            Some(prev) => self.nodes[prev.0].next_sibling = Some(child),
            None => self.nodes[parent.0].first_child = Some(child),
        }
        Ok(())
    }

    fn check_insert(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.live(parent)?;
        if self.live(child)?.parent.is_some() {
            return Err(DomError::AlreadyAttached(child));
        }
        if self.contains(child, parent) {
            return Err(DomError::Cycle { parent, child });
        }
        Ok(())
    }

    /// Detach `node` (and its subtree) from its parent. The subtree stays
    /// usable and can be re-inserted.
    pub fn remove(&mut self, node: NodeId) -> Result<(), DomError> {
        if self.node(node).is_none() {
            return Err(DomError::UnknownNode(node));
        }
        self.release_focus_within(node);
        self.detach(node);
        Ok(())
    }

    /// Detach `node` and mark it and every descendant as destroyed.
    pub fn destroy(&mut self, node: NodeId) -> Result<(), DomError> {
        if self.node(node).is_none() {
            return Err(DomError::UnknownNode(node));
        }
        self.release_focus_within(node);
        self.detach(node);
        let mut doomed = self.descendants(node);
        doomed.push(node);
        for id in doomed {
            self.nodes[id.0].destroyed = true;
        }
        Ok(())
    }

    fn release_focus_within(&mut self, node: NodeId) {
        if let Some(active) = self.active {
            if self.contains(node, active) {
                self.blur();
            }
        }
    }

    fn detach(&mut self, id: NodeId) {
        let (parent, prev, next) = {
            let node = &self.nodes[id.0];
            (node.parent, node.prev_sibling, node.next_sibling)
        };
        let Some(parent) = parent else {
            return;
        };
        match prev {
            Some(prev) => self.nodes[prev.0].next_sibling = next,
            None => self.nodes[parent.0].first_child = next,
        }
        match next {
            Some(next) => self.nodes[next.0].prev_sibling = prev,
            None => self.nodes[parent.0].last_child = prev,
        }
        let node = &mut self.nodes[id.0];
        node.parent = None;
        node.prev_sibling = None;
        node.next_sibling = None;
    }

    // ── Structure queries ───────────────────────────────────────────────

    /// Whether `node` was destroyed (unknown handles count as destroyed).
    pub fn is_destroyed(&self, node: NodeId) -> bool {
        self.node(node).is_none_or(|n| n.destroyed)
    }

    /// The element payload of `node`.
    pub fn element(&self, node: NodeId) -> Option<&Element> {
        self.node(node).map(|n| &n.element)
    }

    /// The lower-case tag name of `node`, or `""` for an unknown handle.
    pub fn tag(&self, node: NodeId) -> &str {
        self.element(node).map_or("", |e| e.tag())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.parent)
    }

    pub fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.first_child)
    }

    pub fn last_child(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.last_child)
    }

    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.next_sibling)
    }

    pub fn previous_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.prev_sibling)
    }

    /// Iterate over the direct children of `node`.
    pub fn children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.first_child(node), move |&n| self.next_sibling(n))
    }

    /// Whether `node` is `ancestor` or lies somewhere beneath it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        std::iter::successors(Some(node), |&n| self.parent(n))
            .any(|n| n == ancestor)
    }

    /// Whether `node` is connected to the document root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        !self.is_destroyed(node) && self.contains(self.root, node)
    }

    /// All descendants of `node` in document order, excluding `node` itself.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).collect();
        stack.reverse();
        while let Some(id) = stack.pop() {
            out.push(id);
            let start = stack.len();
            stack.extend(self.children(id));
            stack[start..].reverse();
        }
        out
    }

    // ── Attributes ──────────────────────────────────────────────────────

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)
            .and_then(|e| e.attributes.get(&name.to_ascii_lowercase()))
            .map(String::as_str)
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: impl Into<String>) {
        if let Some(n) = self.node_mut(node) {
            n.element
                .attributes
                .insert(name.to_ascii_lowercase(), value.into());
        }
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(n) = self.node_mut(node) {
            n.element.attributes.remove(&name.to_ascii_lowercase());
        }
    }

    /// The parsed `tabindex` attribute, or `-1` when absent or malformed.
    pub fn tab_index(&self, node: NodeId) -> i32 {
        self.attribute(node, "tabindex")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(-1)
    }

    pub fn set_tab_index(&mut self, node: NodeId, tab_index: i32) {
        self.set_attribute(node, "tabindex", tab_index.to_string());
    }

    /// The `type` of an `<input>`, lower-cased; `None` for other tags.
    /// Missing or unrecognised types read as `"text"`.
    pub fn input_type(&self, node: NodeId) -> Option<String> {
        if self.tag(node) != "input" {
            return None;
        }
        let ty = self
            .attribute(node, "type")
            .map(|t| t.trim().to_ascii_lowercase())
            .filter(|t| INPUT_TYPES.contains(&t.as_str()));
        Some(ty.unwrap_or_else(|| "text".to_string()))
    }

    pub fn is_read_only(&self, node: NodeId) -> bool {
        self.has_attribute(node, "readonly")
    }

    /// Whether `node` resolves to right-to-left through the nearest `dir`
    /// attribute on itself or an ancestor.
    pub fn is_right_to_left(&self, node: NodeId) -> bool {
        std::iter::successors(Some(node), |&n| self.parent(n))
            .find_map(|n| self.attribute(n, "dir"))
            .is_some_and(|dir| dir.eq_ignore_ascii_case("rtl"))
    }

    // ── Text ────────────────────────────────────────────────────────────

    /// Own text followed by every descendant's text, in document order.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        if let Some(e) = self.element(node) {
            out.push_str(&e.text);
        }
        for id in self.descendants(node) {
            out.push_str(&self.nodes[id.0].element.text);
        }
        out
    }

    pub fn label(&self, node: NodeId) -> Option<&str> {
        self.element(node).and_then(|e| e.label.as_deref())
    }

    /// The inner node that actually takes focus for a compound element.
    pub fn focus_node(&self, node: NodeId) -> Option<NodeId> {
        self.element(node).and_then(|e| e.focus_node)
    }

    pub fn set_focus_node(&mut self, node: NodeId, focus_node: NodeId) {
        if let Some(n) = self.node_mut(node) {
            n.element.focus_node = Some(focus_node);
        }
    }

    // ── Focus ───────────────────────────────────────────────────────────

    /// Whether `node` may receive focus right now.
    pub fn is_focusable(&self, node: NodeId) -> bool {
        self.is_attached(node)
            && !self.has_attribute(node, "disabled")
            && (self.has_attribute(node, "tabindex")
                || NATIVELY_FOCUSABLE.contains(&self.tag(node)))
    }

    /// Request focus on `node`. Returns `false` if the request was refused.
    ///
    /// Text entries (`input`, `textarea`) get a caret at `position`.
    pub fn focus(&mut self, node: NodeId, position: FocusPosition) -> bool {
        if !self.is_focusable(node) {
            tracing::trace!(message = "dom.focus_refused", node = node.index());
            return false;
        }
        self.active = Some(node);
        self.caret = match self.tag(node) {
            "input" | "textarea" => Some(match position {
                FocusPosition::Start => 0,
                FocusPosition::End => self.entry_value(node).chars().count(),
            }),
            _ => None,
        };
        true
    }

    fn entry_value(&self, node: NodeId) -> String {
        match self.tag(node) {
            "input" => self
                .attribute(node, "value")
                .unwrap_or_default()
                .to_string(),
            _ => self.text_content(node),
        }
    }

    /// Drop focus from whatever element holds it.
    pub fn blur(&mut self) {
        self.active = None;
        self.caret = None;
    }

    pub fn active_element(&self) -> Option<NodeId> {
        self.active
    }

    /// Caret offset (in characters) inside the focused text entry.
    pub fn caret(&self) -> Option<usize> {
        self.caret
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> (Document, [NodeId; 3]) {
        let mut doc = Document::new(Element::new("ul").with_tab_index(0));
        let root = doc.root();
        let a = doc.append(root, Element::new("li").with_text("A")).unwrap();
        let b = doc.append(root, Element::new("li").with_text("B")).unwrap();
        let c = doc.append(root, Element::new("li").with_text("C")).unwrap();
        (doc, [a, b, c])
    }

    #[test]
    fn append_links_siblings() {
        let (doc, [a, b, c]) = list();
        let root = doc.root();
        assert_eq!(doc.first_child(root), Some(a));
        assert_eq!(doc.last_child(root), Some(c));
        assert_eq!(doc.next_sibling(a), Some(b));
        assert_eq!(doc.previous_sibling(c), Some(b));
        assert_eq!(doc.children(root).collect::<Vec<_>>(), vec![a, b, c]);
    }

    #[test]
    fn insert_before_first_child() {
        let (mut doc, [a, _, _]) = list();
        let root = doc.root();
        let z = doc.create_element(Element::new("li"));
        doc.insert_before(root, z, a).unwrap();
        assert_eq!(doc.first_child(root), Some(z));
        assert_eq!(doc.previous_sibling(a), Some(z));
    }

    #[test]
    fn insert_before_rejects_foreign_reference() {
        let (mut doc, [a, _, _]) = list();
        let z = doc.create_element(Element::new("li"));
        let err = doc.insert_before(a, z, a).unwrap_err();
        assert_eq!(
            err,
            DomError::NotAChild {
                parent: a,
                reference: a
            }
        );
    }

    #[test]
    fn append_rejects_cycles_and_double_attach() {
        let (mut doc, [a, b, _]) = list();
        let root = doc.root();
        assert_eq!(
            doc.append_child(a, root),
            Err(DomError::Cycle {
                parent: a,
                child: root
            })
        );
        assert_eq!(doc.append_child(a, b), Err(DomError::AlreadyAttached(b)));
    }

    #[test]
    fn remove_unlinks_middle_child() {
        let (mut doc, [a, b, c]) = list();
        doc.remove(b).unwrap();
        assert_eq!(doc.next_sibling(a), Some(c));
        assert_eq!(doc.previous_sibling(c), Some(a));
        assert_eq!(doc.parent(b), None);
        assert!(!doc.is_destroyed(b));
    }

    #[test]
    fn destroy_marks_subtree() {
        let (mut doc, [a, _, _]) = list();
        let inner = doc.append(a, Element::new("span")).unwrap();
        doc.destroy(a).unwrap();
        assert!(doc.is_destroyed(a));
        assert!(doc.is_destroyed(inner));
        assert_eq!(
            doc.append(a, Element::new("i")),
            Err(DomError::Destroyed(a))
        );
    }

    #[test]
    fn descendants_in_document_order() {
        let (mut doc, [a, b, c]) = list();
        let a1 = doc.append(a, Element::new("span")).unwrap();
        let a2 = doc.append(a, Element::new("span")).unwrap();
        let a1x = doc.append(a1, Element::new("em")).unwrap();
        assert_eq!(doc.descendants(doc.root()), vec![a, a1, a1x, a2, b, c]);
    }

    #[test]
    fn tab_index_defaults_to_minus_one() {
        let (mut doc, [a, _, _]) = list();
        assert_eq!(doc.tab_index(doc.root()), 0);
        assert_eq!(doc.tab_index(a), -1);
        doc.set_attribute(a, "tabindex", "garbage");
        assert_eq!(doc.tab_index(a), -1);
        doc.set_tab_index(a, 3);
        assert_eq!(doc.tab_index(a), 3);
    }

    #[test]
    fn text_content_concatenates_descendants() {
        let (mut doc, [a, _, _]) = list();
        doc.append(a, Element::new("b").with_text("pple")).unwrap();
        assert_eq!(doc.text_content(a), "Apple");
        assert_eq!(doc.text_content(doc.root()), "AppleBC");
    }

    #[test]
    fn focus_requires_focusable_attached_node() {
        let (mut doc, [a, b, _]) = list();
        // <li> without tabindex is not focusable
        assert!(!doc.focus(a, FocusPosition::Start));
        doc.set_tab_index(a, -1);
        assert!(doc.focus(a, FocusPosition::Start));
        assert_eq!(doc.active_element(), Some(a));

        doc.set_tab_index(b, -1);
        doc.set_attribute(b, "disabled", "");
        assert!(!doc.focus(b, FocusPosition::Start));
        assert_eq!(doc.active_element(), Some(a));
    }

    #[test]
    fn removing_focused_node_blurs() {
        let (mut doc, [a, _, _]) = list();
        doc.set_tab_index(a, 0);
        doc.focus(a, FocusPosition::Start);
        doc.remove(a).unwrap();
        assert_eq!(doc.active_element(), None);
        assert!(!doc.focus(a, FocusPosition::Start));
    }

    #[test]
    fn caret_placement_for_text_entries() {
        let mut doc = Document::new(Element::new("form"));
        let root = doc.root();
        let entry = Element::new("input").with_attribute("value", "héllo");
        let input = doc.append(root, entry).unwrap();
        assert!(doc.focus(input, FocusPosition::End));
        assert_eq!(doc.caret(), Some(5));
        assert!(doc.focus(input, FocusPosition::Start));
        assert_eq!(doc.caret(), Some(0));
    }

    #[test]
    fn input_type_defaults_to_text() {
        let mut doc = Document::new(Element::new("form"));
        let root = doc.root();
        let plain = doc.append(root, Element::new("input")).unwrap();
        let checkbox = Element::new("INPUT").with_attribute("TYPE", "CheckBox");
        let check = doc.append(root, checkbox).unwrap();
        assert_eq!(doc.input_type(plain).as_deref(), Some("text"));
        assert_eq!(doc.input_type(check).as_deref(), Some("checkbox"));
        assert_eq!(doc.input_type(root), None);
    }

    #[test]
    fn unrecognised_input_type_reads_as_text() {
        let mut doc = Document::new(Element::new("form"));
        let root = doc.root();
        let bogus = Element::new("input").with_attribute("type", "month-day");
        let bogus = doc.append(root, bogus).unwrap();
        let empty = Element::new("input").with_attribute("type", "");
        let empty = doc.append(root, empty).unwrap();
        assert_eq!(doc.input_type(bogus).as_deref(), Some("text"));
        assert_eq!(doc.input_type(empty).as_deref(), Some("text"));
    }

    #[test]
    fn direction_inherits_from_ancestors() {
        let mut doc = Document::new(Element::new("div").with_attribute("dir", "RTL"));
        let root = doc.root();
        let child = doc.append(root, Element::new("span")).unwrap();
        let ltr = doc
            .append(root, Element::new("span").with_attribute("dir", "ltr"))
            .unwrap();
        assert!(doc.is_right_to_left(child));
        assert!(!doc.is_right_to_left(ltr));
    }
}
