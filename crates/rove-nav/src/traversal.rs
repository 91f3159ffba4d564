//! Document-order walk over the candidates inside a container.
//!
//! The walk is cyclic: stepping forward past the last candidate reaches the
//! container again and wraps to the first, and stepping backward from the
//! container jumps to the deepest last descendant.  A walk that comes back
//! to where it started reports `None`, so an empty container (or one whose
//! only candidate is the starting point) never loops.

use rove_core::dom::{Document, NodeId};

/// Which way to walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// The next node after `from` for which `is_candidate` holds.
///
/// `from` may be the container itself, meaning "no current position": the
/// forward walk then yields the first candidate and the backward walk the
/// last one.  A `from` that has been destroyed or lies outside the
/// container is treated the same way.  The container is never returned.
pub fn next<P>(
    doc: &Document,
    root: NodeId,
    from: NodeId,
    direction: Direction,
    mut is_candidate: P,
) -> Option<NodeId>
where
    P: FnMut(NodeId) -> bool,
{
    let start = if doc.is_destroyed(from) || !doc.contains(root, from) {
        root
    } else {
        from
    };

    let mut node = start;
    loop {
        node = match direction {
            Direction::Forward => step_forward(doc, root, node),
            Direction::Backward => step_backward(doc, root, node),
        };
        if node == start {
            return None;
        }
        if node != root && is_candidate(node) {
            return Some(node);
        }
    }
}

/// First candidate in document order.
pub fn first<P>(doc: &Document, root: NodeId, is_candidate: P) -> Option<NodeId>
where
    P: FnMut(NodeId) -> bool,
{
    next(doc, root, root, Direction::Forward, is_candidate)
}

/// Last candidate in document order.
pub fn last<P>(doc: &Document, root: NodeId, is_candidate: P) -> Option<NodeId>
where
    P: FnMut(NodeId) -> bool,
{
    next(doc, root, root, Direction::Backward, is_candidate)
}

/// Every candidate under `root`, in document order.
pub fn candidates<P>(doc: &Document, root: NodeId, mut is_candidate: P) -> Vec<NodeId>
where
    P: FnMut(NodeId) -> bool,
{
    doc.descendants(root)
        .into_iter()
        .filter(|&n| is_candidate(n))
        .collect()
}

fn step_forward(doc: &Document, root: NodeId, node: NodeId) -> NodeId {
    if let Some(child) = doc.first_child(node) {
        return child;
    }
    let mut current = node;
    while current != root {
        if let Some(sibling) = doc.next_sibling(current) {
            return sibling;
        }
        match doc.parent(current) {
            Some(parent) => current = parent,
            None => break,
        }
    }
    root
}

fn step_backward(doc: &Document, root: NodeId, node: NodeId) -> NodeId {
    if node == root {
        return deepest_last(doc, root);
    }
    match doc.previous_sibling(node) {
        Some(prev) => deepest_last(doc, prev),
        None => doc.parent(node).unwrap_or(root),
    }
}

fn deepest_last(doc: &Document, node: NodeId) -> NodeId {
    let mut current = node;
    while let Some(child) = doc.last_child(current) {
        current = child;
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use rove_core::dom::Element;

    /// ```text
    /// tree
    /// ├── a*
    /// │   ├── a1*
    /// │   └── a2
    /// │       └── a2x*
    /// ├── sep
    /// └── b*
    /// ```
    fn tree() -> (Document, Vec<NodeId>) {
        let mut doc = Document::new(Element::new("div"));
        let root = doc.root();
        let a = doc.append(root, item()).unwrap();
        let a1 = doc.append(a, item()).unwrap();
        let a2 = doc.append(a, Element::new("div")).unwrap();
        let a2x = doc.append(a2, item()).unwrap();
        doc.append(root, Element::new("hr")).unwrap();
        let b = doc.append(root, item()).unwrap();
        (doc, vec![a, a1, a2x, b])
    }

    fn item() -> Element {
        Element::new("div").with_attribute("role", "item")
    }

    fn is_item(doc: &Document) -> impl Fn(NodeId) -> bool + '_ {
        |n| doc.attribute(n, "role") == Some("item")
    }

    fn forward(doc: &Document, root: NodeId, from: NodeId) -> Option<NodeId> {
        next(doc, root, from, Direction::Forward, is_item(doc))
    }

    fn backward(doc: &Document, root: NodeId, from: NodeId) -> Option<NodeId> {
        next(doc, root, from, Direction::Backward, is_item(doc))
    }

    #[test]
    fn forward_visits_nested_candidates_in_document_order() {
        let (doc, items) = tree();
        let root = doc.root();
        let mut seen = vec![];
        let mut at = root;
        while let Some(n) = forward(&doc, root, at) {
            if seen.contains(&n) {
                break;
            }
            seen.push(n);
            at = n;
        }
        assert_eq!(seen, items);
    }

    #[test]
    fn backward_visits_in_reverse() {
        let (doc, items) = tree();
        let root = doc.root();
        assert_eq!(last(&doc, root, is_item(&doc)), Some(items[3]));
        assert_eq!(backward(&doc, root, items[3]), Some(items[2]));
        assert_eq!(backward(&doc, root, items[2]), Some(items[1]));
        assert_eq!(backward(&doc, root, items[1]), Some(items[0]));
    }

    #[test]
    fn wraps_in_both_directions() {
        let (doc, items) = tree();
        let root = doc.root();
        assert_eq!(forward(&doc, root, items[3]), Some(items[0]));
        assert_eq!(backward(&doc, root, items[0]), Some(items[3]));
    }

    #[test]
    fn empty_container_yields_none() {
        let mut doc = Document::new(Element::new("div"));
        let root = doc.root();
        doc.append(root, Element::new("span")).unwrap();
        assert_eq!(first(&doc, root, is_item(&doc)), None);
        assert_eq!(last(&doc, root, is_item(&doc)), None);

        let bare = Document::new(Element::new("div"));
        assert_eq!(first(&bare, bare.root(), |_| true), None);
    }

    #[test]
    fn lone_candidate_does_not_find_itself() {
        let mut doc = Document::new(Element::new("div"));
        let root = doc.root();
        let only = doc.append(root, item()).unwrap();
        assert_eq!(first(&doc, root, is_item(&doc)), Some(only));
        assert_eq!(forward(&doc, root, only), None);
        assert_eq!(backward(&doc, root, only), None);
    }

    #[test]
    fn container_is_never_a_candidate() {
        let mut doc = Document::new(Element::new("div"));
        let root = doc.root();
        let child = doc.append(root, Element::new("span")).unwrap();
        assert_eq!(first(&doc, root, |_| true), Some(child));
        assert_eq!(next(&doc, root, child, Direction::Forward, |_| true), None);
    }

    #[test]
    fn walk_stays_inside_the_container() {
        let mut doc = Document::new(Element::new("body"));
        let body = doc.root();
        let before = doc.append(body, item()).unwrap();
        let menu = doc.append(body, Element::new("div")).unwrap();
        let inside = doc.append(menu, item()).unwrap();
        doc.append(body, item()).unwrap();

        assert_eq!(first(&doc, menu, is_item(&doc)), Some(inside));
        assert_eq!(last(&doc, menu, is_item(&doc)), Some(inside));
        // A position outside the container restarts from the container.
        assert_eq!(forward(&doc, menu, before), Some(inside));
    }

    #[test]
    fn destroyed_start_restarts_from_container() {
        let (mut doc, items) = tree();
        let root = doc.root();
        doc.destroy(items[1]).unwrap();
        assert_eq!(forward(&doc, root, items[1]), Some(items[0]));
        let remaining = candidates(&doc, root, is_item(&doc));
        assert_eq!(remaining, vec![items[0], items[2], items[3]]);
    }
}
