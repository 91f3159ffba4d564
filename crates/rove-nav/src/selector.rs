//! Which descendants of a container are navigable.
//!
//! A [`ChildSelector`] is one of:
//!
//! * [`DirectChildren`](ChildSelector::DirectChildren) -- the default; every
//!   direct child of the container node is a candidate.
//! * [`Pattern`](ChildSelector::Pattern) -- a small CSS-like selector list
//!   such as `"li.item, [role=option]"`.
//! * [`Predicate`](ChildSelector::Predicate) -- an arbitrary closure, for
//!   trees where one candidate can be nested inside another.

use rove_core::dom::{Document, NodeId};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Errors produced by [`SelectorList::parse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("selector is empty")]
    Empty,
    #[error("unexpected character {ch:?} at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },
    #[error("expected a name at offset {offset}")]
    MissingName { offset: usize },
    #[error("attribute selector opened at offset {offset} is not closed")]
    UnterminatedAttribute { offset: usize },
    #[error("quoted value starting at offset {offset} is not closed")]
    UnterminatedString { offset: usize },
}

type PredicateFn = dyn Fn(&Document, NodeId) -> bool + Send + Sync;

/// Classifies which descendants are candidates.
#[derive(Clone, Default)]
pub enum ChildSelector {
    /// Direct children of the container node.
    #[default]
    DirectChildren,
    /// Descendants matching a selector list.
    Pattern(SelectorList),
    /// Descendants for which the closure returns `true`.
    Predicate(Arc<PredicateFn>),
}

impl ChildSelector {
    /// Parse a selector list into a [`Pattern`](ChildSelector::Pattern).
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        SelectorList::parse(source).map(ChildSelector::Pattern)
    }

    pub fn predicate(f: impl Fn(&Document, NodeId) -> bool + Send + Sync + 'static) -> Self {
        ChildSelector::Predicate(Arc::new(f))
    }

    /// Whether `node` is a candidate of a container whose items live under
    /// `container_node`.
    pub fn matches(&self, doc: &Document, container_node: NodeId, node: NodeId) -> bool {
        match self {
            ChildSelector::DirectChildren => doc.parent(node) == Some(container_node),
            ChildSelector::Pattern(list) => list.matches(doc, node),
            ChildSelector::Predicate(f) => f(doc, node),
        }
    }
}

impl fmt::Debug for ChildSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildSelector::DirectChildren => f.write_str("DirectChildren"),
            ChildSelector::Pattern(list) => f.debug_tuple("Pattern").field(list).finish(),
            ChildSelector::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl FromStr for ChildSelector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A comma-separated list of compound selectors.
///
/// Supported: `tag`, `*`, `.class`, `#id`, `[attr]`, and `[attr=value]`
/// with an optionally quoted value.  Combinators are not supported; a node
/// matches when any compound in the list matches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    compounds: Vec<Compound>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Compound {
    tag: Option<String>,
    conditions: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Condition {
    Class(String),
    Id(String),
    Attribute(String, Option<String>),
}

impl SelectorList {
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let mut parser = Parser::new(source);
        parser.skip_whitespace();
        if parser.peek().is_none() {
            return Err(SelectorError::Empty);
        }

        let mut compounds = vec![parser.compound()?];
        loop {
            match parser.peek() {
                None => break,
                Some(',') => {
                    parser.bump();
                    compounds.push(parser.compound()?);
                }
                Some(ch) => {
                    return Err(SelectorError::UnexpectedChar {
                        ch,
                        offset: parser.pos,
                    });
                }
            }
        }
        Ok(Self { compounds })
    }

    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.compounds.iter().any(|c| c.matches(doc, node))
    }
}

impl FromStr for SelectorList {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Compound {
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        if doc.element(node).is_none() {
            return false;
        }
        if let Some(tag) = &self.tag {
            if !doc.tag(node).eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        self.conditions.iter().all(|cond| match cond {
            Condition::Class(class) => has_class(doc, node, class),
            Condition::Id(id) => doc.attribute(node, "id") == Some(id.as_str()),
            Condition::Attribute(name, None) => doc.has_attribute(node, name),
            Condition::Attribute(name, Some(value)) => {
                doc.attribute(node, name) == Some(value.as_str())
            }
        })
    }
}

fn has_class(doc: &Document, node: NodeId, class: &str) -> bool {
    doc.attribute(node, "class")
        .is_some_and(|v| v.split_whitespace().any(|c| c == class))
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

fn is_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '-' || ch == '_'
}

fn is_value_char(ch: char) -> bool {
    ch != ']' && !ch.is_whitespace()
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn name(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while self.peek().is_some_and(is_name_char) {
            self.bump();
        }
        if self.pos == start {
            return Err(SelectorError::MissingName { offset: start });
        }
        Ok(self.src[start..self.pos].to_string())
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        self.skip_whitespace();
        let start = self.pos;
        let mut compound = Compound::default();

        match self.peek() {
            Some('*') => {
                self.bump();
            }
            Some(ch) if is_name_char(ch) => {
                compound.tag = Some(self.name()?.to_ascii_lowercase());
            }
            _ => {}
        }

        loop {
            match self.peek() {
                Some('.') => {
                    self.bump();
                    compound.conditions.push(Condition::Class(self.name()?));
                }
                Some('#') => {
                    self.bump();
                    compound.conditions.push(Condition::Id(self.name()?));
                }
                Some('[') => compound.conditions.push(self.attribute()?),
                _ => break,
            }
        }

        if self.pos == start {
            return Err(match self.peek() {
                Some(ch) => SelectorError::UnexpectedChar { ch, offset: start },
                None => SelectorError::MissingName { offset: start },
            });
        }
        self.skip_whitespace();
        Ok(compound)
    }

    fn attribute(&mut self) -> Result<Condition, SelectorError> {
        let open = self.pos;
        self.bump();
        self.skip_whitespace();
        let name = self.name()?.to_ascii_lowercase();
        self.skip_whitespace();

        let value = match self.bump() {
            Some(']') => return Ok(Condition::Attribute(name, None)),
            Some('=') => {
                self.skip_whitespace();
                match self.peek() {
                    Some(quote @ ('"' | '\'')) => Some(self.quoted(quote)?),
                    _ => Some(self.bare_value()?),
                }
            }
            Some(ch) => {
                return Err(SelectorError::UnexpectedChar {
                    ch,
                    offset: self.pos - ch.len_utf8(),
                });
            }
            None => return Err(SelectorError::UnterminatedAttribute { offset: open }),
        };

        self.skip_whitespace();
        match self.bump() {
            Some(']') => Ok(Condition::Attribute(name, value)),
            _ => Err(SelectorError::UnterminatedAttribute { offset: open }),
        }
    }

    fn quoted(&mut self, quote: char) -> Result<String, SelectorError> {
        let open = self.pos;
        self.bump();
        let start = self.pos;
        loop {
            match self.bump() {
                Some(ch) if ch == quote => return Ok(self.src[start..self.pos - 1].to_string()),
                Some(_) => {}
                None => return Err(SelectorError::UnterminatedString { offset: open }),
            }
        }
    }

    fn bare_value(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while self.peek().is_some_and(is_value_char) {
            self.bump();
        }
        if self.pos == start {
            return Err(SelectorError::MissingName { offset: start });
        }
        Ok(self.src[start..self.pos].to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rove_core::dom::Element;

    fn doc() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new(Element::new("ul"));
        let root = doc.root();
        let li = Element::new("li")
            .with_attribute("class", "item selected")
            .with_attribute("id", "first");
        let li = doc.append(root, li).unwrap();
        let option = Element::new("div").with_attribute("role", "option");
        let option = doc.append(root, option).unwrap();
        let nested = doc.append(option, Element::new("span")).unwrap();
        (doc, li, option, nested)
    }

    fn hits(source: &str, doc: &Document, node: NodeId) -> bool {
        SelectorList::parse(source).unwrap().matches(doc, node)
    }

    fn error(source: &str) -> String {
        SelectorList::parse(source).unwrap_err().to_string()
    }

    #[test]
    fn tag_class_and_id() {
        let (doc, li, option, _) = doc();
        assert!(hits("li", &doc, li));
        assert!(hits("LI.item", &doc, li));
        assert!(hits("#first.selected", &doc, li));
        assert!(!hits("li.other", &doc, li));
        assert!(!hits("li", &doc, option));
    }

    #[test]
    fn attribute_forms() {
        let (doc, li, option, _) = doc();
        assert!(hits("[role]", &doc, option));
        assert!(hits("[role=option]", &doc, option));
        assert!(hits("[ role = \"option\" ]", &doc, option));
        assert!(hits("div[role='option']", &doc, option));
        assert!(!hits("[role=menuitem]", &doc, option));
        assert!(!hits("[role]", &doc, li));
    }

    #[test]
    fn list_matches_any_compound() {
        let (doc, li, option, nested) = doc();
        let list: SelectorList = "li.item, [role=option]".parse().unwrap();
        assert!(list.matches(&doc, li));
        assert!(list.matches(&doc, option));
        assert!(!list.matches(&doc, nested));
        assert!(hits("*", &doc, nested));
    }

    #[test]
    fn parse_errors() {
        assert_eq!(SelectorList::parse("  "), Err(SelectorError::Empty));
        assert_eq!(error("li > a"), "unexpected character '>' at offset 3");
        assert_eq!(error("li,"), "expected a name at offset 3");
        assert_eq!(error("li."), "expected a name at offset 3");
        assert_eq!(
            SelectorList::parse("[role"),
            Err(SelectorError::UnterminatedAttribute { offset: 0 })
        );
        assert_eq!(
            SelectorList::parse("[role='x]"),
            Err(SelectorError::UnterminatedString { offset: 6 })
        );
    }

    #[test]
    fn default_selects_direct_children_of_container_node() {
        let (doc, li, option, nested) = doc();
        let selector = ChildSelector::default();
        let root = doc.root();
        assert!(selector.matches(&doc, root, li));
        assert!(selector.matches(&doc, root, option));
        assert!(!selector.matches(&doc, root, nested));
        assert!(selector.matches(&doc, option, nested));
    }

    #[test]
    fn predicate_selector() {
        let (doc, li, option, _) = doc();
        let selector = ChildSelector::predicate(|doc, n| doc.tag(n) == "div");
        assert!(selector.matches(&doc, doc.root(), option));
        assert!(!selector.matches(&doc, doc.root(), li));
        assert_eq!(format!("{selector:?}"), "Predicate(..)");
    }
}
