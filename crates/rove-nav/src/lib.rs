//! Keyboard navigation for composite containers.
//!
//! `rove-nav` implements the behavior shared by toolbars, menus, lists and
//! trees: arrow keys move focus among the container's candidates, only one
//! candidate sits in the tab order at a time (a *roving* tab stop), and typing
//! jumps to the first candidate whose label starts with the typed text.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`traversal`] | Cyclic document-order walk over candidates |
//! | [`selector`] | Which descendants count as candidates |
//! | [`focus`] | Roving tab stop bookkeeping |
//! | [`search`] | Type-ahead query accumulation and scanning |
//! | [`key`] | Key table, RTL-aware key-code map, text-control detection |
//! | [`keynav`] | The [`KeyNav`] container tying it all together |
//!
//! # Quick example
//!
//! ```
//! use crossterm::event::KeyCode;
//! use rove_core::dom::{Document, Element};
//! use rove_core::testing::TestProgram;
//! use rove_core::NavEvent;
//! use rove_nav::{KeyNav, Linear, Message};
//!
//! let mut doc = Document::new(Element::new("ul"));
//! let root = doc.root();
//! let apple = doc.append(root, Element::new("li").with_label("Apple")).unwrap();
//! let banana = doc.append(root, Element::new("li").with_label("Banana")).unwrap();
//!
//! let mut prog = TestProgram::new(KeyNav::new(doc, root, Linear::vertical()));
//! prog.dispatch(Message::Key(NavEvent::from_code(KeyCode::Down, root)));
//! assert_eq!(prog.component().focused_child(), Some(apple));
//!
//! prog.dispatch(Message::Key(NavEvent::from_code(KeyCode::Char('b'), apple)));
//! assert_eq!(prog.component().focused_child(), Some(banana));
//! ```

pub mod focus;
pub mod key;
pub mod keynav;
pub mod search;
pub mod selector;
pub mod traversal;

pub use focus::{tab_stops, RovingFocus};
pub use key::{takes_input, KeyCodeMap, KeyTable, NavAction, NavKey};
pub use keynav::{KeyNav, Linear, Message, Nav, NavHandler, NavOptions, Orientation};
pub use search::{default_compare, search_label, MatchCount, SearchMatch, SearchResult, SearchState};
pub use selector::{ChildSelector, SelectorError, SelectorList};
pub use traversal::Direction;
