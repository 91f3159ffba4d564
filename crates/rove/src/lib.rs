//! **rove** -- keyboard navigation and type-ahead search for composite
//! containers such as toolbars, menus, lists, and trees.
//!
//! This is the umbrella crate that re-exports everything from a single
//! dependency:
//!
//! ```toml
//! [dependencies]
//! rove = "0.1"
//! ```
//!
//! # Re-exports
//!
//! * All public items from [`rove_core`] are available at the crate root
//!   ([`Document`], [`NavEvent`], [`Component`], [`Command`],
//!   [`Subscription`], [`Driver`], etc.).
//! * The [`nav`] module re-exports everything from [`rove_nav`]
//!   ([`KeyNav`](nav::KeyNav), [`NavHandler`](nav::NavHandler),
//!   [`NavOptions`](nav::NavOptions), and the building blocks).
//! * [`crossterm`] and [`tokio`] are re-exported so downstream crates do
//!   not need to depend on them directly.
//!
//! # Quick start
//!
//! ```ignore
//! use rove::crossterm::event::KeyCode;
//! use rove::nav::{KeyNav, Linear, Message};
//! use rove::{Document, Driver, Element, NavEvent};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut doc = Document::new(Element::new("ul"));
//!     let root = doc.root();
//!     for label in ["Open", "Save", "Quit"] {
//!         doc.append(root, Element::new("li").with_label(label)).unwrap();
//!     }
//!
//!     let driver = Driver::new(KeyNav::new(doc, root, Linear::vertical()));
//!     let handle = driver.handle();
//!     let task = rove::tokio::spawn(driver.run());
//!
//!     handle.send(Message::Key(NavEvent::from_code(KeyCode::Char('s'), root))).unwrap();
//!     handle.shutdown();
//!     let nav = task.await.unwrap();
//!     println!("focused: {:?}", nav.focused_child());
//! }
//! ```

pub use rove_core::*;
pub mod nav {
    pub use rove_nav::*;
}

// Re-export dependencies for downstream crates
pub use crossterm;
pub use tokio;
