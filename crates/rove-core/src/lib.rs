//! Host runtime for **rove** keyboard navigation.
//!
//! `rove-core` provides the pieces a navigable container needs from its
//! host: an element tree to walk, keyboard events to react to, and an
//! [Elm Architecture]-style message loop in which side effects are returned
//! as [`Command`]s and long-lived sources such as timers are declared as
//! [`Subscription`]s.
//!
//! # Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Document`] | Arena element tree with attributes, labels, and a single focus owner |
//! | [`NavEvent`] | A [`crossterm`] key event targeted at an element |
//! | [`Component`] | Message-driven state with optional subscriptions |
//! | [`Command`] | Describes a side effect to be executed by the host |
//! | [`Subscription`] | Long-lived event source reconciled by id |
//! | [`Driver`] | Async loop that hosts a component on tokio |
//! | [`TestProgram`](testing::TestProgram) | Headless harness for unit-testing a [`Component`] |
//!
//! # Message cycle
//!
//! 1. **event** -- Key presses and focus notifications arrive as messages.
//! 2. **update** -- [`Component::update`] mutates state and may return a
//!    [`Command`], for example a follow-up focus notification.
//! 3. **reconcile** -- The host diffs [`Component::subscriptions`] against
//!    the running set, so a re-armed timer replaces its predecessor.
//!
//! [Elm Architecture]: https://guide.elm-lang.org/architecture/

pub mod command;
pub mod component;
pub mod dom;
pub mod event;
pub mod runtime;
pub mod subscription;
pub mod subscriptions;
pub mod testing;

pub use command::Command;
pub use component::Component;
pub use dom::{DomError, Document, Element, FocusPosition, NodeId};
pub use event::NavEvent;
pub use runtime::{Driver, DriverError, DriverHandle};
pub use subscription::{subscribe, Subscription, SubscriptionId, SubscriptionSource};
pub use subscriptions::After;
