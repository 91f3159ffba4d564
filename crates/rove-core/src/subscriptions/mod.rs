//! Built-in subscription sources.
//!
//! - **Timers** ([`After`]) -- one-shot delays keyed by a caller-chosen
//!   discriminant, used for debounce windows such as type-ahead expiry.

mod timer;

pub use timer::*;
