use crate::command::Command;
use crate::subscription::Subscription;

/// A reusable piece of interactive state driven by messages.
///
/// A `Component` never draws anything itself; it reacts to messages,
/// mutates its state, and hands side effects back to the host as
/// [`Command`]s.  Long-lived event sources such as debounce timers are
/// declared through [`subscriptions`](Component::subscriptions) and
/// reconciled by the host after every update.
///
/// # Composition pattern
///
/// Wrap a child's message type in a variant of the parent message and use
/// [`Command::map`] / [`Subscription::map`] to translate:
///
/// ```rust,ignore
/// use rove_core::{Command, Component};
///
/// struct Menu { nav: KeyNav<MenuKeys> }
///
/// enum MenuMsg { Nav(keynav::Message), Close }
///
/// impl Component for Menu {
///     type Message = MenuMsg;
///
///     fn update(&mut self, msg: MenuMsg) -> Command<MenuMsg> {
///         match msg {
///             MenuMsg::Nav(m) => self.nav.update(m).map(MenuMsg::Nav),
///             MenuMsg::Close => Command::none(),
///         }
///     }
///
///     fn subscriptions(&self) -> Vec<Subscription<MenuMsg>> {
///         self.nav
///             .subscriptions()
///             .into_iter()
///             .map(|s| s.map(MenuMsg::Nav))
///             .collect()
///     }
/// }
/// ```
pub trait Component: Send + 'static {
    /// The component's internal message type.
    type Message: Send + 'static;

    /// Process a message, mutate state, and return a [`Command`] for side effects.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Declare active subscriptions for this component.
    ///
    /// The default implementation returns an empty list (no subscriptions).
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>> {
        vec![]
    }

    /// Whether this component currently holds keyboard focus.
    ///
    /// The default implementation returns `false`.
    fn focused(&self) -> bool {
        false
    }
}
