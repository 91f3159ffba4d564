use crate::command::{Command, CommandInner};
use crate::component::Component;

/// A headless test harness that drives a [`Component`] synchronously.
///
/// `TestProgram` exercises the update cycle in a plain `#[test]` function --
/// no tokio runtime required.  Immediate commands ([`Command::message`]) are
/// queued and can be flushed with [`drain_messages`](TestProgram::drain_messages);
/// futures are dropped.  Subscriptions are never started, so tests deliver
/// timer messages by hand.
///
/// # Example
///
/// ```rust,ignore
/// use rove_core::testing::TestProgram;
///
/// let mut prog = TestProgram::new(nav);
/// prog.send(Message::KeyDown(NavEvent::from_code(KeyCode::Home, root)));
/// prog.drain_messages();            // delivers the FocusIn confirmation
/// assert_eq!(prog.component().focused_child(), Some(first));
/// ```
pub struct TestProgram<C: Component> {
    component: C,
    pending_messages: Vec<C::Message>,
}

impl<C: Component> TestProgram<C> {
    pub fn new(component: C) -> Self {
        Self {
            component,
            pending_messages: Vec::new(),
        }
    }

    /// Send a message, triggering a single update cycle.
    ///
    /// Immediate messages returned by `update` are enqueued; call
    /// [`drain_messages`](TestProgram::drain_messages) to flush them.
    pub fn send(&mut self, msg: C::Message) {
        let cmd = self.component.update(msg);
        self.collect_sync_messages(cmd);
    }

    /// Send a message and immediately flush everything it triggers.
    pub fn dispatch(&mut self, msg: C::Message) {
        self.send(msg);
        self.drain_messages();
    }

    /// Process pending messages until no new ones are produced.
    pub fn drain_messages(&mut self) {
        while !self.pending_messages.is_empty() {
            let messages: Vec<_> = self.pending_messages.drain(..).collect();
            for msg in messages {
                let cmd = self.component.update(msg);
                self.collect_sync_messages(cmd);
            }
        }
    }

    /// Messages queued by previous updates and not yet processed.
    pub fn pending(&self) -> &[C::Message] {
        &self.pending_messages
    }

    /// Drop queued messages without processing them.
    ///
    /// Useful for simulating a host that refuses or redirects a request.
    pub fn discard_pending(&mut self) -> Vec<C::Message> {
        std::mem::take(&mut self.pending_messages)
    }

    pub fn component(&self) -> &C {
        &self.component
    }

    /// Mutable access for arranging state outside the message cycle.
    pub fn component_mut(&mut self) -> &mut C {
        &mut self.component
    }

    pub fn into_component(self) -> C {
        self.component
    }

    fn collect_sync_messages(&mut self, cmd: Command<C::Message>) {
        match cmd.inner {
            CommandInner::None | CommandInner::Future(_) => {}
            CommandInner::Message(msg) => self.pending_messages.push(msg),
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.collect_sync_messages(cmd);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Chain {
        steps: Vec<String>,
    }

    #[derive(Debug, PartialEq)]
    enum ChainMsg {
        Start,
        Step(String),
    }

    impl Component for Chain {
        type Message = ChainMsg;

        fn update(&mut self, msg: ChainMsg) -> Command<ChainMsg> {
            match msg {
                ChainMsg::Start => {
                    self.steps.push("started".into());
                    Command::batch(vec![
                        Command::message(ChainMsg::Step("a".into())),
                        Command::message(ChainMsg::Step("b".into())),
                    ])
                }
                ChainMsg::Step(s) => {
                    self.steps.push(s);
                    Command::none()
                }
            }
        }
    }

    #[test]
    fn send_queues_without_processing() {
        let mut prog = TestProgram::new(Chain { steps: vec![] });
        prog.send(ChainMsg::Start);
        assert_eq!(prog.component().steps, vec!["started"]);
        assert_eq!(prog.pending().len(), 2);
    }

    #[test]
    fn drain_processes_chained_messages() {
        let mut prog = TestProgram::new(Chain { steps: vec![] });
        prog.dispatch(ChainMsg::Start);
        assert_eq!(prog.component().steps, vec!["started", "a", "b"]);
        assert!(prog.pending().is_empty());
    }

    #[test]
    fn discard_pending_drops_queue() {
        let mut prog = TestProgram::new(Chain { steps: vec![] });
        prog.send(ChainMsg::Start);
        let dropped = prog.discard_pending();
        assert_eq!(dropped[0], ChainMsg::Step("a".into()));
        prog.drain_messages();
        assert_eq!(prog.component().steps, vec!["started"]);
    }
}
