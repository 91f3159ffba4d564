use crate::command::{Command, CommandInner};
use crate::component::Component;
use crate::subscription::SubscriptionManager;
use std::sync::Arc;
use tokio::sync::{mpsc, Notify};

/// Errors reported by a [`DriverHandle`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DriverError {
    /// The driver has finished and no longer accepts messages.
    #[error("driver has stopped")]
    Stopped,
}

/// A cloneable handle to a running [`Driver`].
///
/// `DriverHandle` can be moved into other tasks.  It provides:
///
/// * [`send`](DriverHandle::send) -- inject a message into the loop.
/// * [`shutdown`](DriverHandle::shutdown) -- stop the loop after the
///   messages already queued have been processed.
pub struct DriverHandle<Msg: Send + 'static> {
    msg_tx: mpsc::UnboundedSender<Msg>,
    shutdown: Arc<Notify>,
}

impl<Msg: Send + 'static> Clone for DriverHandle<Msg> {
    fn clone(&self) -> Self {
        Self {
            msg_tx: self.msg_tx.clone(),
            shutdown: self.shutdown.clone(),
        }
    }
}

impl<Msg: Send + 'static> DriverHandle<Msg> {
    /// Send a message to the running component.
    pub fn send(&self, msg: Msg) -> Result<(), DriverError> {
        self.msg_tx.send(msg).map_err(|_| DriverError::Stopped)
    }

    /// Ask the driver to stop.  Safe to call before [`Driver::run`] starts.
    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }
}

/// Async event loop that hosts a single [`Component`].
///
/// The driver plays the part of the host framework: it feeds messages to
/// [`Component::update`], executes the returned [`Command`]s, and after every
/// update reconciles [`Component::subscriptions`] so timers are started,
/// replaced, or aborted as the component's state changes.  When the loop
/// ends every subscription is aborted, so no timer outlives its component.
///
/// # Example
///
/// ```rust,ignore
/// use rove_core::runtime::Driver;
///
/// let driver = Driver::new(nav);
/// let handle = driver.handle();
/// let task = tokio::spawn(driver.run());
///
/// handle.send(Message::KeyPress(ev))?;
/// handle.shutdown();
/// let nav = task.await?;
/// ```
pub struct Driver<C: Component> {
    component: C,
    msg_tx: mpsc::UnboundedSender<C::Message>,
    msg_rx: mpsc::UnboundedReceiver<C::Message>,
    subscriptions: SubscriptionManager<C::Message>,
    shutdown: Arc<Notify>,
}

impl<C: Component> Driver<C> {
    pub fn new(component: C) -> Self {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let subscriptions = SubscriptionManager::new(msg_tx.clone());
        Self {
            component,
            msg_tx,
            msg_rx,
            subscriptions,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Get a handle for external control.
    pub fn handle(&self) -> DriverHandle<C::Message> {
        DriverHandle {
            msg_tx: self.msg_tx.clone(),
            shutdown: self.shutdown.clone(),
        }
    }

    pub fn component(&self) -> &C {
        &self.component
    }

    /// Run until [`DriverHandle::shutdown`] is called, then return the component.
    pub async fn run(mut self) -> C {
        tracing::debug!(message = "driver.start");
        self.reconcile();

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown.notified() => break,

                Some(msg) = self.msg_rx.recv() => self.process_message(msg),
            }
        }

        // Finish what was queued before the shutdown request.
        while let Ok(msg) = self.msg_rx.try_recv() {
            let cmd = self.component.update(msg);
            self.execute_sync(cmd);
        }

        self.subscriptions.shutdown();
        tracing::debug!(message = "driver.shutdown");
        self.component
    }

    fn process_message(&mut self, msg: C::Message) {
        let cmd = self.component.update(msg);
        self.execute_command(cmd);
        self.reconcile();
    }

    fn reconcile(&mut self) {
        let subs = self.component.subscriptions();
        self.subscriptions.reconcile(subs);
        tracing::trace!(
            message = "driver.reconcile",
            active = self.subscriptions.active_count()
        );
    }

    fn execute_command(&mut self, cmd: Command<C::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Message(msg) => {
                let _ = self.msg_tx.send(msg);
            }
            CommandInner::Future(fut) => {
                let tx = self.msg_tx.clone();
                tokio::spawn(async move {
                    let msg = fut.await;
                    let _ = tx.send(msg);
                });
            }
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.execute_command(cmd);
                }
            }
        }
    }

    /// Shutdown path: run immediate follow-ups inline, drop async work.
    fn execute_sync(&mut self, cmd: Command<C::Message>) {
        for msg in cmd.into_messages() {
            let next = self.component.update(msg);
            self.execute_sync(next);
        }
    }
}
