use futures::stream::BoxStream;
use futures::StreamExt;
use std::any::TypeId;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// A long-lived event source managed by the host.
///
/// Subscriptions are declared in
/// [`Component::subscriptions`](crate::Component::subscriptions) and started
/// or stopped through diffing: after every update the host compares the set
/// of subscription ids against the running set, starts new ones, and aborts
/// the ones that disappeared.  Changing a subscription's id is therefore the
/// way to cancel-and-replace it atomically.
pub struct Subscription<Msg: Send + 'static> {
    pub(crate) id: SubscriptionId,
    pub(crate) spawn: Box<dyn FnOnce(mpsc::UnboundedSender<Msg>) -> AbortHandle + Send>,
}

/// Identity for diffing subscriptions between update cycles.
///
/// Composed of a Rust [`TypeId`] and a numeric discriminant.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId {
    type_id: TypeId,
    discriminant: u64,
}

impl SubscriptionId {
    /// Create an ID from a type and a numeric discriminant.
    pub fn new<T: 'static>(discriminant: u64) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            discriminant,
        }
    }

    /// Create an ID from a type alone (for singletons).
    pub fn of<T: 'static>() -> Self {
        Self::new::<T>(0)
    }
}

/// Trait for types that produce a stream of values.
///
/// The host calls [`stream`](SubscriptionSource::stream) once when the
/// subscription starts and drops the stream when it is removed.
pub trait SubscriptionSource: Send + 'static {
    /// The type of values this source emits.
    type Output: Send + 'static;

    /// Unique ID for this subscription instance.
    fn id(&self) -> SubscriptionId;

    /// Create the stream of values.
    fn stream(self) -> BoxStream<'static, Self::Output>;
}

/// Create a [`Subscription`] from a [`SubscriptionSource`].
///
/// Starting the subscription spawns a tokio task that drives the source's
/// stream and forwards each value to the host's message channel.
pub fn subscribe<S>(source: S) -> Subscription<S::Output>
where
    S: SubscriptionSource,
{
    let id = source.id();
    Subscription::from_stream(id, source.stream())
}

impl<Msg: Send + 'static> Subscription<Msg> {
    /// Create from a raw stream and id.
    pub fn from_stream(id: SubscriptionId, stream: BoxStream<'static, Msg>) -> Self {
        Subscription {
            id,
            spawn: Box::new(move |tx| {
                let handle = tokio::spawn(async move {
                    let mut stream = stream;
                    while let Some(msg) = stream.next().await {
                        if tx.send(msg).is_err() {
                            break;
                        }
                    }
                });
                handle.abort_handle()
            }),
        }
    }

    /// The identity used for diffing.
    pub fn id(&self) -> &SubscriptionId {
        &self.id
    }

    /// Transform the message type (for component composition).
    pub fn map<NewMsg: Send + 'static>(
        self,
        f: impl Fn(Msg) -> NewMsg + Send + Sync + 'static,
    ) -> Subscription<NewMsg> {
        let f = std::sync::Arc::new(f);
        Subscription {
            id: self.id,
            spawn: Box::new(move |new_tx: mpsc::UnboundedSender<NewMsg>| {
                let (inner_tx, mut inner_rx) = mpsc::unbounded_channel::<Msg>();
                let abort = (self.spawn)(inner_tx);

                tokio::spawn(async move {
                    while let Some(msg) = inner_rx.recv().await {
                        if new_tx.send(f(msg)).is_err() {
                            break;
                        }
                    }
                });

                // Aborting the source drops inner_tx, which ends the mapper task.
                abort
            }),
        }
    }
}

/// Running subscriptions keyed by id.
pub(crate) struct SubscriptionManager<Msg: Send + 'static> {
    active: HashMap<SubscriptionId, AbortHandle>,
    msg_tx: mpsc::UnboundedSender<Msg>,
}

impl<Msg: Send + 'static> SubscriptionManager<Msg> {
    pub fn new(msg_tx: mpsc::UnboundedSender<Msg>) -> Self {
        Self {
            active: HashMap::new(),
            msg_tx,
        }
    }

    /// Start new ids, abort removed ids, leave unchanged ids running.
    pub fn reconcile(&mut self, new_subs: Vec<Subscription<Msg>>) {
        let mut incoming: HashMap<SubscriptionId, Subscription<Msg>> = new_subs
            .into_iter()
            .map(|sub| (sub.id.clone(), sub))
            .collect();

        self.active.retain(|id, handle| {
            let keep = incoming.contains_key(id);
            if !keep {
                handle.abort();
            }
            keep
        });

        for (id, sub) in incoming.drain() {
            if !self.active.contains_key(&id) {
                let handle = (sub.spawn)(self.msg_tx.clone());
                self.active.insert(id, handle);
            }
        }
    }

    /// Abort all active subscriptions.
    pub fn shutdown(&mut self) {
        for (_, handle) in self.active.drain() {
            handle.abort();
        }
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_id_equality() {
        let id = SubscriptionId::of::<String>();
        assert_eq!(id, SubscriptionId::of::<String>());
        assert_ne!(id, SubscriptionId::of::<i32>());
    }

    #[test]
    fn subscription_id_with_discriminant() {
        let first = SubscriptionId::new::<String>(1);
        assert_ne!(first, SubscriptionId::new::<String>(2));
        assert_eq!(first, SubscriptionId::new::<String>(1));
    }

    fn pending(id: SubscriptionId) -> Subscription<i32> {
        Subscription::from_stream(id, Box::pin(futures::stream::pending()))
    }

    #[tokio::test]
    async fn manager_starts_and_stops() {
        let (tx, _rx) = mpsc::unbounded_channel::<i32>();
        let mut manager = SubscriptionManager::new(tx);

        manager.reconcile(vec![pending(SubscriptionId::of::<String>())]);
        assert_eq!(manager.active_count(), 1);

        manager.reconcile(vec![]);
        assert_eq!(manager.active_count(), 0);
    }

    #[tokio::test]
    async fn manager_replaces_changed_id() {
        let (tx, _rx) = mpsc::unbounded_channel::<i32>();
        let mut manager = SubscriptionManager::new(tx);

        manager.reconcile(vec![pending(SubscriptionId::new::<String>(1))]);
        manager.reconcile(vec![pending(SubscriptionId::new::<String>(2))]);
        assert_eq!(manager.active_count(), 1);
        let current = SubscriptionId::new::<String>(2);
        assert!(manager.active.contains_key(&current));
    }

    #[tokio::test]
    async fn manager_shutdown_aborts_all() {
        let (tx, _rx) = mpsc::unbounded_channel::<i32>();
        let mut manager = SubscriptionManager::new(tx);
        manager.reconcile(vec![
            pending(SubscriptionId::new::<String>(1)),
            pending(SubscriptionId::new::<String>(2)),
        ]);
        assert_eq!(manager.active_count(), 2);
        manager.shutdown();
        assert_eq!(manager.active_count(), 0);
    }

    #[tokio::test]
    async fn mapped_subscription_forwards_values() {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let mut manager = SubscriptionManager::new(tx);
        let sub = Subscription::from_stream(
            SubscriptionId::of::<u8>(),
            Box::pin(futures::stream::iter(vec![1, 2])),
        )
        .map(|n: i32| format!("#{n}"));
        manager.reconcile(vec![sub]);

        assert_eq!(rx.recv().await.as_deref(), Some("#1"));
        assert_eq!(rx.recv().await.as_deref(), Some("#2"));
    }
}
