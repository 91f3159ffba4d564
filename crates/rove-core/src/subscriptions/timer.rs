use crate::subscription::{SubscriptionId, SubscriptionSource};
use futures::stream::BoxStream;
use std::time::{Duration, Instant};

/// A one-shot delay that fires once after the specified duration.
///
/// Emits a single [`Instant`] when the delay elapses, then the subscription
/// stream completes.  The `key` takes part in the subscription id, so a
/// component that re-arms a debounce window bumps the key and the host
/// aborts the old delay while starting the new one.
///
/// # Example
///
/// ```rust,ignore
/// use std::time::Duration;
/// use rove_core::subscriptions::After;
/// use rove_core::subscription::subscribe;
///
/// let sub = subscribe(After::new(Duration::from_millis(500)).with_key(generation))
///     .map(move |_| Msg::Expired(generation));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct After {
    /// How long to wait before firing.
    pub duration: Duration,
    /// Distinguishes otherwise identical delays.
    pub key: u64,
}

impl After {
    /// Create a new one-shot delay for the given duration.
    pub fn new(duration: Duration) -> Self {
        Self { duration, key: 0 }
    }

    /// Set the discriminant that identifies this delay.
    pub fn with_key(mut self, key: u64) -> Self {
        self.key = key;
        self
    }
}

impl SubscriptionSource for After {
    type Output = Instant;

    fn id(&self) -> SubscriptionId {
        SubscriptionId::new::<Self>(self.key)
    }

    fn stream(self) -> BoxStream<'static, Instant> {
        let stream = futures::stream::once(async move {
            tokio::time::sleep(self.duration).await;
            Instant::now()
        });
        Box::pin(stream)
    }
}
