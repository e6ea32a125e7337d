//! Invalidation bus.
//!
//! Replaces an implicit shared query cache with an explicit
//! publish/invalidate interface: readers subscribe to the query keys they
//! depend on and re-fetch when a key is invalidated. Nothing is pushed but
//! the key itself.

use std::collections::HashMap;

use tokio::sync::{mpsc, RwLock};
use tracing::debug;

/// Generation operation a cached query was keyed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationOp {
    Summarize,
    Gist,
    Generate,
}

/// A cache key: entity kind plus identifiers plus operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// The video list of an index
    Videos { index_id: String },
    /// One video's metadata
    Video { index_id: String, video_id: String },
    /// One task's status
    Task { task_id: String },
    /// A generation result for a video
    Generation { video_id: String, op: GenerationOp },
}

/// Subscription registry keyed by query key.
///
/// Closed subscribers are pruned on the next invalidation of their key.
#[derive(Debug, Default)]
pub struct InvalidationBus {
    subscribers: RwLock<HashMap<QueryKey, Vec<mpsc::UnboundedSender<QueryKey>>>>,
}

impl InvalidationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register interest in a key. The receiver yields the key once per
    /// invalidation; the subscriber is expected to re-fetch, not to receive
    /// data.
    pub async fn subscribe(&self, key: QueryKey) -> mpsc::UnboundedReceiver<QueryKey> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.write().await.entry(key).or_default().push(tx);
        rx
    }

    /// Invalidate a key, waking every live subscriber. Returns how many
    /// subscribers were notified.
    pub async fn invalidate(&self, key: &QueryKey) -> usize {
        let mut subscribers = self.subscribers.write().await;
        let Some(senders) = subscribers.get_mut(key) else {
            return 0;
        };

        senders.retain(|tx| tx.send(key.clone()).is_ok());
        let notified = senders.len();
        if senders.is_empty() {
            subscribers.remove(key);
        }

        debug!(?key, notified, "Invalidated query key");
        notified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video_key() -> QueryKey {
        QueryKey::Video {
            index_id: "ix1".into(),
            video_id: "v1".into(),
        }
    }

    #[tokio::test]
    async fn test_subscriber_is_woken_once_per_invalidation() {
        let bus = InvalidationBus::new();
        let mut rx = bus.subscribe(video_key()).await;

        assert_eq!(bus.invalidate(&video_key()).await, 1);
        assert_eq!(rx.try_recv().unwrap(), video_key());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_other_keys_do_not_wake_subscriber() {
        let bus = InvalidationBus::new();
        let mut rx = bus.subscribe(video_key()).await;

        bus.invalidate(&QueryKey::Task {
            task_id: "t1".into(),
        })
        .await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_dropped_subscribers_are_pruned() {
        let bus = InvalidationBus::new();
        let rx = bus.subscribe(video_key()).await;
        drop(rx);

        assert_eq!(bus.invalidate(&video_key()).await, 0);
    }
}
