//! # Change Broadcaster
//!
//! Fans each new [`Snapshot`] out to every subscribed observer.
//!
//! Every subscriber owns the receiving end of its own unbounded channel, so
//! publishing never waits on a slow reader. A subscriber that went away
//! (dropped its [`Subscription`]) is pruned on the next publish; that never
//! affects delivery to anyone else, and it is not an error for the store.
//!
//! The store publishes while it still holds its writer lock, so every
//! subscriber sees snapshots in revision order.

use crate::model::Note;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryIter};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// The full display-ordered list at one revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub revision: u64,
    pub notes: Vec<Note>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// A registered observer. Dropping it is equivalent to unsubscribing; the
/// broadcaster notices on its next publish.
pub struct Subscription {
    id: SubscriptionId,
    rx: Receiver<Arc<Snapshot>>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Blocks until the next snapshot. Returns `None` once the broadcaster
    /// is gone or this subscription was unsubscribed.
    pub fn recv(&self) -> Option<Arc<Snapshot>> {
        self.rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<Arc<Snapshot>> {
        match self.rx.recv_timeout(timeout) {
            Ok(snapshot) => Some(snapshot),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    pub fn try_recv(&self) -> Option<Arc<Snapshot>> {
        self.rx.try_recv().ok()
    }

    /// Drains everything delivered so far without blocking.
    pub fn pending(&self) -> TryIter<'_, Arc<Snapshot>> {
        self.rx.try_iter()
    }

    /// Skips straight to the newest delivered snapshot, if any.
    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.pending().last()
    }
}

impl Iterator for Subscription {
    type Item = Arc<Snapshot>;

    fn next(&mut self) -> Option<Self::Item> {
        self.recv()
    }
}

#[derive(Default)]
pub struct Broadcaster {
    next_id: AtomicU64,
    subscribers: Mutex<Vec<(SubscriptionId, Sender<Arc<Snapshot>>)>>,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Subscription {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::channel();
        self.lock().push((id, tx));
        log::debug!("observer {:?} subscribed", id);
        Subscription { id, rx }
    }

    /// Removes a subscriber. Unknown or already-removed ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut subscribers = self.lock();
        let before = subscribers.len();
        subscribers.retain(|(sub_id, _)| *sub_id != id);
        if subscribers.len() < before {
            log::debug!("observer {:?} unsubscribed", id);
        }
    }

    /// Delivers `snapshot` to every live subscriber and returns how many
    /// received it.
    pub fn publish(&self, snapshot: Snapshot) -> usize {
        let snapshot = Arc::new(snapshot);
        let mut subscribers = self.lock();
        subscribers.retain(|(id, tx)| match tx.send(Arc::clone(&snapshot)) {
            Ok(()) => true,
            Err(_) => {
                log::debug!(
                    "observer {:?} went away before revision {}; dropping it",
                    id,
                    snapshot.revision
                );
                false
            }
        });
        subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(SubscriptionId, Sender<Arc<Snapshot>>)>> {
        // The list is only ever pushed to or filtered, so a panic elsewhere
        // cannot leave it half-updated.
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NoteId;

    fn snapshot(revision: u64) -> Snapshot {
        Snapshot {
            revision,
            notes: vec![Note::new(NoteId::new(1), "milk".into())],
        }
    }

    #[test]
    fn publish_reaches_every_subscriber() {
        let hub = Broadcaster::new();
        let a = hub.subscribe();
        let b = hub.subscribe();

        assert_eq!(hub.publish(snapshot(1)), 2);

        assert_eq!(a.try_recv().unwrap().revision, 1);
        assert_eq!(b.try_recv().unwrap().revision, 1);
        assert!(a.try_recv().is_none());
    }

    #[test]
    fn unsubscribe_stops_delivery_and_is_idempotent() {
        let hub = Broadcaster::new();
        let a = hub.subscribe();
        let b = hub.subscribe();

        hub.unsubscribe(a.id());
        hub.unsubscribe(a.id());
        assert_eq!(hub.subscriber_count(), 1);

        hub.publish(snapshot(1));
        assert!(a.try_recv().is_none());
        assert_eq!(b.try_recv().unwrap().revision, 1);
    }

    #[test]
    fn dropped_subscriber_is_pruned_without_affecting_others() {
        let hub = Broadcaster::new();
        let gone = hub.subscribe();
        let stays = hub.subscribe();
        drop(gone);

        assert_eq!(hub.publish(snapshot(1)), 1);
        assert_eq!(hub.subscriber_count(), 1);
        assert_eq!(stays.try_recv().unwrap().revision, 1);
    }

    #[test]
    fn slow_subscriber_does_not_block_publish() {
        let hub = Broadcaster::new();
        let slow = hub.subscribe();
        for rev in 1..=100 {
            hub.publish(snapshot(rev));
        }
        let revisions: Vec<u64> = slow.pending().map(|s| s.revision).collect();
        assert_eq!(revisions, (1..=100).collect::<Vec<_>>());
    }

    #[test]
    fn latest_skips_to_newest() {
        let hub = Broadcaster::new();
        let sub = hub.subscribe();
        hub.publish(snapshot(1));
        hub.publish(snapshot(2));
        assert_eq!(sub.latest().unwrap().revision, 2);
        assert!(sub.latest().is_none());
    }

    #[test]
    fn subscription_ids_are_unique() {
        let hub = Broadcaster::new();
        let a = hub.subscribe();
        let b = hub.subscribe();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn recv_ends_after_unsubscribe() {
        let hub = Broadcaster::new();
        let sub = hub.subscribe();
        hub.unsubscribe(sub.id());
        assert!(sub.recv().is_none());
    }
}
