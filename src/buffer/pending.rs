//! Pending-removal queue backed by a lock-free `SegQueue`.
//!
//! Mutations that remove an entry (replacement, explicit invalidation, size
//! eviction) enqueue a [`RemovalEvent`] here instead of invoking the removal
//! listener inline, so listener code never runs on the hot write path.  The
//! queue is drained — in FIFO order, exactly once per event — only by an
//! explicit [`Cache::clean_up`](crate::Cache::clean_up) call.
//!
//! The queue is unbounded: an event dropped on the floor would break
//! exactly-once delivery, so "full" must not be a reachable state.
//! `invalidate_all` bypasses this queue entirely and notifies immediately.

use crossbeam_queue::SegQueue;
use std::sync::Arc;

use crate::listener::RemovalCause;

/// A removal that has happened structurally but has not yet been reported
/// to the listener.
pub struct RemovalEvent<K, V> {
    pub key: K,
    pub value: Arc<V>,
    pub cause: RemovalCause,
}

/// Unbounded MPSC queue of pending removal events.
///
/// Multiple producer threads may call [`push`] concurrently.  A single
/// consumer (whichever thread runs `clean_up`) drains the queue via
/// [`drain`].
///
/// [`push`]: PendingRemovals::push
/// [`drain`]: PendingRemovals::drain
pub struct PendingRemovals<K, V> {
    queue: SegQueue<RemovalEvent<K, V>>,
}

impl<K: Send, V: Send + Sync> PendingRemovals<K, V> {
    pub fn new() -> Self {
        PendingRemovals {
            queue: SegQueue::new(),
        }
    }

    /// Appends `event` in FIFO order.
    #[inline]
    pub fn push(&self, event: RemovalEvent<K, V>) {
        self.queue.push(event);
    }

    /// Drains all pending events into `out`, preserving enqueue order.
    ///
    /// Callers must serialize drains (the cache holds its drain lock).
    pub fn drain(&self, out: &mut Vec<RemovalEvent<K, V>>) {
        while let Some(event) = self.queue.pop() {
            out.push(event);
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<K: Send, V: Send + Sync> Default for PendingRemovals<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_fifo_order() {
        let pending: PendingRemovals<u32, u32> = PendingRemovals::new();
        for i in 0..5 {
            pending.push(RemovalEvent {
                key: i,
                value: Arc::new(i * 10),
                cause: RemovalCause::Size,
            });
        }
        let mut out = Vec::new();
        pending.drain(&mut out);
        let keys: Vec<u32> = out.iter().map(|e| e.key).collect();
        assert_eq!(keys, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn drain_empties_the_queue() {
        let pending: PendingRemovals<u32, u32> = PendingRemovals::new();
        pending.push(RemovalEvent {
            key: 1,
            value: Arc::new(1),
            cause: RemovalCause::Explicit,
        });
        let mut out = Vec::new();
        pending.drain(&mut out);
        assert_eq!(out.len(), 1);
        assert!(pending.is_empty());
        out.clear();
        pending.drain(&mut out); // second drain yields nothing
        assert!(out.is_empty());
    }

    #[test]
    fn concurrent_pushes_are_all_drained() {
        let pending: Arc<PendingRemovals<u64, u64>> = Arc::new(PendingRemovals::new());
        let mut handles = Vec::new();
        for t in 0..4u64 {
            let p = Arc::clone(&pending);
            handles.push(std::thread::spawn(move || {
                for j in 0..100u64 {
                    p.push(RemovalEvent {
                        key: t * 1000 + j,
                        value: Arc::new(j),
                        cause: RemovalCause::Size,
                    });
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        let mut out = Vec::new();
        pending.drain(&mut out);
        assert_eq!(out.len(), 400);
    }
}
