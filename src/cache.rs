use std::hash::Hash;
use std::sync::Arc;
use parking_lot::Mutex;

use crate::buffer::pending::{PendingRemovals, RemovalEvent};
use crate::builder::CacheBuilder;
use crate::listener::{RemovalCause, RemovalListener};
use crate::metrics::stats::{Metrics, StatsCounter};
use crate::policy::lru::LruPolicy;
use crate::store::sharded::ShardedStore;
use crate::weigher::Weigher;

// ---------------------------------------------------------------------------
// Cache interior
// ---------------------------------------------------------------------------

/// Shared interior of a [`Cache`].
pub(crate) struct Inner<K, V> {
    pub(crate) store: ShardedStore<K, V>,
    pub(crate) policy: Mutex<LruPolicy<K>>,
    pub(crate) weigher: Box<dyn Weigher<K, V>>,
    /// Optional removal listener.  `None` if the user didn't register one.
    pub(crate) listener: Option<Box<dyn RemovalListener<K, V>>>,
    pub(crate) pending: PendingRemovals<K, V>,
    pub(crate) drain_lock: Mutex<()>,
    pub(crate) max_capacity: u64,
    pub(crate) metrics: StatsCounter,
}

// ---------------------------------------------------------------------------
// Cache handle
// ---------------------------------------------------------------------------

/// A bounded in-memory cache with weighted LRU eviction and deferred
/// removal notification.
///
/// The cache keeps `weighted_size() <= max_capacity()` the moment any
/// mutating call returns: eviction runs synchronously inside [`insert`].
/// What *is* deferred is listener delivery — removals caused by `insert`,
/// [`invalidate`], and size eviction queue a removal event that is only
/// delivered on the next [`clean_up`] call.  [`invalidate_all`] is the
/// exception and notifies immediately.
///
/// [`insert`]: Cache::insert
/// [`invalidate`]: Cache::invalidate
/// [`invalidate_all`]: Cache::invalidate_all
/// [`clean_up`]: Cache::clean_up
///
/// # Example
/// ```
/// use cortado::CacheBuilder;
/// use std::sync::Arc;
///
/// let cache: cortado::Cache<String, String> = CacheBuilder::new(100).build();
/// cache.insert("hello".to_string(), "world".to_string());
/// assert_eq!(cache.get(&"hello".to_string()), Some(Arc::new("world".to_string())));
/// ```
pub struct Cache<K, V> {
    inner: Arc<Inner<K, V>>,
}

impl<K, V> Clone for Cache<K, V> {
    fn clone(&self) -> Self {
        Cache {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> Cache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    pub(crate) fn new(
        max_capacity: u64,
        num_shards: usize,
        weigher: Box<dyn Weigher<K, V>>,
        listener: Option<Box<dyn RemovalListener<K, V>>>,
    ) -> Self {
        Cache {
            inner: Arc::new(Inner {
                store: ShardedStore::new(num_shards),
                policy: Mutex::new(LruPolicy::new(max_capacity)),
                weigher,
                listener,
                pending: PendingRemovals::new(),
                drain_lock: Mutex::new(()),
                max_capacity,
                metrics: StatsCounter::new(),
            }),
        }
    }

    /// Returns a [`CacheBuilder`] for constructing a new cache.
    pub fn builder(max_capacity: u64) -> CacheBuilder<K, V> {
        CacheBuilder::new(max_capacity)
    }

    // -----------------------------------------------------------------------
    // Hot-path: insert
    // -----------------------------------------------------------------------

    /// Inserts `value` for `key`.  If the key already exists the value is
    /// replaced and a `Replaced` event (carrying the old value) is queued.
    ///
    /// The entry's weight is computed once, here.  If the insert pushes the
    /// total weight past `max_capacity`, least-recently-used entries are
    /// evicted before this call returns, each queueing a `Size` event.
    pub fn insert(&self, key: K, value: V) {
        let weight = self.inner.weigher.weigh(&key, &value);

        let mut policy = self.inner.policy.lock();
        let old = self.inner.store.insert(key.clone(), value);
        let victims = policy.insert(key.clone(), weight);
        // Remove victims from the store under the same critical section so
        // the store and the recency order never disagree about membership.
        let mut evicted: Vec<(K, Arc<V>)> = Vec::with_capacity(victims.len());
        for victim in victims {
            if let Some(v) = self.inner.store.remove(&victim) {
                evicted.push((victim, v));
            }
        }
        drop(policy);

        // Queue order matches causal order: the replacement happened before
        // the evictions it may have triggered.
        if let Some(old_value) = old {
            self.inner.pending.push(RemovalEvent {
                key,
                value: old_value,
                cause: RemovalCause::Replaced,
            });
        }
        let evicted_count = evicted.len() as u64;
        for (k, v) in evicted {
            self.inner.pending.push(RemovalEvent {
                key: k,
                value: v,
                cause: RemovalCause::Size,
            });
        }
        if evicted_count > 0 {
            self.inner.metrics.record_evictions(evicted_count);
        }
    }

    // -----------------------------------------------------------------------
    // Hot-path: get / peek / contains
    // -----------------------------------------------------------------------

    /// Returns the value for `key` and promotes it to most-recently-used.
    ///
    /// A miss returns `None` and mutates nothing.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        // Promotion mutates the recency order, so a hit must be serialized
        // with writers under the policy lock.
        let mut policy = self.inner.policy.lock();
        match self.inner.store.get(key) {
            Some(value) => {
                policy.record_access(key);
                drop(policy);
                self.inner.metrics.record_hit();
                Some(value)
            }
            None => {
                drop(policy);
                self.inner.metrics.record_miss();
                None
            }
        }
    }

    /// Returns the value for `key` **without** promoting it.
    ///
    /// Any number of `peek` calls leaves the eviction order exactly as if
    /// they had never happened.
    pub fn peek(&self, key: &K) -> Option<Arc<V>> {
        self.inner.store.get(key)
    }

    /// Returns `true` if the key is present.  No recency effect.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.store.contains(key)
    }

    // -----------------------------------------------------------------------
    // Removal
    // -----------------------------------------------------------------------

    /// Removes the entry for `key`, queueing an `Explicit` event.
    ///
    /// A no-op (and no event) if the key is absent.
    pub fn invalidate(&self, key: &K) {
        let mut policy = self.inner.policy.lock();
        let removed = self.inner.store.remove(key);
        if removed.is_some() {
            policy.remove(key);
        }
        drop(policy);

        if let Some(value) = removed {
            self.inner.pending.push(RemovalEvent {
                key: key.clone(),
                value,
                cause: RemovalCause::Explicit,
            });
        }
    }

    /// Removes all entries and notifies the listener **immediately** — once
    /// per removed entry, cause `Explicit`, in least- to most-recently-used
    /// order — without requiring a [`clean_up`](Cache::clean_up) call.
    ///
    /// Events already queued by earlier operations stay queued.
    pub fn invalidate_all(&self) {
        let mut policy = self.inner.policy.lock();
        let keys = policy.keys_in_order();
        let mut removed: Vec<(K, Arc<V>)> = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(value) = self.inner.store.remove(&key) {
                removed.push((key, value));
            }
        }
        *policy = LruPolicy::new(self.inner.max_capacity);
        drop(policy);

        if let Some(listener) = &self.inner.listener {
            for (key, value) in removed {
                listener.on_removal(&key, value, RemovalCause::Explicit);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Maintenance
    // -----------------------------------------------------------------------

    /// Drains the pending-removal queue, invoking the removal listener once
    /// per event in the order the removals happened.
    ///
    /// Notification is strictly pull-based: until `clean_up` is called the
    /// listener has not run for any `insert`/`invalidate`/eviction removal.
    /// Without a configured listener the drained events are dropped.
    pub fn clean_up(&self) {
        // Single-consumer drain; concurrent clean_up calls take turns.
        let _guard = self.inner.drain_lock.lock();
        let mut events: Vec<RemovalEvent<K, V>> = Vec::new();
        self.inner.pending.drain(&mut events);
        if let Some(listener) = &self.inner.listener {
            for event in events {
                listener.on_removal(&event.key, event.value, event.cause);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Introspection
    // -----------------------------------------------------------------------

    /// Snapshot of all resident keys, least- to most-recently-used.
    ///
    /// Eviction runs synchronously inside `insert`, so the snapshot always
    /// reflects the capacity bound even if `clean_up` has never been called.
    pub fn keys(&self) -> Vec<K> {
        self.inner.policy.lock().keys_in_order()
    }

    /// Sum of the weights of all resident entries.
    ///
    /// Never exceeds [`max_capacity`](Cache::max_capacity) once a mutating
    /// call has returned.
    pub fn weighted_size(&self) -> u64 {
        self.inner.policy.lock().current_weight()
    }

    /// The configured weight ceiling.
    pub fn max_capacity(&self) -> u64 {
        self.inner.max_capacity
    }

    /// Number of resident entries (distinct from their total weight).
    pub fn entry_count(&self) -> usize {
        self.inner.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.store.is_empty()
    }

    pub fn stats(&self) -> Metrics {
        self.inner.metrics.snapshot()
    }
}
