use std::hash::Hash;
use std::sync::Arc;
use ahash::AHashMap;
use parking_lot::RwLock;

use crate::listener::{FnListener, RemovalCause, RemovalListener};

/// Shared interior of an [`UnboundedCache`].
struct Inner<K, V> {
    map: RwLock<AHashMap<K, Arc<V>>>,
    listener: Option<Box<dyn RemovalListener<K, V>>>,
}

/// An unbounded companion to [`Cache`](crate::Cache): the same surface with
/// no capacity, weigher, or eviction policy.
///
/// Because nothing is ever evicted for size reasons, there is no maintenance
/// step either — the removal listener is invoked **synchronously** on every
/// removal, and only `Explicit` and `Replaced` causes can occur.  Useful as
/// a baseline when measuring what the bounded engine's policy buys you.
///
/// # Example
/// ```
/// use cortado::UnboundedCache;
///
/// let cache: UnboundedCache<&str, u32> = UnboundedCache::new();
/// cache.insert("a", 1);
/// assert_eq!(cache.get(&"a"), Some(std::sync::Arc::new(1)));
/// ```
pub struct UnboundedCache<K, V> {
    inner: Arc<Inner<K, V>>,
}

impl<K, V> Clone for UnboundedCache<K, V> {
    fn clone(&self) -> Self {
        UnboundedCache {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> UnboundedCache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    /// Creates an unbounded cache with no removal listener.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Creates an unbounded cache that invokes `f` synchronously on every
    /// removal.
    pub fn with_listener<F>(f: F) -> Self
    where
        F: Fn(&K, Arc<V>, RemovalCause) + Send + Sync + 'static,
    {
        Self::build(Some(Box::new(FnListener(f))))
    }

    fn build(listener: Option<Box<dyn RemovalListener<K, V>>>) -> Self {
        UnboundedCache {
            inner: Arc::new(Inner {
                map: RwLock::new(AHashMap::new()),
                listener,
            }),
        }
    }

    /// Inserts `value` for `key`.  Replacing an existing value invokes the
    /// listener with `Replaced` and the old value before returning.
    pub fn insert(&self, key: K, value: V) {
        let old = self.inner.map.write().insert(key.clone(), Arc::new(value));
        if let (Some(old_value), Some(listener)) = (old, &self.inner.listener) {
            listener.on_removal(&key, old_value, RemovalCause::Replaced);
        }
    }

    /// Returns the value for `key`, or `None`.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.inner.map.read().get(key).map(Arc::clone)
    }

    /// Identical to [`get`](UnboundedCache::get); with no recency order to
    /// perturb, the two only differ on the bounded cache.
    pub fn peek(&self, key: &K) -> Option<Arc<V>> {
        self.get(key)
    }

    /// Returns `true` if the key is present.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.map.read().contains_key(key)
    }

    /// Removes the entry for `key`, invoking the listener with `Explicit`
    /// before returning.  A no-op if the key is absent.
    pub fn invalidate(&self, key: &K) {
        let removed = self.inner.map.write().remove(key);
        if let (Some(value), Some(listener)) = (removed, &self.inner.listener) {
            listener.on_removal(key, value, RemovalCause::Explicit);
        }
    }

    /// Removes all entries, invoking the listener once per entry with
    /// `Explicit` before returning.
    pub fn invalidate_all(&self) {
        let drained: Vec<(K, Arc<V>)> = self.inner.map.write().drain().collect();
        if let Some(listener) = &self.inner.listener {
            for (key, value) in drained {
                listener.on_removal(&key, value, RemovalCause::Explicit);
            }
        }
    }

    /// Snapshot of all resident keys, in unspecified order.
    pub fn keys(&self) -> Vec<K> {
        self.inner.map.read().keys().cloned().collect()
    }

    /// Number of resident entries.
    pub fn entry_count(&self) -> usize {
        self.inner.map.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.map.read().is_empty()
    }
}

impl<K, V> Default for UnboundedCache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
