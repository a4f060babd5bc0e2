use std::hash::Hash;
use std::sync::Arc;
use ahash::{AHashMap, RandomState};
use parking_lot::RwLock;

// ---------------------------------------------------------------------------
// Shard
// ---------------------------------------------------------------------------

/// Cache-line padding to prevent false sharing between shards.
#[repr(align(64))]
pub(crate) struct Shard<K, V> {
    pub(crate) map: RwLock<AHashMap<K, Arc<V>>>,
}

// ---------------------------------------------------------------------------
// ShardedStore
// ---------------------------------------------------------------------------

/// A thread-safe key-value store backed by `N` independently-locked shards.
///
/// Reads use a shared lock, writes use an exclusive lock, both per-shard.
/// Values are held behind `Arc` so a removal can hand the value to the
/// removal listener without cloning the payload.
pub struct ShardedStore<K, V> {
    shards: Box<[Shard<K, V>]>,
    /// Always `shards.len() - 1`; shards.len() is a power of two.
    shard_mask: usize,
    /// Hasher used only to compute shard indices.
    build_hasher: RandomState,
}

impl<K: Hash + Eq + Clone, V> ShardedStore<K, V> {
    pub fn new(num_shards: usize) -> Self {
        assert!(num_shards.is_power_of_two());
        let shards = (0..num_shards)
            .map(|_| Shard {
                map: RwLock::new(AHashMap::new()),
            })
            .collect::<Vec<_>>()
            .into_boxed_slice();

        ShardedStore {
            shards,
            shard_mask: num_shards - 1,
            build_hasher: RandomState::new(),
        }
    }

    #[inline]
    fn shard_index(&self, key: &K) -> usize {
        let h = self.build_hasher.hash_one(key);
        // Use the high bits (better avalanche from ahash).
        ((h >> 32) as usize) & self.shard_mask
    }

    // -----------------------------------------------------------------------
    // Core operations
    // -----------------------------------------------------------------------

    /// Returns the value for `key`, or `None` if absent.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        let idx = self.shard_index(key);
        self.shards[idx].map.read().get(key).map(Arc::clone)
    }

    /// Inserts `value` for `key`.  Returns the previous value, if any.
    pub fn insert(&self, key: K, value: V) -> Option<Arc<V>> {
        let idx = self.shard_index(&key);
        self.shards[idx].map.write().insert(key, Arc::new(value))
    }

    /// Removes the entry for `key`.  Returns the removed value, if any.
    pub fn remove(&self, key: &K) -> Option<Arc<V>> {
        let idx = self.shard_index(key);
        self.shards[idx].map.write().remove(key)
    }

    /// Returns `true` if the key is present.
    pub fn contains(&self, key: &K) -> bool {
        let idx = self.shard_index(key);
        self.shards[idx].map.read().contains_key(key)
    }

    /// Returns the total number of entries across all shards.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.map.read().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|s| s.map.read().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_get_remove_round_trip() {
        let store: ShardedStore<String, u32> = ShardedStore::new(4);
        assert!(store.insert("a".into(), 1).is_none());
        assert_eq!(store.get(&"a".to_string()), Some(Arc::new(1)));
        assert_eq!(store.remove(&"a".to_string()), Some(Arc::new(1)));
        assert!(store.get(&"a".to_string()).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn insert_returns_previous_value() {
        let store: ShardedStore<u32, &str> = ShardedStore::new(4);
        assert!(store.insert(7, "old").is_none());
        assert_eq!(store.insert(7, "new"), Some(Arc::new("old")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn len_spans_all_shards() {
        let store: ShardedStore<u32, u32> = ShardedStore::new(8);
        for i in 0..100 {
            store.insert(i, i);
        }
        assert_eq!(store.len(), 100);
        assert!(store.contains(&42));
        assert!(!store.contains(&1000));
    }
}
