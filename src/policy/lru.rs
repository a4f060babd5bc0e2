use std::hash::Hash;
use ahash::AHashMap;

/// Sentinel indices in the `nodes` arena.
const HEAD: usize = 0; // most-recently-used end
const TAIL: usize = 1; // least-recently-used end
const NULL: usize = usize::MAX;

struct LruNode<K> {
    /// `None` only for the HEAD and TAIL sentinels and freed slots.
    key: Option<K>,
    weight: u64,
    /// Index toward HEAD (more recently used).
    prev: usize,
    /// Index toward TAIL (less recently used).
    next: usize,
}

/// O(1) weighted LRU policy backed by an index-arena doubly-linked list.
///
/// Nodes are stored in a `Vec<LruNode<K>>` and linked by index, avoiding
/// raw pointers and ownership cycles at the cost of a little indirection.
/// The policy tracks the running total weight; [`insert`](LruPolicy::insert)
/// evicts from the least-recently-used end until the total is back within
/// `max_weight`.
///
/// Among entries that were never accessed after insertion, eviction order is
/// insertion order: earliest inserted, first evicted.
pub struct LruPolicy<K> {
    /// Index 0 = HEAD sentinel, 1 = TAIL sentinel, 2+ = real entries.
    nodes: Vec<LruNode<K>>,
    /// Maps a key to its index in `nodes`.
    map: AHashMap<K, usize>,
    /// Indices of freed (reusable) slots.
    free_list: Vec<usize>,
    total_weight: u64,
    max_weight: u64,
}

impl<K: Hash + Eq + Clone> LruPolicy<K> {
    /// Creates a new `LruPolicy` with the given maximum total weight.
    pub fn new(max_weight: u64) -> Self {
        let mut nodes: Vec<LruNode<K>> = Vec::with_capacity(16);
        // HEAD sentinel (index 0): next points to TAIL initially
        nodes.push(LruNode {
            key: None,
            weight: 0,
            prev: NULL,
            next: TAIL,
        });
        // TAIL sentinel (index 1): prev points to HEAD initially
        nodes.push(LruNode {
            key: None,
            weight: 0,
            prev: HEAD,
            next: NULL,
        });

        LruPolicy {
            nodes,
            map: AHashMap::new(),
            free_list: Vec::new(),
            total_weight: 0,
            max_weight,
        }
    }

    /// Links `idx` immediately after the HEAD sentinel (marks it most-recently-used).
    fn link_after_head(&mut self, idx: usize) {
        let old_first = self.nodes[HEAD].next;
        self.nodes[idx].prev = HEAD;
        self.nodes[idx].next = old_first;
        self.nodes[HEAD].next = idx;
        self.nodes[old_first].prev = idx;
    }

    /// Detaches `idx` from its current position in the list.
    fn unlink(&mut self, idx: usize) {
        let prev = self.nodes[idx].prev;
        let next = self.nodes[idx].next;
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
        self.nodes[idx].prev = NULL;
        self.nodes[idx].next = NULL;
    }

    /// Allocates a new node (reusing from the free list when available).
    fn alloc_node(&mut self, key: K, weight: u64) -> usize {
        if let Some(idx) = self.free_list.pop() {
            self.nodes[idx].key = Some(key);
            self.nodes[idx].weight = weight;
            self.nodes[idx].prev = NULL;
            self.nodes[idx].next = NULL;
            idx
        } else {
            let idx = self.nodes.len();
            self.nodes.push(LruNode {
                key: Some(key),
                weight,
                prev: NULL,
                next: NULL,
            });
            idx
        }
    }

    /// Subtracts `weight` from the running total.
    ///
    /// The total going negative means the policy and its callers disagree
    /// about which entries are linked — a bug, not a user-facing condition.
    fn debit(&mut self, weight: u64) {
        debug_assert!(
            self.total_weight >= weight,
            "weight accounting drifted negative"
        );
        self.total_weight = self.total_weight.saturating_sub(weight);
    }

    /// Removes and returns the least-recently-used entry, or `None` if empty.
    fn pop_least_recent(&mut self) -> Option<(K, u64)> {
        let lru_idx = self.nodes[TAIL].prev;
        if lru_idx == HEAD {
            return None; // list is empty
        }
        self.unlink(lru_idx);
        let key = self.nodes[lru_idx].key.take()?;
        let weight = self.nodes[lru_idx].weight;
        self.map.remove(&key);
        self.free_list.push(lru_idx);
        Some((key, weight))
    }

    /// Evicts from the LRU end until `total_weight <= max_weight`.
    ///
    /// A freshly inserted entry that alone outweighs `max_weight` is not
    /// exempt: the loop runs until the bound holds, even if that makes the
    /// new entry itself the final victim.
    fn drain_evictions(&mut self) -> Vec<K> {
        let mut evicted = Vec::new();
        while self.total_weight > self.max_weight {
            match self.pop_least_recent() {
                Some((key, weight)) => {
                    self.debit(weight);
                    evicted.push(key);
                }
                None => break,
            }
        }
        evicted
    }

    // -----------------------------------------------------------------------
    // Operations driven by the cache
    // -----------------------------------------------------------------------

    /// Promotes `key` to most-recently-used.  No-op for untracked keys.
    pub fn record_access(&mut self, key: &K) {
        if let Some(&idx) = self.map.get(key) {
            self.unlink(idx);
            self.link_after_head(idx);
        }
    }

    /// Tracks an insert (or replacement) of `key` with `weight`, promotes it
    /// to most-recently-used, and returns the keys that had to be evicted to
    /// keep the total weight within bounds, in eviction order.
    pub fn insert(&mut self, key: K, weight: u64) -> Vec<K> {
        if let Some(&idx) = self.map.get(&key) {
            // Replacement: the old entry's weight is retired, the new value's
            // weight takes its place.
            let old_weight = self.nodes[idx].weight;
            self.nodes[idx].weight = weight;
            self.debit(old_weight);
            self.total_weight += weight;
            self.unlink(idx);
            self.link_after_head(idx);
        } else {
            let idx = self.alloc_node(key.clone(), weight);
            self.map.insert(key, idx);
            self.link_after_head(idx);
            self.total_weight += weight;
        }
        self.drain_evictions()
    }

    /// Stops tracking `key` and retires its weight.  No-op if untracked.
    pub fn remove(&mut self, key: &K) {
        if let Some(idx) = self.map.remove(key) {
            let weight = self.nodes[idx].weight;
            self.unlink(idx);
            self.nodes[idx].key = None;
            self.free_list.push(idx);
            self.debit(weight);
        }
    }

    /// Snapshot of all tracked keys, least- to most-recently-used.
    pub fn keys_in_order(&self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.map.len());
        let mut idx = self.nodes[TAIL].prev;
        while idx != HEAD {
            if let Some(key) = &self.nodes[idx].key {
                keys.push(key.clone());
            }
            idx = self.nodes[idx].prev;
        }
        keys
    }

    /// Total weight of all tracked entries.
    pub fn current_weight(&self) -> u64 {
        self.total_weight
    }

    /// Maximum total weight allowed.
    pub fn max_weight(&self) -> u64 {
        self.max_weight
    }

    /// Number of tracked entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_lru_entry_when_full() {
        let mut policy: LruPolicy<&str> = LruPolicy::new(2);
        assert!(policy.insert("a", 1).is_empty());
        assert!(policy.insert("b", 1).is_empty());
        let evicted = policy.insert("c", 1);
        assert_eq!(evicted, vec!["a"]); // "a" is LRU
    }

    #[test]
    fn access_promotes_to_mru() {
        let mut policy: LruPolicy<&str> = LruPolicy::new(2);
        policy.insert("a", 1);
        policy.insert("b", 1);
        policy.record_access(&"a"); // "a" is now MRU, "b" is LRU
        let evicted = policy.insert("c", 1);
        assert_eq!(evicted, vec!["b"]); // "b" is evicted
    }

    #[test]
    fn remove_retires_weight() {
        let mut policy: LruPolicy<&str> = LruPolicy::new(3);
        policy.insert("a", 1);
        policy.insert("b", 1);
        policy.remove(&"a");
        assert_eq!(policy.current_weight(), 1);
        assert_eq!(policy.insert("c", 1).len(), 0);
        assert_eq!(policy.insert("d", 1).len(), 0); // still under cap=3
    }

    #[test]
    fn replacement_swaps_weight_in_place() {
        let mut policy: LruPolicy<&str> = LruPolicy::new(10);
        policy.insert("a", 3);
        policy.insert("b", 2);
        assert!(policy.insert("a", 5).is_empty());
        assert_eq!(policy.current_weight(), 7); // 5 + 2, not 3 + 5 + 2
        assert_eq!(policy.len(), 2);
    }

    #[test]
    fn heavy_insert_evicts_multiple_light_entries() {
        let mut policy: LruPolicy<&str> = LruPolicy::new(5);
        policy.insert("a", 2);
        policy.insert("b", 2);
        let evicted = policy.insert("c", 4);
        assert_eq!(evicted, vec!["a", "b"]); // both light entries make way
        assert_eq!(policy.current_weight(), 4);
    }

    #[test]
    fn entry_heavier_than_capacity_ends_up_evicted_too() {
        let mut policy: LruPolicy<&str> = LruPolicy::new(3);
        policy.insert("a", 1);
        let evicted = policy.insert("huge", 10);
        // The bound must hold after insert returns, so the over-weight entry
        // is admitted and then becomes the final victim itself.
        assert_eq!(evicted, vec!["a", "huge"]);
        assert_eq!(policy.current_weight(), 0);
        assert_eq!(policy.len(), 0);
    }

    #[test]
    fn zero_weight_entries_are_free() {
        let mut policy: LruPolicy<u32> = LruPolicy::new(1);
        for i in 0..50 {
            assert!(policy.insert(i, 0).is_empty());
        }
        assert_eq!(policy.len(), 50);
        assert_eq!(policy.current_weight(), 0);
    }

    #[test]
    fn keys_in_order_runs_lru_to_mru() {
        let mut policy: LruPolicy<u32> = LruPolicy::new(10);
        policy.insert(1, 1);
        policy.insert(2, 1);
        policy.insert(3, 1);
        policy.record_access(&1);
        assert_eq!(policy.keys_in_order(), vec![2, 3, 1]);
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut policy: LruPolicy<u32> = LruPolicy::new(2);
        for i in 0..100 {
            policy.insert(i, 1);
        }
        // cap 2 → at most 2 live nodes + 2 sentinels + a small free pool.
        assert!(policy.nodes.len() <= 8, "arena grew: {}", policy.nodes.len());
        assert_eq!(policy.len(), 2);
    }
}
