//! Eviction policy.
//!
//! The bounded cache uses a single policy: weighted LRU.  The policy owns
//! both the recency order and the weight accounting, and is driven
//! synchronously from inside every mutating cache call, so the weight bound
//! holds the moment a mutator returns — no maintenance pass is required for
//! capacity, only for listener delivery.

pub mod lru;
