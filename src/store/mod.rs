//! Entry storage.
//!
//! The store owns the key → value mapping and nothing else: no weight, no
//! recency, no listener.  Those concerns live in the policy and the cache
//! layer, which keep the store and the recency order in lockstep.

pub mod sharded;
