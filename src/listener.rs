//! Removal listener — a callback invoked whenever an entry leaves the cache.
//!
//! For the bounded [`Cache`](crate::Cache), removals caused by `insert`,
//! `invalidate`, and size eviction are **deferred**: they are queued and
//! delivered in order on the next [`clean_up`](crate::Cache::clean_up) call.
//! [`invalidate_all`](crate::Cache::invalidate_all) is the one exception and
//! delivers immediately.  The [`UnboundedCache`](crate::UnboundedCache)
//! companion delivers synchronously on every removal.
//!
//! # Example
//! ```
//! use cortado::CacheBuilder;
//! use cortado::listener::RemovalCause;
//! use std::sync::{Arc, Mutex};
//!
//! let log: Arc<Mutex<Vec<(u64, RemovalCause)>>> = Arc::new(Mutex::new(Vec::new()));
//! let log2 = Arc::clone(&log);
//!
//! let cache: cortado::Cache<u64, u64> = CacheBuilder::new(2)
//!     .removal_listener(move |key: &u64, _val, cause| {
//!         log2.lock().unwrap().push((*key, cause));
//!     })
//!     .build();
//!
//! cache.insert(1, 10);
//! cache.insert(2, 20);
//! cache.insert(3, 30); // size eviction, queued
//! cache.clean_up();    // delivered here
//! assert_eq!(log.lock().unwrap().as_slice(), &[(1, RemovalCause::Size)]);
//! ```

use std::sync::Arc;

// ---------------------------------------------------------------------------
// RemovalCause
// ---------------------------------------------------------------------------

/// The reason an entry was removed from the cache.
///
/// This is a closed set: no other causes exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemovalCause {
    /// Removed by the caller, via [`Cache::invalidate`] or
    /// [`Cache::invalidate_all`].
    ///
    /// [`Cache::invalidate`]: crate::Cache::invalidate
    /// [`Cache::invalidate_all`]: crate::Cache::invalidate_all
    Explicit,
    /// The value was overwritten by an [`insert`](crate::Cache::insert) under
    /// an existing key; the event carries the **old** value.
    Replaced,
    /// Evicted by the cache itself to keep the total weight within
    /// [`max_capacity`](crate::Cache::max_capacity).
    Size,
}

// ---------------------------------------------------------------------------
// RemovalListener trait
// ---------------------------------------------------------------------------

/// A callback invoked for each entry removed from the cache.
///
/// Implementations must be `Send + Sync + 'static` so the listener can be
/// invoked from whichever thread runs maintenance.
///
/// The callback receives:
/// - a reference to the removed key,
/// - a shared reference to the removed value (`Arc<V>`),
/// - the reason for removal.
///
/// Callbacks run outside the cache's internal locks, so a slow listener
/// cannot block readers.  Mutating the cache from inside the listener is
/// discouraged all the same: removals it triggers will be interleaved with
/// the batch currently being delivered.
pub trait RemovalListener<K, V>: Send + Sync + 'static {
    fn on_removal(&self, key: &K, value: Arc<V>, cause: RemovalCause);
}

/// A [`RemovalListener`] backed by a closure.
///
/// Created via [`CacheBuilder::removal_listener`](crate::CacheBuilder::removal_listener).
pub struct FnListener<F>(pub F);

impl<K, V, F> RemovalListener<K, V> for FnListener<F>
where
    F: Fn(&K, Arc<V>, RemovalCause) + Send + Sync + 'static,
{
    fn on_removal(&self, key: &K, value: Arc<V>, cause: RemovalCause) {
        (self.0)(key, value, cause)
    }
}
