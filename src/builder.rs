use std::hash::Hash;
use crate::cache::Cache;
use crate::listener::{FnListener, RemovalListener};
use crate::weigher::{FnWeigher, UnitWeigher, Weigher};

/// Builder for configuring and constructing a [`Cache`].
///
/// # Example
/// ```
/// use cortado::CacheBuilder;
///
/// let cache: cortado::Cache<String, String> = CacheBuilder::new(1_000)
///     .weigher(|_k: &String, v: &String| v.len() as u64)
///     .build();
/// ```
pub struct CacheBuilder<K, V> {
    max_capacity: u64,
    num_shards: usize,
    weigher: Box<dyn Weigher<K, V>>,
    listener: Option<Box<dyn RemovalListener<K, V>>>,
}

impl<K: 'static, V: 'static> CacheBuilder<K, V> {
    pub fn new(max_capacity: u64) -> Self {
        assert!(max_capacity > 0, "max_capacity must be greater than 0");
        CacheBuilder {
            max_capacity,
            num_shards: 64,
            weigher: Box::new(UnitWeigher),
            listener: None,
        }
    }

    /// Set the number of internal store shards (must be a power of two;
    /// default: 64).
    pub fn num_shards(mut self, n: usize) -> Self {
        assert!(n > 0 && n.is_power_of_two(), "num_shards must be a power of two");
        self.num_shards = n;
        self
    }

    /// Register a removal listener closure.
    ///
    /// The closure runs once per removed entry with the removal cause.  For
    /// `insert`/`invalidate`/size evictions delivery is deferred to the next
    /// [`clean_up`](Cache::clean_up); for
    /// [`invalidate_all`](Cache::invalidate_all) it is immediate.  Do **not**
    /// call cache methods from within the closure.
    ///
    /// # Example
    /// ```
    /// use cortado::CacheBuilder;
    /// use cortado::listener::RemovalCause;
    ///
    /// let cache: cortado::Cache<u64, u64> = CacheBuilder::new(10)
    ///     .removal_listener(|key: &u64, _val, cause| {
    ///         println!("removed key={key} cause={cause:?}");
    ///     })
    ///     .build();
    /// ```
    pub fn removal_listener<F>(mut self, f: F) -> Self
    where
        F: Fn(&K, std::sync::Arc<V>, crate::listener::RemovalCause) + Send + Sync + 'static,
    {
        self.listener = Some(Box::new(FnListener(f)));
        self
    }

    /// Register a removal listener via the [`RemovalListener`] trait.
    pub fn removal_listener_impl<L: RemovalListener<K, V>>(mut self, l: L) -> Self {
        self.listener = Some(Box::new(l));
        self
    }

    /// Set a custom entry weigher via closure.
    ///
    /// # Example
    /// ```
    /// use cortado::CacheBuilder;
    ///
    /// let cache: cortado::Cache<String, Vec<u8>> = CacheBuilder::new(4096)
    ///     .weigher(|_k: &String, v: &Vec<u8>| v.len() as u64)
    ///     .build();
    /// ```
    pub fn weigher<F>(mut self, f: F) -> Self
    where
        F: Fn(&K, &V) -> u64 + Send + Sync + 'static,
    {
        self.weigher = Box::new(FnWeigher(f));
        self
    }

    /// Set a weigher using any type that implements the [`Weigher`] trait.
    pub fn weigher_impl<W: Weigher<K, V>>(mut self, w: W) -> Self {
        self.weigher = Box::new(w);
        self
    }
}

impl<K, V> CacheBuilder<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    pub fn build(self) -> Cache<K, V> {
        Cache::new(
            self.max_capacity,
            self.num_shards,
            self.weigher,
            self.listener,
        )
    }
}
