mod builder;
mod cache;
mod metrics;
mod policy;
mod store;
mod unbounded;
pub mod buffer;
pub mod listener;
pub mod weigher;

pub use builder::CacheBuilder;
pub use cache::Cache;
pub use metrics::stats::Metrics;
pub use unbounded::UnboundedCache;
