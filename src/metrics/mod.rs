//! Operation counters and their snapshot type.

pub mod stats;
