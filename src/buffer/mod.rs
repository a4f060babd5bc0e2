//! Deferred removal events.

pub mod pending;
