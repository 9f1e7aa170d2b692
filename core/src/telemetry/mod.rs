//! telemetry/mod.rs
//! Counters collected while reading and writing, plus serializable snapshots.
//!
//! Notes:
//! - Counters are plain fields owned by the reader/writer; no atomics.
//! - Snapshots are immutable copies with derived ratios.

pub mod counters;
pub mod snapshot;

pub use counters::*;
pub use snapshot::*;
