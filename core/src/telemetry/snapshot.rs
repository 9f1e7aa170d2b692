//! telemetry/snapshot.rs
//!
//! Immutable summaries built from counters, serializable for reports.

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::{ReaderCounters, WriterCounters};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub containers: u64,
    pub records: u64,
    pub bytes_uncompressed: u64,
    pub bytes_compressed: u64,
    /// compressed / uncompressed, capped at 1.0; 0.0 when nothing was processed.
    pub compression_ratio: f64,
}

fn ratio(compressed: u64, uncompressed: u64) -> f64 {
    if uncompressed == 0 {
        return 0.0;
    }
    (compressed as f64 / uncompressed as f64).min(1.0)
}

impl TelemetrySnapshot {
    pub fn from_reader(c: &ReaderCounters) -> Self {
        Self {
            containers: c.containers_read,
            records: c.records_decoded,
            bytes_uncompressed: c.bytes_inflated,
            bytes_compressed: c.bytes_compressed,
            compression_ratio: ratio(c.bytes_compressed, c.bytes_inflated),
        }
    }

    pub fn from_writer(c: &WriterCounters) -> Self {
        Self {
            containers: c.containers_written,
            records: c.objects_written,
            bytes_uncompressed: c.bytes_uncompressed,
            bytes_compressed: c.bytes_compressed,
            compression_ratio: ratio(c.bytes_compressed, c.bytes_uncompressed),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
