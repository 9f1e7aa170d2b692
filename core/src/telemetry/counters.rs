//! telemetry/counters.rs
//! Mutable counters updated by `BlfReader` and `BlfWriter`.
use std::ops::AddAssign;
use serde::{Deserialize, Serialize};

/// Collected while reading a file.
#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReaderCounters {
    pub containers_read: u64,
    /// Unknown compression, failed inflate or size mismatch.
    pub containers_discarded: u64,
    /// Top-level objects that were not log containers.
    pub objects_ignored: u64,
    pub records_decoded: u64,
    /// Objects of types this codec does not interpret.
    pub records_unknown: u64,
    /// Objects with an unsupported header or short payload.
    pub objects_skipped: u64,
    pub bytes_compressed: u64,
    pub bytes_inflated: u64,
    /// Partial object dropped at end of file.
    pub bytes_dangling: u64,
    /// Bytes dropped while searching for the next object after a discarded container.
    pub bytes_resynced: u64,
}

impl ReaderCounters {
    pub fn add_container(&mut self, compressed_len: usize, inflated_len: usize) {
        self.containers_read += 1;
        self.bytes_compressed += compressed_len as u64;
        self.bytes_inflated += inflated_len as u64;
    }

    pub fn add_discarded(&mut self, compressed_len: usize) {
        self.containers_discarded += 1;
        self.bytes_compressed += compressed_len as u64;
    }

    pub fn merge(&mut self, other: &ReaderCounters) {
        self.containers_read += other.containers_read;
        self.containers_discarded += other.containers_discarded;
        self.objects_ignored += other.objects_ignored;
        self.records_decoded += other.records_decoded;
        self.records_unknown += other.records_unknown;
        self.objects_skipped += other.objects_skipped;
        self.bytes_compressed += other.bytes_compressed;
        self.bytes_inflated += other.bytes_inflated;
        self.bytes_dangling += other.bytes_dangling;
        self.bytes_resynced += other.bytes_resynced;
    }
}

impl AddAssign for ReaderCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}

/// Collected while writing a file.
#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WriterCounters {
    pub objects_written: u64,
    pub markers_written: u64,
    pub containers_written: u64,
    /// Encoded object bytes, padding included.
    pub bytes_uncompressed: u64,
    /// Container object bytes as written to the sink.
    pub bytes_compressed: u64,
}

impl WriterCounters {
    pub fn add_object(&mut self, encoded_len: usize, is_marker: bool) {
        self.objects_written += 1;
        if is_marker {
            self.markers_written += 1;
        }
        self.bytes_uncompressed += encoded_len as u64;
    }

    pub fn add_container(&mut self, written_len: usize) {
        self.containers_written += 1;
        self.bytes_compressed += written_len as u64;
    }

    pub fn merge(&mut self, other: &WriterCounters) {
        self.objects_written += other.objects_written;
        self.markers_written += other.markers_written;
        self.containers_written += other.containers_written;
        self.bytes_uncompressed += other.bytes_uncompressed;
        self.bytes_compressed += other.bytes_compressed;
    }
}

impl AddAssign for WriterCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
