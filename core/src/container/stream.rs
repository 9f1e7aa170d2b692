//! container/stream.rs
//! Object decode loop across container boundaries.
//!
//! The inflated payload of each container is appended to whatever the
//! previous container left undecoded (the tail), and objects are decoded from
//! the front until one runs past the end. Padding that straddles a boundary is
//! remembered as a debt and dropped from the front of the next payload.
//!
//! After a container is discarded the stream is out of step: the next payload
//! may start in the middle of an object. `reset` drops the tail and the next
//! `feed` scans forward to the first plausible object header.

use crate::constants::{OBJECT_SIGNATURE, OBJ_HEADER_BASE_LEN};
use crate::frame::Record;
use crate::object::{decode_object, Decoded, ObjectError};

/// Result of feeding one container payload.
#[derive(Debug, Default)]
pub struct FeedOutcome {
    /// Complete records in file order.
    pub records: Vec<Record>,
    /// Objects consumed without producing a record.
    pub skipped: usize,
    /// Bytes dropped while resynchronising after `reset`.
    pub dropped: usize,
    /// Set when the stream is corrupt; `records` holds everything decoded before it.
    pub error: Option<ObjectError>,
}

#[derive(Debug, Default)]
pub struct ObjectStream {
    tail: Vec<u8>,
    pad_debt: usize,
    resync: bool,
}

impl ObjectStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes of an incomplete object waiting for the next container.
    pub fn pending(&self) -> usize {
        self.tail.len()
    }

    /// Forget the carried tail after a container was lost; returns its size.
    /// The next `feed` starts at the first plausible object header.
    pub fn reset(&mut self) -> usize {
        let dropped = self.tail.len();
        self.tail.clear();
        self.pad_debt = 0;
        self.resync = true;
        dropped
    }

    /// Decode every complete object available after appending `payload`.
    pub fn feed(&mut self, payload: &[u8], stream_start: f64) -> FeedOutcome {
        let skip = self.pad_debt.min(payload.len());
        self.pad_debt -= skip;

        let mut buf = std::mem::take(&mut self.tail);
        buf.extend_from_slice(&payload[skip..]);

        let mut out = FeedOutcome::default();
        let mut offset = 0usize;
        if self.resync {
            match find_object_start(&buf) {
                Some(start) => {
                    self.resync = false;
                    offset = start;
                }
                None => {
                    // Keep enough for a signature split across payloads.
                    offset = buf.len().saturating_sub(OBJECT_SIGNATURE.len() - 1);
                }
            }
            if offset > 0 {
                log::debug!("resync dropped {} bytes", offset);
            }
            out.dropped = offset;
            if self.resync {
                buf.drain(..offset);
                self.tail = buf;
                return out;
            }
        }

        while offset < buf.len() {
            match decode_object(&buf[offset..], stream_start) {
                Ok(Decoded::Record { record, consumed }) => {
                    out.records.push(record);
                    offset += consumed;
                }
                Ok(Decoded::Skipped { object_type, consumed }) => {
                    log::trace!("skipped object type {} at offset {}", object_type, offset);
                    out.skipped += 1;
                    offset += consumed;
                }
                Ok(Decoded::Incomplete) => break,
                Err(e) => {
                    // Nothing after a bad signature can be trusted.
                    out.error = Some(e);
                    return out;
                }
            }
        }

        if offset > buf.len() {
            self.pad_debt = offset - buf.len();
            offset = buf.len();
        }
        buf.drain(..offset);
        self.tail = buf;
        out
    }

    /// Drop the dangling partial object at end of stream; returns its size.
    pub fn finish(&mut self) -> usize {
        let dropped = self.tail.len();
        self.tail.clear();
        self.pad_debt = 0;
        self.resync = false;
        dropped
    }
}

/// Offset of the first `LOBJ` whose base header sizes are consistent.
/// A signature too close to the end to check is accepted.
fn find_object_start(buf: &[u8]) -> Option<usize> {
    let sig = OBJECT_SIGNATURE.len();
    (0..buf.len().saturating_sub(sig - 1)).find(|&i| {
        if buf[i..i + sig] != OBJECT_SIGNATURE {
            return false;
        }
        let Some(rest) = buf.get(i + sig..i + OBJ_HEADER_BASE_LEN) else {
            return true;
        };
        let header_size = u16::from_le_bytes([rest[0], rest[1]]) as usize;
        let object_size = u32::from_le_bytes([rest[4], rest[5], rest[6], rest[7]]) as usize;
        header_size >= OBJ_HEADER_BASE_LEN && object_size >= header_size
    })
}
