//! stream/reader.rs
//! Lazy, single-pass iteration over the records of a BLF file.
//!
//! Notes:
//! - Containers are pulled from the source one at a time; nothing is read
//!   ahead beyond the container being decoded.
//! - Damaged containers are discarded with a warning; only a corrupt object
//!   stream or an I/O failure reaches the caller.
//! - After an `Err` the iterator is exhausted.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::iter::FusedIterator;
use std::path::Path;

use crate::constants::{object_types, FILE_HEADER_FIELDS_LEN, OBJECT_SIGNATURE};
use crate::container::{decompress_container, inflate_partial, LogContainerHeader, ObjectStream};
use crate::frame::{Message, Record};
use crate::headers::{decode_file_header, FileHeader};
use crate::object::{read_base_header, ObjectError, ObjectHeaderBase};
use crate::primitives::{pad_to_4, ByteCursor};
use crate::stream::io::{open_input, read_exact_or_eof, read_up_to, InputSource};
use crate::telemetry::ReaderCounters;
use crate::types::LogError;

pub struct BlfReader<R: Read> {
    inner: R,
    header: FileHeader,
    start_timestamp: f64,
    stream: ObjectStream,
    pending: VecDeque<Record>,
    /// Corruption found while decoding; reported once `pending` drains.
    deferred: Option<LogError>,
    done: bool,
    counters: ReaderCounters,
}

impl BlfReader<Box<dyn Read + Send>> {
    pub fn open(src: InputSource) -> Result<Self, LogError> {
        Self::new(open_input(src)?)
    }
}

impl BlfReader<BufReader<File>> {
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self, LogError> {
        Self::new(BufReader::new(File::open(path)?))
    }
}

impl<R: Read> BlfReader<R> {
    /// Parse the file header and position the source at the first object.
    pub fn new(mut inner: R) -> Result<Self, LogError> {
        let mut fields = [0u8; FILE_HEADER_FIELDS_LEN];
        let got = read_exact_or_eof(&mut inner, &mut fields)?;
        let header = decode_file_header(&fields[..got])?;

        let reserved = u64::from(header.header_size) - FILE_HEADER_FIELDS_LEN as u64;
        io::copy(&mut inner.by_ref().take(reserved), &mut io::sink())?;

        let start_timestamp = header.start_timestamp();
        log::debug!(
            "opened log: {} objects, start {:.3}, header {} bytes",
            header.object_count, start_timestamp, header.header_size
        );

        Ok(Self {
            inner,
            header,
            start_timestamp,
            stream: ObjectStream::new(),
            pending: VecDeque::new(),
            deferred: None,
            done: false,
            counters: ReaderCounters::default(),
        })
    }

    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    /// Absolute time of the first record, from the header's start stamp.
    pub fn start_timestamp(&self) -> f64 {
        self.start_timestamp
    }

    pub fn stop_timestamp(&self) -> f64 {
        self.header.stop_timestamp()
    }

    /// Object count as recorded by the writer; informational only.
    pub fn object_count(&self) -> u32 {
        self.header.object_count
    }

    pub fn counters(&self) -> &ReaderCounters {
        &self.counters
    }

    /// Bus events only, flattened into `Message`s.
    pub fn messages(self) -> Messages<R> {
        Messages { inner: self }
    }

    /// Read and decode the next top-level container.
    /// Returns `Ok(false)` once the source is exhausted or the stream is
    /// corrupt (the error is left in `deferred`).
    fn next_container(&mut self) -> Result<bool, LogError> {
        loop {
            let mut raw = [0u8; ObjectHeaderBase::LEN];
            let got = read_exact_or_eof(&mut self.inner, &mut raw)?;
            if got < ObjectHeaderBase::LEN {
                if got > 0 {
                    log::debug!("ignoring {} trailing bytes at end of file", got);
                }
                return Ok(false);
            }

            let Ok(base) = read_base_header(&mut ByteCursor::new(&raw)) else {
                return Ok(false);
            };
            if base.signature != OBJECT_SIGNATURE {
                return Err(ObjectError::InvalidSignature { have: base.signature }.into());
            }
            let object_size = base.object_size as usize;
            if object_size < ObjectHeaderBase::LEN || object_size < usize::from(base.header_size) {
                return Err(ObjectError::InvalidObjectSize {
                    object_size: base.object_size,
                    header_size: base.header_size,
                }
                .into());
            }

            let body_len = object_size - ObjectHeaderBase::LEN;
            let body = read_up_to(&mut self.inner, body_len as u64)?;
            let truncated = body.len() < body_len;
            if !truncated {
                read_up_to(&mut self.inner, pad_to_4(object_size) as u64)?;
            }

            if base.object_type != object_types::LOG_CONTAINER {
                log::debug!("ignoring top-level object type {}", base.object_type);
                self.counters.objects_ignored += 1;
                if truncated {
                    return Ok(false);
                }
                continue;
            }

            let inflated = if truncated {
                if body.len() < LogContainerHeader::LEN {
                    self.counters.bytes_dangling += body.len() as u64;
                    return Ok(false);
                }
                match inflate_partial(&body) {
                    Ok(data) => {
                        log::warn!(
                            "final container truncated ({} of {} bytes), salvaged {} bytes",
                            body.len(), body_len, data.len()
                        );
                        data
                    }
                    Err(e) => {
                        log::warn!("discarding truncated container: {}", e);
                        self.counters.add_discarded(body.len());
                        return Ok(false);
                    }
                }
            } else {
                match decompress_container(&body) {
                    Ok(data) => data,
                    Err(e) => {
                        log::warn!("discarding container: {}", e);
                        self.counters.add_discarded(body.len());
                        self.counters.bytes_resynced += self.stream.reset() as u64;
                        continue;
                    }
                }
            };

            self.counters.add_container(body.len(), inflated.len());
            let outcome = self.stream.feed(&inflated, self.start_timestamp);
            self.counters.objects_skipped += outcome.skipped as u64;
            self.counters.bytes_resynced += outcome.dropped as u64;
            for record in outcome.records {
                if record.frame.is_unknown() {
                    self.counters.records_unknown += 1;
                } else {
                    self.counters.records_decoded += 1;
                    self.pending.push_back(record);
                }
            }

            if let Some(e) = outcome.error {
                self.deferred = Some(e.into());
                return Ok(false);
            }
            return Ok(!truncated);
        }
    }

    fn finish(&mut self) {
        self.done = true;
        let dangling = self.stream.finish();
        if dangling > 0 {
            log::debug!("dropping {} bytes of incomplete object at end of file", dangling);
            self.counters.bytes_dangling += dangling as u64;
        }
    }
}

impl<R: Read> Iterator for BlfReader<R> {
    type Item = Result<Record, LogError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.pending.pop_front() {
                return Some(Ok(record));
            }
            if let Some(e) = self.deferred.take() {
                self.done = true;
                return Some(Err(e));
            }
            if self.done {
                return None;
            }
            match self.next_container() {
                Ok(true) => {}
                Ok(false) => self.finish(),
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

impl<R: Read> FusedIterator for BlfReader<R> {}

/// Adapter returned by [`BlfReader::messages`].
pub struct Messages<R: Read> {
    inner: BlfReader<R>,
}

impl<R: Read> Messages<R> {
    pub fn reader(&self) -> &BlfReader<R> {
        &self.inner
    }
}

impl<R: Read> Iterator for Messages<R> {
    type Item = Result<Message, LogError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                Ok(record) => {
                    if let Some(msg) = record.to_message() {
                        return Some(Ok(msg));
                    }
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

impl<R: Read> FusedIterator for Messages<R> {}
