//! stream/writer.rs
//! Buffered BLF writer.
//!
//! Lifecycle:
//!
//! ```text
//! Opened --append--> Writing --close--> Closed
//!    \_____________________close_______/
//! ```
//!
//! - A zeroed header is written when the writer is created; the real header
//!   is patched in place on close, so the sink must be seekable.
//! - Encoded objects accumulate in a cache and leave it as compressed
//!   containers of exactly `max_container_size` bytes, except the last.
//! - Dropping an open writer closes it; failures are only logged.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::constants::{
    FILE_HEADER_FIELDS_LEN, FILE_HEADER_SIZE, MARKER_BACKGROUND, MARKER_DESCRIPTION, MARKER_FOREGROUND,
    MARKER_NAME, OBJ_HEADER_BASE_LEN, LOG_CONTAINER_HEADER_LEN,
};
use crate::container::{encode_container_object, ContainerCompressor};
use crate::frame::{Frame, Marker, Message, Record};
use crate::headers::{decode_file_header, encode_file_header, header_anchor, FileHeader, SystemTime};
use crate::object::encode_object;
use crate::stream::config::WriterConfig;
use crate::stream::io::read_exact_or_eof;
use crate::telemetry::WriterCounters;
use crate::types::LogError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    /// Placeholder header written, no objects yet.
    Opened,
    Writing,
    /// Header patched; no further writes accepted.
    Closed,
}

pub struct BlfWriter<W: Write + Seek> {
    inner: Option<W>,
    config: WriterConfig,
    compressor: ContainerCompressor,
    state: WriterState,
    header: FileHeader,
    /// Position of the header within the sink.
    origin: u64,
    /// Bytes in the sink past `origin`.
    bytes_written: u64,
    cache: Vec<u8>,
    /// Timestamps are encoded relative to this; equals what a reader
    /// recovers from the header's start stamp.
    stream_start: Option<f64>,
    stop_timestamp: Option<f64>,
    counters: WriterCounters,
}

impl BlfWriter<BufWriter<File>> {
    /// Create (or truncate) a file at `path`.
    pub fn create(path: impl AsRef<Path>, config: WriterConfig) -> Result<Self, LogError> {
        Self::new(BufWriter::new(File::create(path)?), config)
    }
}

impl BlfWriter<File> {
    /// Continue a closed file at `path`.
    pub fn append_path(path: impl AsRef<Path>, config: WriterConfig) -> Result<Self, LogError> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Self::append_to(file, config)
    }
}

impl<W: Write + Seek> BlfWriter<W> {
    /// Start a new log at the sink's current position.
    pub fn new(mut sink: W, config: WriterConfig) -> Result<Self, LogError> {
        config.validate()?;
        let origin = sink.stream_position()?;
        sink.write_all(&[0u8; FILE_HEADER_SIZE])?;

        let header = FileHeader { application_id: config.application_id, ..FileHeader::default() };
        Ok(Self {
            inner: Some(sink),
            compressor: ContainerCompressor::new(config.compression_level),
            config,
            state: WriterState::Opened,
            header,
            origin,
            bytes_written: FILE_HEADER_SIZE as u64,
            cache: Vec::new(),
            stream_start: None,
            stop_timestamp: None,
            counters: WriterCounters::default(),
        })
    }

    /// Reopen a previously closed log and continue after its last container.
    ///
    /// Object count, uncompressed size and start/stop stamps are restored
    /// from the existing header.
    pub fn append_to(mut sink: W, config: WriterConfig) -> Result<Self, LogError>
    where
        W: Read,
    {
        config.validate()?;
        let origin = sink.seek(SeekFrom::Start(0))?;
        let mut fields = [0u8; FILE_HEADER_FIELDS_LEN];
        let got = read_exact_or_eof(&mut sink, &mut fields)?;
        let header = decode_file_header(&fields[..got])?;
        let end = sink.seek(SeekFrom::End(0))?;

        let (state, stream_start, stop_timestamp) = if header.object_count > 0 {
            (WriterState::Writing, Some(header.start_timestamp()), Some(header.stop_timestamp()))
        } else {
            (WriterState::Opened, None, None)
        };
        log::debug!("appending to log with {} objects, {} bytes", header.object_count, end);

        Ok(Self {
            inner: Some(sink),
            compressor: ContainerCompressor::new(config.compression_level),
            config,
            state,
            header,
            origin,
            bytes_written: end.max(FILE_HEADER_SIZE as u64),
            cache: Vec::new(),
            stream_start,
            stop_timestamp,
            counters: WriterCounters::default(),
        })
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Header as it will be written on close (totals are final only then).
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    pub fn get_ref(&self) -> Option<&W> {
        self.inner.as_ref()
    }

    pub fn counters(&self) -> &WriterCounters {
        &self.counters
    }

    /// Estimated file size: bytes on the sink plus the uncompressed cache.
    pub fn file_size(&self) -> u64 {
        self.bytes_written + self.cache.len() as u64
    }

    /// Encode one frame at an absolute `timestamp`.
    pub fn append(&mut self, frame: &Frame, timestamp: f64) -> Result<(), LogError> {
        if self.state == WriterState::Closed {
            return Err(LogError::WriterClosed);
        }

        let start = match self.stream_start {
            Some(start) => start,
            None => header_anchor(timestamp),
        };
        let object = encode_object(frame, timestamp, start)?;

        if self.stream_start.is_none() {
            self.header.start_time = SystemTime::from_timestamp(timestamp);
            self.stream_start = Some(start);
        }
        self.stop_timestamp = Some(timestamp);
        self.header.object_count = self.header.object_count.saturating_add(1);
        self.counters.add_object(object.len(), matches!(frame, Frame::Marker(_)));
        self.cache.extend_from_slice(&object);
        self.state = WriterState::Writing;

        if self.cache.len() >= self.config.max_container_size {
            self.flush()?;
        }
        Ok(())
    }

    pub fn append_record(&mut self, record: &Record) -> Result<(), LogError> {
        self.append(&record.frame, record.timestamp)
    }

    /// Encode a collaborator `Message`; a missing channel takes the
    /// configured default.
    pub fn append_message(&mut self, msg: &Message) -> Result<(), LogError> {
        let record = Record::from_message(msg, self.config.default_channel);
        self.append_record(&record)
    }

    /// Add a global marker whose group name is `text`. Without a timestamp
    /// the marker lands on the last written record, or on the current time.
    pub fn log_marker(&mut self, text: &str, timestamp: Option<f64>) -> Result<(), LogError> {
        let timestamp = timestamp.or(self.stop_timestamp).unwrap_or_else(now);
        let marker = Marker {
            event_type: 0,
            foreground_color: MARKER_FOREGROUND,
            background_color: MARKER_BACKGROUND,
            relocatable: false,
            group_name: text.to_owned(),
            marker_name: MARKER_NAME.to_owned(),
            description: MARKER_DESCRIPTION.to_owned(),
        };
        self.append(&Frame::Marker(marker), timestamp)
    }

    /// Write out every full container in the cache.
    pub fn flush(&mut self) -> Result<(), LogError> {
        if self.state == WriterState::Closed {
            return Err(LogError::WriterClosed);
        }
        while self.cache.len() >= self.config.max_container_size {
            self.write_container(self.config.max_container_size)?;
        }
        Ok(())
    }

    /// Compress the first `len` cached bytes into one container.
    fn write_container(&mut self, len: usize) -> Result<(), LogError> {
        let len = len.min(self.cache.len());
        if len == 0 {
            return Ok(());
        }
        let Some(sink) = self.inner.as_mut() else {
            return Err(LogError::WriterClosed);
        };

        let container = self.compressor.compress(&self.cache[..len])?;
        let bytes = encode_container_object(&container)?;
        sink.write_all(&bytes)?;

        self.cache.drain(..len);
        self.bytes_written += bytes.len() as u64;
        self.header.uncompressed_size += (OBJ_HEADER_BASE_LEN + LOG_CONTAINER_HEADER_LEN + len) as u64;
        self.counters.add_container(bytes.len());
        log::debug!("wrote container: {} -> {} bytes", len, bytes.len());
        Ok(())
    }

    /// Flush the remaining cache, patch the header and flush the sink.
    ///
    /// Calling `close` again is a no-op. If writing the last containers
    /// fails, the header is still patched and the first error is returned.
    pub fn close(&mut self) -> Result<(), LogError> {
        if self.state == WriterState::Closed {
            return Ok(());
        }

        let mut result = self.flush();
        if result.is_ok() {
            let rest = self.cache.len();
            result = self.write_container(rest);
        }
        self.state = WriterState::Closed;

        let patched = self.patch_header();
        result.and(patched)
    }

    fn patch_header(&mut self) -> Result<(), LogError> {
        let Some(sink) = self.inner.as_mut() else {
            return Err(LogError::WriterClosed);
        };

        self.header.file_size = self.bytes_written;
        if let Some(stop) = self.stop_timestamp {
            self.header.stop_time = SystemTime::from_timestamp(stop);
        }

        let end = sink.stream_position()?;
        sink.seek(SeekFrom::Start(self.origin))?;
        sink.write_all(&encode_file_header(&self.header))?;
        sink.seek(SeekFrom::Start(end))?;
        sink.flush()?;
        log::debug!(
            "closed log: {} objects, {} bytes ({} uncompressed)",
            self.header.object_count, self.header.file_size, self.header.uncompressed_size
        );
        Ok(())
    }

    /// Close the log and hand back the sink.
    pub fn into_inner(mut self) -> Result<W, LogError> {
        self.close()?;
        self.inner.take().ok_or(LogError::WriterClosed)
    }
}

impl<W: Write + Seek> Drop for BlfWriter<W> {
    fn drop(&mut self) {
        if self.inner.is_some() && self.state != WriterState::Closed {
            if let Err(e) = self.close() {
                log::error!("failed to close log on drop: {}", e);
            }
        }
    }
}

fn now() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1e6
}
