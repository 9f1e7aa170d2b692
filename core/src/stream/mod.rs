//! Streaming reader and writer over files and in-memory buffers.
//!
//! Responsibilities:
//! - Parse the file header and pull containers on demand (`reader`)
//! - Cache objects, flush containers and patch the header (`writer`)
//! - Normalize sources and sinks (`io`)
//! - Writer configuration (`config`)

pub mod config;
pub mod io;
pub mod reader;
pub mod writer;

pub use config::{ConfigError, WriterConfig};
pub use io::{open_input, open_output, InputSource, OutputSink, WriteSeek};
pub use reader::{BlfReader, Messages};
pub use writer::{BlfWriter, WriterState};
