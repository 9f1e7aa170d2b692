//! blf-core
//!
//! Pure Rust reader and writer for BLF bus-trace logs.
//! No FFI, no async, no threads.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod primitives;
pub mod types;

// Codec layers
pub mod frame;
pub mod headers;
pub mod object;
pub mod container;
pub mod telemetry;

// Stream layer
pub mod stream;

pub use types::LogError;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::frame::{CanFdFrame, CanFrame, ErrorFrame, Frame, Marker, Message, Record};
    pub use crate::headers::FileHeader;
    pub use crate::stream::{BlfReader, BlfWriter, InputSource, OutputSink, WriterConfig, WriterState};
    pub use crate::telemetry::{ReaderCounters, TelemetrySnapshot, WriterCounters};
    pub use crate::types::LogError;
}
