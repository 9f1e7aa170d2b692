//! container/types.rs
//! Container header, compression methods and errors.

use std::fmt;
use num_enum::TryFromPrimitive;

use crate::constants::{compression_ids, LOG_CONTAINER_HEADER_LEN};
use crate::primitives::Truncated;

#[repr(u16)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
pub enum CompressionMethod {
    None        = compression_ids::NONE,
    ZlibDeflate = compression_ids::ZLIB_DEFLATE,
}

impl CompressionMethod {
    pub fn verify(raw: u16) -> Result<Self, ContainerError> {
        Self::try_from_primitive(raw).map_err(|_| ContainerError::UnknownCompression { raw })
    }
}

/// Header that follows the LOBJ base header of a LOG_CONTAINER object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogContainerHeader {
    pub compression_method: u16,
    pub uncompressed_size: u32,
}

impl LogContainerHeader {
    pub const LEN: usize = LOG_CONTAINER_HEADER_LEN;
}

/// Output of `compress_container`, ready to be framed as an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedContainer {
    pub method: CompressionMethod,
    pub uncompressed_size: u32,
    pub data: Vec<u8>,
}

#[derive(Debug)]
pub enum ContainerError {
    /// Compression method other than NONE or ZLIB_DEFLATE.
    UnknownCompression { raw: u16 },

    /// Inflated length disagrees with the declared uncompressed size.
    SizeMismatch { declared: usize, actual: usize },

    /// Container bytes end inside the container header.
    BufferTooShort { have: usize, need: usize },

    /// Input too large for the 32-bit size fields.
    TooLarge { have: usize },

    Inflate(String),
    Deflate(String),
}

impl fmt::Display for ContainerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ContainerError::*;
        match self {
            UnknownCompression { raw } =>
                write!(f, "unknown compression method: 0x{:x}", raw),
            SizeMismatch { declared, actual } =>
                write!(f, "container size mismatch: declared {}, inflated {}", declared, actual),
            BufferTooShort { have, need } =>
                write!(f, "container header truncated: {} < {}", have, need),
            TooLarge { have } =>
                write!(f, "container too large: {} bytes", have),
            Inflate(msg) =>
                write!(f, "inflate failed: {}", msg),
            Deflate(msg) =>
                write!(f, "deflate failed: {}", msg),
        }
    }
}

impl std::error::Error for ContainerError {}

impl From<Truncated> for ContainerError {
    fn from(t: Truncated) -> Self {
        ContainerError::BufferTooShort { have: t.have, need: t.need }
    }
}
