//! object/types.rs
//! Object headers, wire enums and flag sets.

use std::fmt;
use num_enum::TryFromPrimitive;

use crate::constants::{object_types, time_units, OBJECT_SIGNATURE, OBJ_HEADER_BASE_LEN, OBJ_HEADER_V1_LEN, OBJ_HEADER_V2_LEN};
use crate::frame::Record;
use crate::primitives::{fmt_magic, Truncated};

/// Object types this codec interprets.
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
pub enum ObjectType {
    CanMessage     = object_types::CAN_MESSAGE,
    CanError       = object_types::CAN_ERROR,
    LogContainer   = object_types::LOG_CONTAINER,
    CanErrorExt    = object_types::CAN_ERROR_EXT,
    CanMessage2    = object_types::CAN_MESSAGE2,
    GlobalMarker   = object_types::GLOBAL_MARKER,
    CanFdMessage   = object_types::CAN_FD_MESSAGE,
    CanFdMessage64 = object_types::CAN_FD_MESSAGE_64,
}

bitflags::bitflags! {
    /// `flags` byte of CAN_MESSAGE / CAN_FD_MESSAGE payloads.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CanMsgFlags: u8 {
        /// Transmitted by the logging node.
        const DIR    = 0x01;
        const REMOTE = 0x80;
    }
}

bitflags::bitflags! {
    /// `fd_flags` byte of CAN_FD_MESSAGE payloads.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FdFlags: u8 {
        const EDL = 0x01;
        const BRS = 0x02;
        const ESI = 0x04;
    }
}

bitflags::bitflags! {
    /// `flags` word of CAN_FD_MESSAGE_64 payloads.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Fd64Flags: u32 {
        const REMOTE = 0x0010;
        const EDL    = 0x1000;
        const BRS    = 0x2000;
        const ESI    = 0x4000;
    }
}

/// Tick length selected by the object header flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampUnit {
    TenMicros,
    Nanos,
}

impl TimestampUnit {
    pub fn from_flags(flags: u32) -> Self {
        if flags == time_units::TIME_TEN_MICS {
            TimestampUnit::TenMicros
        } else {
            TimestampUnit::Nanos
        }
    }

    pub fn factor(self) -> f64 {
        match self {
            TimestampUnit::TenMicros => 1e-5,
            TimestampUnit::Nanos => 1e-9,
        }
    }
}

/// Common prefix of every object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectHeaderBase {
    pub signature: [u8; 4],
    pub header_size: u16,
    pub header_version: u16,
    /// Header plus payload, without trailing padding.
    pub object_size: u32,
    pub object_type: u32,
}

impl ObjectHeaderBase {
    pub const LEN: usize = OBJ_HEADER_BASE_LEN;

    pub fn new(header_size: u16, object_size: u32, object_type: u32) -> Self {
        Self {
            signature: OBJECT_SIGNATURE,
            header_size,
            header_version: 1,
            object_size,
            object_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObjectHeaderV1 {
    pub flags: u32,
    pub client_index: u16,
    pub object_version: u16,
    pub timestamp: u64,
}

impl ObjectHeaderV1 {
    pub const LEN: usize = OBJ_HEADER_V1_LEN;
}

/// Read-only; written by newer loggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObjectHeaderV2 {
    pub flags: u32,
    pub timestamp_status: u8,
    pub object_version: u16,
    pub timestamp: u64,
    pub original_timestamp: u64,
}

impl ObjectHeaderV2 {
    pub const LEN: usize = OBJ_HEADER_V2_LEN;
}

/// Version-specific header tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectHeader {
    V1(ObjectHeaderV1),
    V2(ObjectHeaderV2),
}

impl ObjectHeader {
    pub fn flags(&self) -> u32 {
        match self {
            ObjectHeader::V1(h) => h.flags,
            ObjectHeader::V2(h) => h.flags,
        }
    }

    pub fn ticks(&self) -> u64 {
        match self {
            ObjectHeader::V1(h) => h.timestamp,
            ObjectHeader::V2(h) => h.timestamp,
        }
    }

    /// Seconds since `stream_start`.
    pub fn relative_seconds(&self) -> f64 {
        self.ticks() as f64 * TimestampUnit::from_flags(self.flags()).factor()
    }
}

/// Outcome of decoding one object from a buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// A complete object. `consumed` includes trailing padding and may exceed
    /// the bytes that were available by up to three.
    Record { record: Record, consumed: usize },
    /// A complete object that could not be interpreted (unknown header
    /// version, payload shorter than its layout).
    Skipped { object_type: u32, consumed: usize },
    /// The object continues past the end of the buffer.
    Incomplete,
}

#[derive(Debug)]
pub enum ObjectError {
    /// Object does not start with "LOBJ"; the stream is misaligned.
    InvalidSignature { have: [u8; 4] },

    /// object_size cannot hold its own header.
    InvalidObjectSize { object_size: u32, header_size: u16 },

    /// Frame data exceeds what its object layout can carry.
    PayloadTooLong { have: usize, max: usize },

    /// Encoded object would not fit the 32-bit size field.
    ObjectTooLarge { have: usize },
}

impl fmt::Display for ObjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ObjectError::*;
        match self {
            InvalidSignature { have } =>
                write!(f, "invalid object signature: expected {}, got {}",
                    fmt_magic(&OBJECT_SIGNATURE), fmt_magic(have)),
            InvalidObjectSize { object_size, header_size } =>
                write!(f, "invalid object size {} for header size {}", object_size, header_size),
            PayloadTooLong { have, max } =>
                write!(f, "payload too long: {} > {}", have, max),
            ObjectTooLarge { have } =>
                write!(f, "object too large: {} bytes", have),
        }
    }
}

impl std::error::Error for ObjectError {}

/// Internal marker for payloads shorter than their fixed layout.
#[derive(Debug)]
pub(crate) struct ShortPayload(pub Truncated);

impl From<Truncated> for ShortPayload {
    fn from(t: Truncated) -> Self {
        ShortPayload(t)
    }
}
