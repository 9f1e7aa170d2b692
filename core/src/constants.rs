//! constants.rs
//! Wire-level constants for the Binary Logging Format.
//!
//! Notes:
//! - All multi-byte integers on disk are little-endian.
//! - Signatures are `[u8; 4]` so the type enforces the exact width of the field.

/// File signature at offset 0.
pub const FILE_SIGNATURE: [u8; 4] = *b"LOGG";
/// Signature at the start of every object, including log containers.
pub const OBJECT_SIGNATURE: [u8; 4] = *b"LOBJ";

/// Size of the fixed file header region, including reserved padding.
pub const FILE_HEADER_SIZE: usize = 144;
/// Bytes actually occupied by the file header fields.
pub const FILE_HEADER_FIELDS_LEN: usize = 72;

/// Object base header: signature, header_size, header_version, object_size, object_type.
pub const OBJ_HEADER_BASE_LEN: usize = 16;
/// Version 1 header tail: flags, client_index, object_version, timestamp.
pub const OBJ_HEADER_V1_LEN: usize = 16;
/// Version 2 header tail: flags, timestamp_status, pad, object_version, timestamp, original_timestamp.
pub const OBJ_HEADER_V2_LEN: usize = 24;
/// Log container header: compression method, reserved, uncompressed size, reserved.
pub const LOG_CONTAINER_HEADER_LEN: usize = 16;

/// Fixed payload sizes per object type.
pub const CAN_MSG_LEN: usize = 16;
pub const CAN_FD_MSG_LEN: usize = 84;
pub const CAN_FD_MSG_64_LEN: usize = 40;
pub const CAN_ERROR_EXT_LEN: usize = 32;
pub const GLOBAL_MARKER_LEN: usize = 40;

/// Object type identifiers (`object_type` field).
pub mod object_types {
    pub const CAN_MESSAGE: u32 = 1;
    pub const CAN_ERROR: u32 = 2;
    pub const LOG_CONTAINER: u32 = 10;
    pub const CAN_ERROR_EXT: u32 = 73;
    pub const CAN_MESSAGE2: u32 = 86;
    pub const GLOBAL_MARKER: u32 = 96;
    pub const CAN_FD_MESSAGE: u32 = 100;
    pub const CAN_FD_MESSAGE_64: u32 = 101;
}

/// Log container compression methods.
pub mod compression_ids {
    pub const NONE: u16 = 0;
    pub const ZLIB_DEFLATE: u16 = 2;
}

/// Timestamp unit selectors carried in the object header flags.
pub mod time_units {
    pub const TIME_TEN_MICS: u32 = 0x0000_0001;
    pub const TIME_ONE_NANS: u32 = 0x0000_0002;
}

/// Bit 31 of an on-disk arbitration id marks a 29-bit extended id.
pub const CAN_MSG_EXT: u32 = 0x8000_0000;
/// Mask for the id bits proper.
pub const CAN_ID_MASK: u32 = 0x1FFF_FFFF;

/// Default uncompressed size of one log container (128 KiB).
pub const DEFAULT_MAX_CONTAINER_SIZE: usize = 128 * 1024;
/// zlib level used for containers unless configured otherwise.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 9;

/// Application identity stamped into written file headers.
pub const APPLICATION_ID: u8 = 5;
/// Binary log format version (major, minor, build, patch) written to new files.
pub const FORMAT_VERSION: [u8; 4] = [2, 6, 8, 1];

/// Timestamps below this (1990-01-01) are treated as relative, not wall-clock.
pub const MIN_WALL_CLOCK_TIMESTAMP: f64 = 631_152_000.0;

/// Names used for markers added through `log_marker`.
pub const MARKER_NAME: &str = "blf-core";
pub const MARKER_DESCRIPTION: &str = "Added by blf-core";
pub const MARKER_FOREGROUND: u32 = 0x00FF_FFFF;
pub const MARKER_BACKGROUND: u32 = 0x00FF_3300;
