//! Object codec.
//!
//! Responsibilities:
//! - Encode one frame into a versioned, padded object
//! - Decode one object from an inflated stream, reporting incomplete tails
//!
//! Non-responsibilities:
//! - Compression and container boundaries (see `container`)
//! - IO

pub mod types;
pub mod encode;
pub mod decode;

pub use types::{
    CanMsgFlags,
    Decoded,
    Fd64Flags,
    FdFlags,
    ObjectError,
    ObjectHeader,
    ObjectHeaderBase,
    ObjectHeaderV1,
    ObjectHeaderV2,
    ObjectType,
    TimestampUnit,
};
pub use encode::{encode_object, ticks_since, write_base_header};
pub use decode::{decode_object, read_base_header};
