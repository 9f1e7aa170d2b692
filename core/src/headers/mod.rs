//! headers/mod.rs
//! File-level header of a BLF trace.
//!
//! Notes:
//! - Fixed 144-byte region, little-endian.
//! - Written zeroed when a file is created and rewritten once on close.

pub mod types;
pub mod encode;
pub mod decode;

pub use types::*;
pub use encode::*;
pub use decode::*;
