//! headers/decode.rs
//!
//! Parses the field portion of a file header. The caller is responsible for
//! skipping reserved bytes up to `header_size`.

use crate::constants::FILE_SIGNATURE;
use crate::headers::types::{FileHeader, HeaderError, SystemTime};
use crate::primitives::ByteCursor;

/// Decode and validate the first 72 bytes of `buf` as a `FileHeader`.
pub fn decode_file_header(buf: &[u8]) -> Result<FileHeader, HeaderError> {
    let mut c = ByteCursor::new(buf);

    // Signature is checked before anything else so a foreign file reports
    // a bad magic rather than a short read.
    let signature = c.array::<4>()?;
    if signature != FILE_SIGNATURE {
        return Err(HeaderError::InvalidMagic { have: signature, need: FILE_SIGNATURE });
    }
    let header_size = c.u32()?;

    let h = FileHeader {
        signature,
        header_size,
        application_id: c.u8()?,
        application_major: c.u8()?,
        application_minor: c.u8()?,
        application_build: c.u8()?,
        format_major: c.u8()?,
        format_minor: c.u8()?,
        format_build: c.u8()?,
        format_patch: c.u8()?,
        file_size: c.u64()?,
        uncompressed_size: c.u64()?,
        object_count: c.u32()?,
        objects_read: c.u32()?,
        start_time: systime(&mut c)?,
        stop_time: systime(&mut c)?,
    };

    h.validate()?;
    Ok(h)
}

fn systime(c: &mut ByteCursor<'_>) -> Result<SystemTime, HeaderError> {
    let mut f = [0u16; 8];
    for v in f.iter_mut() {
        *v = c.u16()?;
    }
    Ok(SystemTime::from_fields(f))
}
