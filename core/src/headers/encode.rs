//! headers/encode.rs
//!
//! Serializes a `FileHeader` into its fixed 144-byte region.

use crate::constants::FILE_HEADER_SIZE;
use crate::headers::types::FileHeader;
use crate::primitives::{put_u16, put_u32, put_u64, put_u8, put_zeros};

/// Encode the header fields and zero-fill the reserved tail.
///
/// The output is always `FILE_HEADER_SIZE` bytes regardless of
/// `h.header_size`, since that is the region a writer reserves.
pub fn encode_file_header(h: &FileHeader) -> [u8; FILE_HEADER_SIZE] {
    let mut out = Vec::with_capacity(FILE_HEADER_SIZE);

    out.extend_from_slice(&h.signature);          // 0..4   signature
    put_u32(&mut out, h.header_size);             // 4..8   header size
    put_u8(&mut out, h.application_id);           // 8      application id
    put_u8(&mut out, h.application_major);        // 9
    put_u8(&mut out, h.application_minor);        // 10
    put_u8(&mut out, h.application_build);        // 11
    put_u8(&mut out, h.format_major);             // 12     binlog version
    put_u8(&mut out, h.format_minor);             // 13
    put_u8(&mut out, h.format_build);             // 14
    put_u8(&mut out, h.format_patch);             // 15
    put_u64(&mut out, h.file_size);               // 16..24
    put_u64(&mut out, h.uncompressed_size);       // 24..32
    put_u32(&mut out, h.object_count);            // 32..36
    put_u32(&mut out, h.objects_read);            // 36..40
    for v in h.start_time.fields() {              // 40..56
        put_u16(&mut out, v);
    }
    for v in h.stop_time.fields() {               // 56..72
        put_u16(&mut out, v);
    }
    let pad = FILE_HEADER_SIZE - out.len();
    put_zeros(&mut out, pad);

    let mut fixed = [0u8; FILE_HEADER_SIZE];
    fixed.copy_from_slice(&out);
    fixed
}
