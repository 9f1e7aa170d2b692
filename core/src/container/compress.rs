//! container/compress.rs
//! zlib/DEFLATE via flate2, plus container object framing.

use std::io::{Read, Write};
use flate2::read::{DeflateDecoder, ZlibDecoder};
use flate2::write::ZlibEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};

use crate::constants::{object_types, OBJ_HEADER_BASE_LEN};
use crate::container::types::{CompressedContainer, CompressionMethod, ContainerError, LogContainerHeader};
use crate::object::{write_base_header, ObjectHeaderBase};
use crate::primitives::{pad_to_4, put_u16, put_u32, put_zeros, ByteCursor};

/// Fixed-level container compressor for the writer. Level 0 stores the
/// payload uncompressed.
#[derive(Debug, Clone, Copy)]
pub struct ContainerCompressor {
    level: u32,
}

impl ContainerCompressor {
    pub fn new(level: u32) -> Self {
        Self { level: level.min(9) }
    }

    pub fn method(&self) -> CompressionMethod {
        if self.level == 0 {
            CompressionMethod::None
        } else {
            CompressionMethod::ZlibDeflate
        }
    }

    pub fn compress(&self, buffer: &[u8]) -> Result<CompressedContainer, ContainerError> {
        let uncompressed_size =
            u32::try_from(buffer.len()).map_err(|_| ContainerError::TooLarge { have: buffer.len() })?;

        let data = match self.method() {
            CompressionMethod::None => buffer.to_vec(),
            CompressionMethod::ZlibDeflate => {
                let mut enc = ZlibEncoder::new(Vec::with_capacity(buffer.len() / 2), Compression::new(self.level));
                enc.write_all(buffer).map_err(|e| ContainerError::Deflate(e.to_string()))?;
                enc.finish().map_err(|e| ContainerError::Deflate(e.to_string()))?
            }
        };

        Ok(CompressedContainer { method: self.method(), uncompressed_size, data })
    }
}

/// Compress one container's worth of objects.
pub fn compress_container(buffer: &[u8], level: u32) -> Result<CompressedContainer, ContainerError> {
    ContainerCompressor::new(level).compress(buffer)
}

/// Frame a compressed container as a padded LOG_CONTAINER object.
pub fn encode_container_object(c: &CompressedContainer) -> Result<Vec<u8>, ContainerError> {
    let object_size = OBJ_HEADER_BASE_LEN + LogContainerHeader::LEN + c.data.len();
    let object_size_u32 = u32::try_from(object_size).map_err(|_| ContainerError::TooLarge { have: object_size })?;
    let padding = pad_to_4(object_size);

    let mut out = Vec::with_capacity(object_size + padding);
    write_base_header(
        &mut out,
        &ObjectHeaderBase::new(OBJ_HEADER_BASE_LEN as u16, object_size_u32, object_types::LOG_CONTAINER),
    );
    put_u16(&mut out, c.method as u16);
    put_zeros(&mut out, 6);
    put_u32(&mut out, c.uncompressed_size);
    put_zeros(&mut out, 4);
    out.extend_from_slice(&c.data);
    put_zeros(&mut out, padding);
    Ok(out)
}

pub fn read_container_header(bytes: &[u8]) -> Result<LogContainerHeader, ContainerError> {
    let mut c = ByteCursor::new(bytes);
    let compression_method = c.u16()?;
    c.skip(6)?;
    let uncompressed_size = c.u32()?;
    c.skip(4)?;
    Ok(LogContainerHeader { compression_method, uncompressed_size })
}

/// True when `data` starts with a valid zlib CMF/FLG pair.
fn has_zlib_header(data: &[u8]) -> bool {
    match data {
        [cmf, flg, ..] => cmf & 0x0F == 8 && cmf >> 4 <= 7 && ((u16::from(*cmf) << 8) | u16::from(*flg)) % 31 == 0,
        _ => false,
    }
}

/// Inflate the container whose header starts at `bytes[0]`.
///
/// Output is bounded by the declared uncompressed size; any disagreement is a
/// `SizeMismatch`.
pub fn decompress_container(bytes: &[u8]) -> Result<Vec<u8>, ContainerError> {
    let header = read_container_header(bytes)?;
    let data = &bytes[LogContainerHeader::LEN..];
    let declared = header.uncompressed_size as usize;

    let out = match CompressionMethod::verify(header.compression_method)? {
        CompressionMethod::None => data.to_vec(),
        CompressionMethod::ZlibDeflate => {
            let mut out = Vec::with_capacity(declared);
            // One byte past the bound is enough to detect an oversized stream.
            let limit = declared as u64 + 1;
            let res = if has_zlib_header(data) {
                ZlibDecoder::new(data).take(limit).read_to_end(&mut out)
            } else {
                DeflateDecoder::new(data).take(limit).read_to_end(&mut out)
            };
            res.map_err(|e| ContainerError::Inflate(e.to_string()))?;
            out
        }
    };

    if out.len() != declared {
        return Err(ContainerError::SizeMismatch { declared, actual: out.len() });
    }
    Ok(out)
}

/// Inflate as much as possible of a container cut short by end-of-file.
/// Never fails on a damaged stream; returns whatever prefix decoded.
pub fn inflate_partial(bytes: &[u8]) -> Result<Vec<u8>, ContainerError> {
    let header = read_container_header(bytes)?;
    let data = &bytes[LogContainerHeader::LEN..];
    let declared = header.uncompressed_size as usize;

    match CompressionMethod::verify(header.compression_method)? {
        CompressionMethod::None => Ok(data[..data.len().min(declared)].to_vec()),
        CompressionMethod::ZlibDeflate => {
            let mut d = Decompress::new(has_zlib_header(data));
            let mut out = Vec::with_capacity(declared);
            while out.len() < declared {
                let (in_before, out_before) = (d.total_in(), d.total_out());
                let input = &data[d.total_in() as usize..];
                match d.decompress_vec(input, &mut out, FlushDecompress::None) {
                    Ok(Status::StreamEnd) | Err(_) => break,
                    Ok(_) if d.total_in() == in_before && d.total_out() == out_before => break,
                    Ok(_) => {}
                }
            }
            out.truncate(declared);
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_zero_stores() {
        let c = compress_container(b"abc", 0).unwrap();
        assert_eq!(c.method, CompressionMethod::None);
        assert_eq!(c.data, b"abc");
    }

    #[test]
    fn detects_zlib_wrapper() {
        let c = compress_container(b"hello", 9).unwrap();
        assert!(has_zlib_header(&c.data));
        assert!(!has_zlib_header(&[0x00]));
    }

    #[test]
    fn container_object_is_padded_and_typed() {
        let c = CompressedContainer { method: CompressionMethod::None, uncompressed_size: 3, data: vec![1, 2, 3] };
        let obj = encode_container_object(&c).unwrap();
        assert_eq!(&obj[..4], b"LOBJ");
        assert_eq!(obj.len(), 36); // 35 + 1 padding
        assert_eq!(u32::from_le_bytes(obj[8..12].try_into().unwrap()), 35);
        assert_eq!(u32::from_le_bytes(obj[12..16].try_into().unwrap()), object_types::LOG_CONTAINER);
        assert_eq!(decompress_container(&obj[16..35]).unwrap(), vec![1, 2, 3]);
    }
}
