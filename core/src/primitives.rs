//! primitives.rs
//! Fixed-layout little-endian read/write helpers shared by every codec layer.
//!
//! Notes:
//! - Reads go through a bounds-checked cursor; running off the end is a
//!   `Truncated` error rather than a panic.
//! - Writes append to a `Vec<u8>`, which cannot fail.

use std::fmt;
use byteorder::{ByteOrder, LittleEndian};

/// Number of zero bytes needed to bring `len` up to a 4-byte boundary.
#[inline]
pub const fn pad_to_4(len: usize) -> usize {
    (4 - (len % 4)) % 4
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncated {
    pub need: usize,
    pub have: usize,
}

impl fmt::Display for Truncated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "buffer truncated: need {} bytes, have {}", self.need, self.have)
    }
}

impl std::error::Error for Truncated {}

/// Bounds-checked little-endian cursor over a borrowed slice.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], Truncated> {
        let end = self.pos + n;
        if end > self.buf.len() {
            return Err(Truncated { need: end, have: self.buf.len() });
        }
        let out = &self.buf[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    pub fn skip(&mut self, n: usize) -> Result<(), Truncated> {
        self.take(n).map(|_| ())
    }

    #[inline]
    pub fn u8(&mut self) -> Result<u8, Truncated> {
        Ok(self.take(1)?[0])
    }

    #[inline]
    pub fn u16(&mut self) -> Result<u16, Truncated> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    #[inline]
    pub fn u32(&mut self) -> Result<u32, Truncated> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    #[inline]
    pub fn u64(&mut self) -> Result<u64, Truncated> {
        Ok(LittleEndian::read_u64(self.take(8)?))
    }

    pub fn array<const N: usize>(&mut self) -> Result<[u8; N], Truncated> {
        let mut dst = [0u8; N];
        dst.copy_from_slice(self.take(N)?);
        Ok(dst)
    }

    pub fn bytes(&mut self, n: usize) -> Result<&'a [u8], Truncated> {
        self.take(n)
    }
}

// Write helpers. Field order is always the caller's responsibility.

#[inline]
pub fn put_u8(out: &mut Vec<u8>, v: u8) {
    out.push(v);
}

#[inline]
pub fn put_u16(out: &mut Vec<u8>, v: u16) {
    let mut b = [0u8; 2];
    LittleEndian::write_u16(&mut b, v);
    out.extend_from_slice(&b);
}

#[inline]
pub fn put_u32(out: &mut Vec<u8>, v: u32) {
    let mut b = [0u8; 4];
    LittleEndian::write_u32(&mut b, v);
    out.extend_from_slice(&b);
}

#[inline]
pub fn put_u64(out: &mut Vec<u8>, v: u64) {
    let mut b = [0u8; 8];
    LittleEndian::write_u64(&mut b, v);
    out.extend_from_slice(&b);
}

#[inline]
pub fn put_zeros(out: &mut Vec<u8>, n: usize) {
    out.resize(out.len() + n, 0);
}

/// Copies `data` into a zero-filled field of exactly `width` bytes.
/// Callers validate `data.len() <= width` beforehand.
pub fn put_fixed(out: &mut Vec<u8>, data: &[u8], width: usize) {
    let n = data.len().min(width);
    out.extend_from_slice(&data[..n]);
    put_zeros(out, width - n);
}

/// Formats a 4-byte magic for error messages.
pub fn fmt_magic(b: &[u8]) -> String {
    if b.iter().all(|&c| c.is_ascii_graphic()) {
        format!("b\"{}\"", String::from_utf8_lossy(b))
    } else {
        format!("0x{}", hex::encode(b))
    }
}
