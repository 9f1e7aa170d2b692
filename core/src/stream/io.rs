//! stream/io.rs
//! Normalized inputs and outputs for the reader and writer.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Cursor, Read, Seek, Write};
use std::path::PathBuf;

use crate::types::LogError;

/// Anything a writer can patch in place.
pub trait WriteSeek: Write + Seek + Send {}
impl<T: Write + Seek + Send> WriteSeek for T {}

/// Canonical input abstraction
pub enum InputSource {
    Reader(Box<dyn Read + Send>),
    File(PathBuf),
    Memory(Vec<u8>),
}

/// Canonical output abstraction. The header is rewritten on close, so every
/// sink must be seekable.
pub enum OutputSink {
    Writer(Box<dyn WriteSeek>),
    File(PathBuf),
}

/// Normalize an input source into a boxed reader.
pub fn open_input(src: InputSource) -> Result<Box<dyn Read + Send>, LogError> {
    let reader: Box<dyn Read + Send> = match src {
        InputSource::Reader(r) => r,
        InputSource::File(p) => Box::new(BufReader::new(File::open(p)?)),
        InputSource::Memory(b) => Box::new(Cursor::new(b)),
    };
    Ok(reader)
}

/// Normalize an output sink into a boxed seekable writer.
pub fn open_output(sink: OutputSink) -> Result<Box<dyn WriteSeek>, LogError> {
    let writer: Box<dyn WriteSeek> = match sink {
        OutputSink::Writer(w) => w,
        OutputSink::File(p) => Box::new(BufWriter::new(File::create(p)?)),
    };
    Ok(writer)
}

/// Fill `buf` from `r`, stopping early only at end of stream.
/// Returns the number of bytes read.
pub fn read_exact_or_eof<R: Read + ?Sized>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut off = 0;
    while off < buf.len() {
        match r.read(&mut buf[off..]) {
            Ok(0) => break,
            Ok(n) => off += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(off)
}

/// Read up to `len` bytes, fewer only at end of stream.
pub fn read_up_to<R: Read>(r: &mut R, len: u64) -> io::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(len.min(1 << 20) as usize);
    r.by_ref().take(len).read_to_end(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_source_reads_partially() {
        let mut src = Cursor::new(vec![1u8, 2, 3]);
        let mut buf = [0u8; 8];
        assert_eq!(read_exact_or_eof(&mut src, &mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], &[1, 2, 3]);
    }

    #[test]
    fn memory_input_round_trips() {
        let mut r = open_input(InputSource::Memory(b"LOGG".to_vec())).unwrap();
        let mut s = String::new();
        r.read_to_string(&mut s).unwrap();
        assert_eq!(s, "LOGG");
    }
}
