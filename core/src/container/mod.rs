//! container/mod.rs
//! Log containers: the compressed I/O unit of a BLF file.
//!
//! Notes:
//! - Writers always emit zlib-wrapped DEFLATE at a high level.
//! - Readers also accept stored (uncompressed) containers and raw DEFLATE.
//! - Objects may straddle container boundaries; `ObjectStream` carries the
//!   tail of one container into the next.

pub mod types;
pub mod compress;
pub mod stream;

pub use types::*;
pub use compress::*;
pub use stream::*;
