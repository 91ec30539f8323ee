//! compression/codecs/mod.rs
//! Concrete `Codec` implementations.
//!
//! Every codec compresses one chunk as an independent stream, so any frame can
//! be decoded on its own by whichever slot picks it up.

use std::io::Read;

use crate::compression::types::CompressionError;

pub mod brotli;
pub mod deflate;
pub mod gzip;
pub mod lz4;
pub mod zstd;

pub use self::brotli::BrotliCodec;
pub use self::deflate::DeflateCodec;
pub use self::gzip::GzipCodec;
pub use self::lz4::Lz4Codec;
pub use self::zstd::ZstdCodec;

/// Drain a decoding reader into `out`, stopping one byte past `limit`.
pub(crate) fn read_limited<R: Read>(
    decoder: R,
    limit: usize,
    out: &mut Vec<u8>,
    codec: &str,
) -> Result<(), CompressionError> {
    let cap = (limit as u64).saturating_add(1);
    decoder
        .take(cap)
        .read_to_end(out)
        .map_err(|e| CompressionError::process(codec, e))?;
    Ok(())
}
