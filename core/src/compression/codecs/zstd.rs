//! src/compression/codecs/zstd.rs
//!
//! Zstd block codec.
//!
//! Design notes:
//! - Uses the bulk API: each chunk becomes one standalone zstd frame.
//! - Decompression capacity is `limit + 1`, so an oversized frame fails inside
//!   zstd instead of allocating past the declared size.

use crate::compression::constants::{algorithm_ids, DEFAULT_LEVEL_ZSTD};
use crate::compression::types::{AlgorithmId, Codec, CompressionError};

pub struct ZstdCodec {
    level: i32,
}

impl ZstdCodec {
    pub fn new(level: i32) -> Self {
        Self { level }
    }
}

impl Default for ZstdCodec {
    fn default() -> Self {
        Self::new(DEFAULT_LEVEL_ZSTD)
    }
}

impl Codec for ZstdCodec {
    fn id(&self) -> AlgorithmId {
        algorithm_ids::ZSTD
    }

    fn name(&self) -> &'static str {
        "zstd"
    }

    fn compress_chunk(&self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError> {
        let compressed = zstd::bulk::compress(input, self.level)
            .map_err(|e| CompressionError::process("zstd", e))?;
        out.extend_from_slice(&compressed);
        Ok(())
    }

    fn decompress_chunk(&self, input: &[u8], limit: usize, out: &mut Vec<u8>) -> Result<(), CompressionError> {
        let decompressed = zstd::bulk::decompress(input, limit.saturating_add(1))
            .map_err(|e| CompressionError::process("zstd", e))?;
        out.extend_from_slice(&decompressed);
        Ok(())
    }
}
