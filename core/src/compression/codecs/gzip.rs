//! Gzip container via flate2.

use std::io::Write;
use flate2::{Compression, read::GzDecoder, write::GzEncoder};

use crate::compression::codecs::read_limited;
use crate::compression::constants::{algorithm_ids, DEFAULT_LEVEL_GZIP};
use crate::compression::types::{AlgorithmId, Codec, CompressionError};

pub struct GzipCodec {
    level: Compression,
}

impl GzipCodec {
    pub fn new(level: u32) -> Self {
        let level = match level {
            0..=9 => Compression::new(level),
            _ => Compression::default(),
        };
        Self { level }
    }
}

impl Default for GzipCodec {
    fn default() -> Self {
        Self::new(DEFAULT_LEVEL_GZIP)
    }
}

impl Codec for GzipCodec {
    fn id(&self) -> AlgorithmId {
        algorithm_ids::GZIP
    }

    fn name(&self) -> &'static str {
        "gzip"
    }

    fn compress_chunk(&self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError> {
        let mut enc = GzEncoder::new(&mut *out, self.level);
        enc.write_all(input)
            .map_err(|e| CompressionError::process("gzip", e))?;
        enc.finish()
            .map_err(|e| CompressionError::process("gzip", e))?;
        Ok(())
    }

    fn decompress_chunk(&self, input: &[u8], limit: usize, out: &mut Vec<u8>) -> Result<(), CompressionError> {
        read_limited(GzDecoder::new(input), limit, out, "gzip")
    }
}
