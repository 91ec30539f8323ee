//! Raw deflate (no zlib wrapper) via flate2.

use std::io::Write;
use flate2::{Compression, read::DeflateDecoder, write::DeflateEncoder};

use crate::compression::codecs::read_limited;
use crate::compression::constants::{algorithm_ids, DEFAULT_LEVEL_DEFLATE};
use crate::compression::types::{AlgorithmId, Codec, CompressionError};

pub struct DeflateCodec {
    level: Compression,
}

impl DeflateCodec {
    pub fn new(level: u32) -> Self {
        let level = match level {
            0..=9 => Compression::new(level),
            _ => Compression::default(),
        };
        Self { level }
    }
}

impl Default for DeflateCodec {
    fn default() -> Self {
        Self::new(DEFAULT_LEVEL_DEFLATE)
    }
}

impl Codec for DeflateCodec {
    fn id(&self) -> AlgorithmId {
        algorithm_ids::DEFLATE
    }

    fn name(&self) -> &'static str {
        "deflate"
    }

    fn compress_chunk(&self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError> {
        // Encode this chunk as its own deflate stream
        let mut enc = DeflateEncoder::new(&mut *out, self.level);
        enc.write_all(input)
            .map_err(|e| CompressionError::process("deflate", e))?;
        enc.finish()
            .map_err(|e| CompressionError::process("deflate", e))?;
        Ok(())
    }

    fn decompress_chunk(&self, input: &[u8], limit: usize, out: &mut Vec<u8>) -> Result<(), CompressionError> {
        read_limited(DeflateDecoder::new(input), limit, out, "deflate")
    }
}
