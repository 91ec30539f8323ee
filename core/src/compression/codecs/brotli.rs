//! Brotli via the `brotli` crate (pure Rust).

use std::io::Read;
use brotli::enc::backward_references::BrotliEncoderMode;
use brotli::enc::BrotliEncoderParams;
use brotli::{CompressorReader, Decompressor};

use crate::compression::codecs::read_limited;
use crate::compression::constants::{algorithm_ids, BROTLI_BUFFER_SIZE, BROTLI_LGWIN, DEFAULT_QUALITY_BROTLI};
use crate::compression::types::{AlgorithmId, Codec, CompressionError};

pub struct BrotliCodec {
    quality: u32,
}

impl BrotliCodec {
    pub fn new(quality: u32) -> Self {
        Self { quality: quality.min(11) }
    }
}

impl Default for BrotliCodec {
    fn default() -> Self {
        Self::new(DEFAULT_QUALITY_BROTLI)
    }
}

impl Codec for BrotliCodec {
    fn id(&self) -> AlgorithmId {
        algorithm_ids::BROTLI
    }

    fn name(&self) -> &'static str {
        "brotli"
    }

    fn compress_chunk(&self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError> {
        let params = BrotliEncoderParams {
            quality: self.quality as i32,
            lgwin: BROTLI_LGWIN as i32,
            mode: BrotliEncoderMode::BROTLI_MODE_GENERIC,
            size_hint: input.len(),
            ..Default::default()
        };
        let mut enc = CompressorReader::with_params(input, BROTLI_BUFFER_SIZE, &params);
        enc.read_to_end(out)
            .map_err(|e| CompressionError::process("brotli", e))?;
        Ok(())
    }

    fn decompress_chunk(&self, input: &[u8], limit: usize, out: &mut Vec<u8>) -> Result<(), CompressionError> {
        read_limited(Decompressor::new(input, BROTLI_BUFFER_SIZE), limit, out, "brotli")
    }
}
