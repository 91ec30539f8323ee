//! codecs/lz4.rs
//! LZ4 block codec (lz4_flex, size-prepended block format).
use lz4_flex::block::{compress_prepend_size, decompress_size_prepended};

use crate::compression::constants::algorithm_ids;
use crate::compression::types::{AlgorithmId, Codec, CompressionError};

/// lz4 has no level in block mode; each chunk is compressed independently.
#[derive(Default)]
pub struct Lz4Codec;

impl Lz4Codec {
    pub fn new() -> Self {
        Self
    }
}

impl Codec for Lz4Codec {
    fn id(&self) -> AlgorithmId {
        algorithm_ids::LZ4
    }

    fn name(&self) -> &'static str {
        "lz4"
    }

    fn compress_chunk(&self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError> {
        out.extend_from_slice(&compress_prepend_size(input));
        Ok(())
    }

    fn decompress_chunk(&self, input: &[u8], limit: usize, out: &mut Vec<u8>) -> Result<(), CompressionError> {
        let prefix = input.get(..4).ok_or_else(|| {
            CompressionError::process("lz4", "missing size prefix")
        })?;
        let declared = u32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]) as usize;
        // Refuse to allocate for a block that claims more than the frame allows
        if declared > limit.saturating_add(1) {
            return Err(CompressionError::process(
                "lz4",
                format!("block size {} exceeds frame size {}", declared, limit),
            ));
        }
        let decompressed = decompress_size_prepended(input)
            .map_err(|e| CompressionError::process("lz4", e))?;
        out.extend_from_slice(&decompressed);
        Ok(())
    }
}
