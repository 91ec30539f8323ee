use byteorder::{ByteOrder, LittleEndian};
use thiserror::Error;

use crate::compression::AlgorithmId;
use crate::constants::{ALGORITHM_ID_LEN, MAX_CHUNK_SIZE};

/// Compressed frame header (fixed size, little-endian).
///
/// ```text
/// [ algorithm id (4) ]
/// [ uncompressed_size i32 (4) ]
/// [ compressed_size i32 (4) ]
/// [ payload (compressed_size) ]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub algorithm: AlgorithmId,
    /// Original chunk length the payload decodes to.
    pub uncompressed_size: u32,
    /// Payload bytes following the header.
    pub compressed_size: u32,
}

impl FrameHeader {
    pub const LEN: usize = ALGORITHM_ID_LEN // algorithm
        + 4                                // uncompressed_size
        + 4;                               // compressed_size

    pub fn new(algorithm: AlgorithmId, uncompressed_size: usize, compressed_size: usize) -> Result<Self, FrameError> {
        Ok(Self {
            algorithm,
            uncompressed_size: size_field("uncompressed_size", uncompressed_size)?,
            compressed_size: size_field("compressed_size", compressed_size)?,
        })
    }

    /// Canonical wire encoding.
    pub fn encode(&self) -> [u8; Self::LEN] {
        let mut out = [0u8; Self::LEN];
        out[..4].copy_from_slice(self.algorithm.as_bytes());
        LittleEndian::write_i32(&mut out[4..8], self.uncompressed_size as i32);
        LittleEndian::write_i32(&mut out[8..12], self.compressed_size as i32);
        out
    }

    /// Strict parse of a complete header. The algorithm id is taken as-is;
    /// registry membership is the decoder's concern.
    pub fn parse(wire: &[u8]) -> Result<Self, FrameError> {
        if wire.len() < Self::LEN {
            return Err(FrameError::Truncated { needed: Self::LEN, available: wire.len() });
        }

        let mut id = [0u8; ALGORITHM_ID_LEN];
        id.copy_from_slice(&wire[..4]);

        let uncompressed = LittleEndian::read_i32(&wire[4..8]);
        if uncompressed < 0 {
            return Err(FrameError::NegativeSize { field: "uncompressed_size", value: uncompressed });
        }
        let compressed = LittleEndian::read_i32(&wire[8..12]);
        if compressed < 0 {
            return Err(FrameError::NegativeSize { field: "compressed_size", value: compressed });
        }

        Ok(Self {
            algorithm: AlgorithmId::new(id),
            uncompressed_size: uncompressed as u32,
            compressed_size: compressed as u32,
        })
    }

    /// Whether a compressing reader could have written this header.
    ///
    /// Frames carry one chunk of at most `MAX_CHUNK_SIZE` bytes and exist only
    /// when header plus payload is smaller than that chunk.
    pub fn is_plausible(&self) -> bool {
        let uncompressed = self.uncompressed_size as usize;
        uncompressed > 0
            && uncompressed <= MAX_CHUNK_SIZE
            && (self.compressed_size as usize) + Self::LEN < uncompressed
    }

    /// Header plus payload.
    #[inline]
    pub fn frame_len(&self) -> usize {
        Self::LEN + self.compressed_size as usize
    }
}

fn size_field(field: &'static str, value: usize) -> Result<u32, FrameError> {
    if value > i32::MAX as usize {
        return Err(FrameError::SizeOverflow { field, value });
    }
    Ok(value as u32)
}

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("truncated frame header: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    #[error("negative {field} in frame header: {value}")]
    NegativeSize { field: &'static str, value: i32 },

    #[error("{field} {value} does not fit an i32 size field")]
    SizeOverflow { field: &'static str, value: usize },

    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}
