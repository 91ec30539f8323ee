//! compression/types.rs
//! Algorithm identifiers, codec errors and the `Codec` seam.
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::ALGORITHM_ID_LEN;
use crate::types::StreamError;

/// Four-byte tag that opens every compressed frame on the wire.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AlgorithmId([u8; ALGORITHM_ID_LEN]);

impl AlgorithmId {
    pub const fn new(bytes: [u8; ALGORITHM_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse a configured identifier.
    ///
    /// The empty string means "no algorithm" (passthrough only). Anything else
    /// must be exactly four bytes, e.g. `"gzip"` or `"br  "`.
    pub fn parse(text: &str) -> Result<Option<Self>, StreamError> {
        if text.is_empty() {
            return Ok(None);
        }
        Self::from_slice(text.as_bytes()).map(Some).ok_or_else(|| {
            StreamError::InvalidArgument(format!(
                "algorithm identifier must be {} bytes long, got {:?} ({} bytes)",
                ALGORITHM_ID_LEN,
                text,
                text.len()
            ))
        })
    }

    /// Exactly four bytes, or `None`.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        <[u8; ALGORITHM_ID_LEN]>::try_from(bytes).ok().map(Self)
    }

    #[inline(always)]
    pub const fn as_bytes(&self) -> &[u8; ALGORITHM_ID_LEN] {
        &self.0
    }
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Debug for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AlgorithmId({:?})", String::from_utf8_lossy(&self.0))
    }
}

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("codec {codec} process failed: {msg}")]
    CodecProcessFailed { codec: String, msg: String },
}

impl CompressionError {
    pub(crate) fn process(codec: &str, err: impl fmt::Display) -> Self {
        CompressionError::CodecProcessFailed { codec: codec.into(), msg: err.to_string() }
    }
}

/// A registered compression algorithm.
///
/// Codecs are stateless transforms shared by every slot of every stream, so
/// they take `&self` and must be `Send + Sync`.
pub trait Codec: Send + Sync {
    /// Wire identifier written at the start of each compressed frame.
    fn id(&self) -> AlgorithmId;

    /// Human readable name for logs.
    fn name(&self) -> &'static str;

    /// Compress one whole chunk, appending the encoded bytes to `out`.
    fn compress_chunk(&self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError>;

    /// Decompress one frame payload, appending to `out`.
    ///
    /// `limit` is the declared uncompressed size. Implementations stop after
    /// `limit + 1` bytes so an oversized frame is detected without unbounded
    /// memory growth.
    fn decompress_chunk(&self, input: &[u8], limit: usize, out: &mut Vec<u8>) -> Result<(), CompressionError>;
}

impl fmt::Debug for dyn Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Codec({}, {})", self.id(), self.name())
    }
}
