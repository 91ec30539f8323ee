use std::io;
use thiserror::Error;

use crate::compression::CompressionError;
use crate::framing::FrameError;

/// Unified stream error covering configuration, I/O, framing and codec failures.
/// - `From<T>` impls enable `?` across the pipeline.
/// - Truncated frames are not represented here: the decoder recovers them as
///   raw passthrough.
#[derive(Debug, Error)]
pub enum StreamError {
    /// Bad buffer offset/count, malformed algorithm id, invalid configuration.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Configured algorithm id is not in the registry.
    #[error("unknown compression algorithm: {0:?}")]
    UnknownAlgorithm(String),

    /// Write/seek/flush/length on a read-only, forward-only stream.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    /// Decode transform produced a byte count different from the frame header.
    #[error("corrupt {algorithm} frame: expected {expected} bytes, decoded {actual}{}", detail_suffix(.detail))]
    CorruptFrame {
        algorithm: String,
        expected: usize,
        actual: usize,
        detail: Option<String>,
    },

    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    #[error("compression error: {0}")]
    Compression(#[from] CompressionError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Worker pool or gate failure (worker gone, channel closed).
    #[error("pipeline error: {0}")]
    Pipeline(&'static str),

    /// An earlier fatal error left the stream unusable.
    #[error("stream poisoned by an earlier failure")]
    Poisoned,
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(" ({d})")).unwrap_or_default()
}

impl From<StreamError> for io::Error {
    fn from(e: StreamError) -> Self {
        let kind = match &e {
            StreamError::InvalidArgument(_) => io::ErrorKind::InvalidInput,
            StreamError::UnknownAlgorithm(_) => io::ErrorKind::InvalidInput,
            StreamError::Unsupported(_) => io::ErrorKind::Unsupported,
            StreamError::CorruptFrame { .. } | StreamError::Frame(_) => io::ErrorKind::InvalidData,
            StreamError::Compression(_) => io::ErrorKind::InvalidData,
            StreamError::Io(inner) => inner.kind(),
            StreamError::Pipeline(_) | StreamError::Poisoned => io::ErrorKind::Other,
        };
        match e {
            StreamError::Io(inner) => inner,
            other => io::Error::new(kind, other),
        }
    }
}
