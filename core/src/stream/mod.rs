//! Pull-based chunk pipelines.
//!
//! Responsibilities:
//! - Own the source and read it from the consumer thread only
//! - Keep `pipeline_depth` slots in flight and drain them round-robin
//! - Surface the first fatal error once, then refuse further reads
//!
//! Both readers are read-only and forward-only.

use crate::types::StreamError;

/// Validate a `read_into` call.
///
/// Only reads into the start of `buf` are supported.
pub(crate) fn check_read_args(buf_len: usize, offset: usize, count: usize) -> Result<(), StreamError> {
    if offset != 0 {
        return Err(StreamError::InvalidArgument(format!(
            "offset must be 0, got {offset}"
        )));
    }
    if count > buf_len {
        return Err(StreamError::InvalidArgument(format!(
            "count {count} exceeds buffer length {buf_len}"
        )));
    }
    Ok(())
}

/// Write, seek, flush and length operations of a forward-only reader.
macro_rules! forward_only {
    ($reader:ident) => {
        impl<R: std::io::Read> std::io::Write for $reader<R> {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err($crate::types::StreamError::Unsupported("write").into())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Err($crate::types::StreamError::Unsupported("flush").into())
            }
        }

        impl<R: std::io::Read> std::io::Seek for $reader<R> {
            fn seek(&mut self, _pos: std::io::SeekFrom) -> std::io::Result<u64> {
                Err($crate::types::StreamError::Unsupported("seek").into())
            }
        }

        impl<R: std::io::Read> $reader<R> {
            pub fn set_len(&mut self, _len: u64) -> Result<(), $crate::types::StreamError> {
                Err($crate::types::StreamError::Unsupported("set_len"))
            }

            /// The total length is unknown until the source is exhausted.
            #[allow(clippy::len_without_is_empty)]
            pub fn len(&self) -> Result<u64, $crate::types::StreamError> {
                Err($crate::types::StreamError::Unsupported("len"))
            }
        }
    };
}

pub(crate) use forward_only;

pub mod config;
pub mod worker;
pub mod compress;
pub mod decompress;

pub use config::{DecompressConfig, Execution, StreamConfig};
pub use compress::CompressReader;
pub use decompress::DecompressReader;
pub use worker::{Executor, Gate, Slot, Unit, WorkerPool};
