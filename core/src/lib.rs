//! chunkstream-core
//!
//! Forward-only streaming compression in adaptive chunks.
//! An encoding reader turns any `Read` into a stream of raw and compressed
//! frames; a decoding reader turns it back.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;

pub mod compression;
pub mod framing;
pub mod chunk;
pub mod telemetry;

// Stream layer
pub mod stream;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::compression::{algorithm_ids, AlgorithmId, Codec, CodecRegistry};
    pub use crate::stream::{CompressReader, DecompressConfig, DecompressReader, Execution, StreamConfig};
    pub use crate::telemetry::TelemetrySnapshot;
    pub use crate::types::StreamError;
}
