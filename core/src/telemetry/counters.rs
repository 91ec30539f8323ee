//! telemetry/counters.rs
//! Mutable counters updated by a stream while it is being read.
//!
//! Converted into an immutable `TelemetrySnapshot` on request.
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// Deterministic counters collected during stream processing.
///
/// `bytes_in` counts bytes pulled from the source, `bytes_out` bytes handed to
/// the consumer. On the compress side the difference is the saving; on the
/// decompress side it is the expansion.
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    /// Chunks emitted unchanged (raw frames written).
    pub chunks_original: u64,
    /// Chunks emitted as compressed frames.
    pub chunks_compressed: u64,
    /// Raw runs passed through by a decoder.
    pub frames_raw: u64,
    /// Compressed frames decoded.
    pub frames_compressed: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
}

impl TelemetryCounters {
    /// Record bytes pulled from the source.
    pub fn add_read(&mut self, len: usize) {
        self.bytes_in += len as u64;
    }

    /// Record one fully drained chunk on the compress side.
    ///
    /// - `emitted_len`: bytes the chunk put on the wire (header included)
    pub fn add_chunk(&mut self, compressed: bool, emitted_len: usize) {
        if compressed {
            self.chunks_compressed += 1;
        } else {
            self.chunks_original += 1;
        }
        self.bytes_out += emitted_len as u64;
    }

    /// Record one fully drained frame on the decompress side.
    ///
    /// - `decoded_len`: bytes delivered to the consumer for this frame
    pub fn add_frame(&mut self, compressed: bool, decoded_len: usize) {
        if compressed {
            self.frames_compressed += 1;
        } else {
            self.frames_raw += 1;
        }
        self.bytes_out += decoded_len as u64;
    }

    pub fn merge(&mut self, other: &TelemetryCounters) {
        self.chunks_original += other.chunks_original;
        self.chunks_compressed += other.chunks_compressed;
        self.frames_raw += other.frames_raw;
        self.frames_compressed += other.frames_compressed;
        self.bytes_in += other.bytes_in;
        self.bytes_out += other.bytes_out;
    }
}

impl AddAssign for TelemetryCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
