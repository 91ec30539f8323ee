use std::sync::Arc;

use log::trace;

use crate::chunk::types::{Chunk, ChunkSource};
use crate::compression::Codec;
use crate::constants::{DEFAULT_MINIMUM_LENGTH, DEFAULT_RATIO_PERCENT};
use crate::framing::FrameHeader;
use crate::types::StreamError;

/// Per-stream rules deciding whether a chunk is worth compressing.
#[derive(Clone)]
pub struct CompressionPolicy {
    /// `None` means passthrough only.
    pub codec: Option<Arc<dyn Codec>>,
    /// Chunks of this many bytes or fewer stay raw.
    pub minimum_length: usize,
    /// Compress only when `compressed * 100 / original` is below this.
    pub ratio_percent: u8,
}

impl CompressionPolicy {
    pub fn new(codec: Option<Arc<dyn Codec>>) -> Self {
        Self {
            codec,
            minimum_length: DEFAULT_MINIMUM_LENGTH,
            ratio_percent: DEFAULT_RATIO_PERCENT,
        }
    }

    pub fn passthrough() -> Self {
        Self::new(None)
    }

    /// Decide how the first `read_len` bytes of `chunk.original` leave the stream.
    ///
    /// - `read_len == 0`: the source is exhausted, the chunk becomes terminal.
    /// - no codec, or `read_len <= minimum_length`: raw.
    /// - otherwise compress, keeping the result only when the frame (header
    ///   included) is strictly smaller than the raw bytes and the ratio stays
    ///   under the threshold.
    pub fn compress_chunk(&self, chunk: &mut Chunk, read_len: usize) -> Result<(), StreamError> {
        chunk.compressed.clear();

        if read_len == 0 {
            chunk.source = ChunkSource::None;
            return Ok(());
        }

        let original = ChunkSource::Original { len: read_len, cursor: 0 };

        let codec = match &self.codec {
            Some(codec) if read_len > self.minimum_length => codec,
            _ => {
                chunk.source = original;
                return Ok(());
            }
        };

        codec.compress_chunk(&chunk.original[..read_len], &mut chunk.compressed)?;
        let compressed_len = chunk.compressed.len();

        if !self.worth_it(read_len, compressed_len) {
            trace!(
                "[CHUNK] {} gave {} -> {} bytes, keeping original",
                codec.id(),
                read_len,
                compressed_len
            );
            chunk.compressed.clear();
            chunk.source = original;
            return Ok(());
        }

        let header = FrameHeader::new(codec.id(), read_len, compressed_len)?;
        chunk.source = ChunkSource::Compressed { header, cursor: 0 };
        Ok(())
    }

    fn worth_it(&self, read_len: usize, compressed_len: usize) -> bool {
        if compressed_len + FrameHeader::LEN >= read_len {
            return false;
        }
        (compressed_len as u64) * 100 < u64::from(self.ratio_percent) * read_len as u64
    }
}

impl std::fmt::Debug for CompressionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompressionPolicy")
            .field("codec", &self.codec.as_ref().map(|c| c.id()))
            .field("minimum_length", &self.minimum_length)
            .field("ratio_percent", &self.ratio_percent)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::{algorithm_ids, CodecRegistry};
    use std::io::Cursor;

    fn policy(min: usize, ratio: u8) -> CompressionPolicy {
        CompressionPolicy {
            codec: CodecRegistry::new().get(algorithm_ids::GZIP),
            minimum_length: min,
            ratio_percent: ratio,
        }
    }

    fn filled(data: &[u8], chunk_size: usize) -> (Chunk, usize) {
        let mut chunk = Chunk::new(chunk_size);
        let n = chunk.fill(&mut Cursor::new(data.to_vec())).unwrap();
        (chunk, n)
    }

    #[test]
    fn empty_read_is_terminal() {
        let (mut chunk, n) = filled(b"", 64);
        policy(0, 100).compress_chunk(&mut chunk, n).unwrap();
        assert!(chunk.is_end());
        assert!(!chunk.is_drained());
        assert_eq!(chunk.drain(&mut [0u8; 8]), 0);
    }

    #[test]
    fn repetitive_data_is_compressed() {
        let data = b"abcd".repeat(256);
        let (mut chunk, n) = filled(&data, 4096);
        policy(0, 100).compress_chunk(&mut chunk, n).unwrap();
        assert_eq!(chunk.algorithm(), Some(algorithm_ids::GZIP));
        assert!(chunk.emitted_len() < data.len());
    }

    #[test]
    fn tiny_chunk_is_not_worth_a_header() {
        let (mut chunk, n) = filled(b"aaaaaaaaaa", 64);
        policy(0, 100).compress_chunk(&mut chunk, n).unwrap();
        assert_eq!(chunk.source(), &ChunkSource::Original { len: 10, cursor: 0 });
    }

    #[test]
    fn minimum_length_keeps_original() {
        let data = b"abcd".repeat(256);
        let (mut chunk, n) = filled(&data, 4096);
        policy(data.len(), 100).compress_chunk(&mut chunk, n).unwrap();
        assert_eq!(chunk.algorithm(), None);
        assert_eq!(chunk.emitted_len(), data.len());
    }

    #[test]
    fn zero_ratio_never_compresses() {
        let data = vec![0u8; 4096];
        let (mut chunk, n) = filled(&data, 4096);
        policy(0, 0).compress_chunk(&mut chunk, n).unwrap();
        assert_eq!(chunk.algorithm(), None);
    }

    #[test]
    fn passthrough_policy_keeps_original() {
        let data = vec![0u8; 4096];
        let (mut chunk, n) = filled(&data, 4096);
        CompressionPolicy::passthrough().compress_chunk(&mut chunk, n).unwrap();

        let mut out = vec![0u8; 5000];
        assert_eq!(chunk.drain(&mut out), 4096);
        assert!(chunk.is_drained());
        assert_eq!(&out[..4096], &data[..]);
    }

    #[test]
    fn compressed_chunk_drains_header_then_payload() {
        let data = b"0123456789".repeat(100);
        let (mut chunk, n) = filled(&data, 2048);
        policy(0, 100).compress_chunk(&mut chunk, n).unwrap();
        let total = chunk.emitted_len();

        let mut wire = Vec::new();
        let mut buf = [0u8; 5];
        while !chunk.is_drained() {
            let n = chunk.drain(&mut buf);
            wire.extend_from_slice(&buf[..n]);
        }
        assert_eq!(wire.len(), total);

        let header = FrameHeader::parse(&wire).unwrap();
        assert_eq!(header.algorithm, algorithm_ids::GZIP);
        assert_eq!(header.uncompressed_size as usize, data.len());
        assert_eq!(header.compressed_size as usize, total - FrameHeader::LEN);
    }
}
