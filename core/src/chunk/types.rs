use std::io::{self, Read};

use crate::compression::AlgorithmId;
use crate::framing::{copy_frame, FrameHeader};
use crate::utils::read_exact_or_eof;

/// What the next drains of a [`Chunk`] are served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkSource {
    /// Source exhausted: the slot is terminal and drains nothing, forever.
    None,
    /// Emit the original bytes untouched (raw frame).
    Original { len: usize, cursor: usize },
    /// Emit `header ++ compressed`; `cursor` runs over that virtual frame.
    Compressed { header: FrameHeader, cursor: usize },
}

/// Buffers owned by one compression slot.
///
/// `original` keeps a fixed length of `chunk_size`; `compressed` is the
/// growable scratch buffer the codec writes into.
#[derive(Debug)]
pub struct Chunk {
    pub(crate) original: Vec<u8>,
    pub(crate) compressed: Vec<u8>,
    pub(crate) source: ChunkSource,
}

impl Chunk {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            original: vec![0u8; chunk_size],
            compressed: Vec::new(),
            source: ChunkSource::None,
        }
    }

    /// Fill the original buffer from `source`, looping until it is full or
    /// the source ends. Returns the number of bytes read.
    pub fn fill<R: Read + ?Sized>(&mut self, source: &mut R) -> io::Result<usize> {
        read_exact_or_eof(source, &mut self.original)
    }

    pub fn capacity(&self) -> usize {
        self.original.len()
    }

    pub fn source(&self) -> &ChunkSource {
        &self.source
    }

    /// Copy up to `out.len()` bytes of the pending frame into `out`.
    pub fn drain(&mut self, out: &mut [u8]) -> usize {
        match &mut self.source {
            ChunkSource::None => 0,
            ChunkSource::Original { len, cursor } => {
                let n = (*len - *cursor).min(out.len());
                out[..n].copy_from_slice(&self.original[*cursor..*cursor + n]);
                *cursor += n;
                n
            }
            ChunkSource::Compressed { header, cursor } => {
                let n = copy_frame(&header.encode(), &self.compressed, *cursor, out);
                *cursor += n;
                n
            }
        }
    }

    /// Every byte of the pending frame has left the slot.
    ///
    /// A terminal slot is never drained: it keeps answering 0.
    pub fn is_drained(&self) -> bool {
        match &self.source {
            ChunkSource::None => false,
            ChunkSource::Original { len, cursor } => cursor >= len,
            ChunkSource::Compressed { header, cursor } => *cursor >= header.frame_len(),
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self.source, ChunkSource::None)
    }

    /// Algorithm of the pending frame, `None` for raw or terminal slots.
    pub fn algorithm(&self) -> Option<AlgorithmId> {
        match &self.source {
            ChunkSource::Compressed { header, .. } => Some(header.algorithm),
            _ => None,
        }
    }

    /// Bytes this chunk emits in total (raw length or header plus payload).
    pub fn emitted_len(&self) -> usize {
        match &self.source {
            ChunkSource::None => 0,
            ChunkSource::Original { len, .. } => *len,
            ChunkSource::Compressed { header, .. } => header.frame_len(),
        }
    }
}

/// Buffers owned by one decompression slot.
///
/// Holds either the decoded bytes of a compressed frame or a run of raw
/// passthrough bytes; either way `out[cursor..]` is what the consumer gets next.
#[derive(Debug, Default)]
pub struct ChunkDecompress {
    /// Payload of the current compressed frame.
    pub(crate) payload: Vec<u8>,
    /// Decoded or raw bytes waiting to be drained.
    pub(crate) out: Vec<u8>,
    pub(crate) cursor: usize,
    pub(crate) algorithm: Option<AlgorithmId>,
    /// Source bytes this frame occupied on the wire.
    pub(crate) consumed: usize,
    pub(crate) end: bool,
}

impl ChunkDecompress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous frame; buffers keep their capacity.
    pub(crate) fn reset(&mut self) {
        self.payload.clear();
        self.out.clear();
        self.cursor = 0;
        self.algorithm = None;
        self.consumed = 0;
        self.end = false;
    }

    pub fn len(&self) -> usize {
        self.out.len()
    }

    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    pub fn drain(&mut self, out: &mut [u8]) -> usize {
        let n = (self.out.len() - self.cursor).min(out.len());
        out[..n].copy_from_slice(&self.out[self.cursor..self.cursor + n]);
        self.cursor += n;
        n
    }

    /// All bytes of the frame have been handed out. A terminal slot never is.
    pub fn is_drained(&self) -> bool {
        !self.end && self.cursor >= self.out.len()
    }

    pub fn is_end(&self) -> bool {
        self.end
    }

    pub fn algorithm(&self) -> Option<AlgorithmId> {
        self.algorithm
    }

    pub fn consumed(&self) -> usize {
        self.consumed
    }
}
