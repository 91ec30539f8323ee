//! Chunk slots.
//!
//! A `Chunk` carries one compression cycle (fill, decide, drain); a
//! `ChunkDecompress` carries one decompression cycle (load, decode, drain).
//! Both are owned by exactly one pipeline slot and handed to a worker and
//! back, never shared.

pub mod types;
pub mod compress;
pub mod decompress;

pub use types::{Chunk, ChunkDecompress, ChunkSource};
pub use compress::CompressionPolicy;
pub use decompress::Loaded;
