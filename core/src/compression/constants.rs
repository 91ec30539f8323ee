use crate::compression::types::AlgorithmId;

/// Stable wire identifiers (4 ASCII bytes, space padded).
pub mod algorithm_ids {
    use super::AlgorithmId;

    pub const GZIP: AlgorithmId    = AlgorithmId::new(*b"gzip");
    pub const DEFLATE: AlgorithmId = AlgorithmId::new(*b"defl");
    pub const BROTLI: AlgorithmId  = AlgorithmId::new(*b"br  ");
    pub const ZSTD: AlgorithmId    = AlgorithmId::new(*b"zstd");
    pub const LZ4: AlgorithmId     = AlgorithmId::new(*b"lz4 ");
}

/// Default compression levels (balanced).
pub const DEFAULT_LEVEL_GZIP: u32 = 6;
pub const DEFAULT_LEVEL_DEFLATE: u32 = 6;
pub const DEFAULT_QUALITY_BROTLI: u32 = 5;
pub const DEFAULT_LEVEL_ZSTD: i32 = 3;

/// Brotli window (log2) and internal buffer size.
pub const BROTLI_LGWIN: u32 = 22;
pub const BROTLI_BUFFER_SIZE: usize = 4096;

/// Ids always present in `CodecRegistry::new()`.
pub const BUILTIN_IDS: [AlgorithmId; 3] = [
    algorithm_ids::GZIP,
    algorithm_ids::DEFLATE,
    algorithm_ids::BROTLI,
];
