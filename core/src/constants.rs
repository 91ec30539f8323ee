/// Default and hard upper bound for the chunk read before compression (80 KiB).
///
/// Largest multiple of 4096 below the 85 000 byte large-buffer threshold used
/// by common stream copy loops, so one chunk maps onto one typical copy call.
pub const DEFAULT_CHUNK_SIZE: usize = 80 * 1024;

/// Chunk sizes above this value are clamped.
pub const MAX_CHUNK_SIZE: usize = DEFAULT_CHUNK_SIZE;

/// Default number of prepared chunk slots (1 = no overlap between slots).
pub const DEFAULT_PIPELINE_DEPTH: usize = 1;

/// Upper bound for `pipeline_depth` (each slot owns a worker thread).
pub const MAX_PIPELINE_DEPTH: usize = 64;

/// Default `compress_only_ratio_percent`: every compressed size is acceptable.
pub const DEFAULT_RATIO_PERCENT: u8 = 100;

/// Default `compress_only_minimum_length`: compress chunks of any size.
pub const DEFAULT_MINIMUM_LENGTH: usize = 0;

/// Size of an algorithm identifier on the wire.
pub const ALGORITHM_ID_LEN: usize = 4;

/// Never pre-allocate more than this for a size taken from the wire; larger
/// frames grow their buffers while the bytes actually arrive.
pub const MAX_PREALLOC: usize = 4 * 1024 * 1024;
