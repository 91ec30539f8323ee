//! Wire framing.
//!
//! Responsibilities:
//! - Define the 12-byte compressed frame header
//! - Emit frames across arbitrary partial reads
//! - Pull frames off a byte source, degrading truncated input to raw bytes
//!
//! Non-responsibilities:
//! - Choosing whether to compress
//! - Concurrency

pub mod types;
pub mod encode;
pub mod decode;

pub use types::{
    FrameHeader,
    FrameError,
};
pub use encode::{copy_frame, encode_frame};
pub use decode::{decode_payload, read_frame, FrameRead};
