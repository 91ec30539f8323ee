//! compression/mod.rs
//! Codec registry: 4-byte algorithm id -> stateless chunk transform.
//!
//! Notes:
//! - Every chunk is compressed as an independent stream so slots never share
//!   codec state.
//! - The registry is pluggable; ids must be exactly 4 bytes.

pub mod constants;
pub mod types;
pub mod registry;
pub mod codecs;

pub use constants::*;
pub use types::*;
pub use registry::*;
