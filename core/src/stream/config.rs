//! stream/config.rs
//! Per-stream configuration. Immutable once a reader is built.

use serde::{Deserialize, Serialize};

use crate::compression::AlgorithmId;
use crate::constants::{
    DEFAULT_CHUNK_SIZE, DEFAULT_MINIMUM_LENGTH, DEFAULT_PIPELINE_DEPTH, DEFAULT_RATIO_PERCENT,
    MAX_CHUNK_SIZE, MAX_PIPELINE_DEPTH,
};
use crate::types::StreamError;

/// Where a slot's background unit runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Execution {
    /// Units run on a pool of `pipeline_depth` worker threads, overlapping
    /// with consumption.
    #[default]
    Pooled,
    /// Units run on the reading thread when a slot is armed. No overlap.
    Inline,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// `None` means never compress.
    pub algorithm: Option<AlgorithmId>,
    pub compress_only_minimum_length: usize,
    /// 0..=100. A chunk is compressed only when
    /// `compressed * 100 / original < compress_only_ratio_percent`.
    pub compress_only_ratio_percent: u8,
    /// Bytes read from the source per chunk. Clamped to `MAX_CHUNK_SIZE`.
    pub chunk_size: usize,
    /// Number of prepared chunk slots.
    pub pipeline_depth: usize,
    pub execution: Execution,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            algorithm: None,
            compress_only_minimum_length: DEFAULT_MINIMUM_LENGTH,
            compress_only_ratio_percent: DEFAULT_RATIO_PERCENT,
            chunk_size: DEFAULT_CHUNK_SIZE,
            pipeline_depth: DEFAULT_PIPELINE_DEPTH,
            execution: Execution::default(),
        }
    }
}

impl StreamConfig {
    pub fn new(algorithm: Option<AlgorithmId>) -> Self {
        Self { algorithm, ..Self::default() }
    }

    /// Config from a textual id; `""` means passthrough only.
    pub fn parse_algorithm(text: &str) -> Result<Self, StreamError> {
        Ok(Self::new(AlgorithmId::parse(text)?))
    }

    pub fn with_algorithm(mut self, algorithm: Option<AlgorithmId>) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_minimum_length(mut self, len: usize) -> Self {
        self.compress_only_minimum_length = len;
        self
    }

    pub fn with_ratio_percent(mut self, percent: u8) -> Self {
        self.compress_only_ratio_percent = percent;
        self
    }

    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    pub fn with_pipeline_depth(mut self, depth: usize) -> Self {
        self.pipeline_depth = depth;
        self
    }

    /// One slot per available core, leaving one for the consumer.
    pub fn with_auto_depth(self) -> Self {
        self.with_pipeline_depth(auto_depth())
    }

    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    /// Chunk size actually used: the configured size, capped.
    pub fn effective_chunk_size(&self) -> usize {
        self.chunk_size.min(MAX_CHUNK_SIZE)
    }

    pub fn validate(&self) -> Result<(), StreamError> {
        if self.chunk_size == 0 {
            return Err(StreamError::InvalidArgument("chunk_size must be greater than 0".into()));
        }
        if self.compress_only_ratio_percent > 100 {
            return Err(StreamError::InvalidArgument(format!(
                "compress_only_ratio_percent must be within 0..=100, got {}",
                self.compress_only_ratio_percent
            )));
        }
        validate_depth(self.pipeline_depth)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecompressConfig {
    pub pipeline_depth: usize,
    pub execution: Execution,
    /// Raw run length used when a slot is first armed, before any consumer
    /// read size is known.
    pub raw_run: usize,
}

impl Default for DecompressConfig {
    fn default() -> Self {
        Self {
            pipeline_depth: DEFAULT_PIPELINE_DEPTH,
            execution: Execution::default(),
            raw_run: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl DecompressConfig {
    pub fn with_pipeline_depth(mut self, depth: usize) -> Self {
        self.pipeline_depth = depth;
        self
    }

    pub fn with_auto_depth(self) -> Self {
        self.with_pipeline_depth(auto_depth())
    }

    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    pub fn with_raw_run(mut self, raw_run: usize) -> Self {
        self.raw_run = raw_run;
        self
    }

    pub fn validate(&self) -> Result<(), StreamError> {
        if self.raw_run == 0 {
            return Err(StreamError::InvalidArgument("raw_run must be greater than 0".into()));
        }
        validate_depth(self.pipeline_depth)
    }
}

fn validate_depth(depth: usize) -> Result<(), StreamError> {
    if depth == 0 || depth > MAX_PIPELINE_DEPTH {
        return Err(StreamError::InvalidArgument(format!(
            "pipeline_depth must be within 1..={MAX_PIPELINE_DEPTH}, got {depth}"
        )));
    }
    Ok(())
}

fn auto_depth() -> usize {
    num_cpus::get().saturating_sub(1).clamp(1, MAX_PIPELINE_DEPTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::algorithm_ids;

    #[test]
    fn defaults_follow_constants() {
        let cfg = StreamConfig::default();
        assert_eq!(cfg.algorithm, None);
        assert_eq!(cfg.chunk_size, 80 * 1024);
        assert_eq!(cfg.pipeline_depth, 1);
        assert_eq!(cfg.compress_only_ratio_percent, 100);
        assert_eq!(cfg.compress_only_minimum_length, 0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn oversized_chunk_is_clamped() {
        let cfg = StreamConfig::default().with_chunk_size(1 << 20);
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.effective_chunk_size(), MAX_CHUNK_SIZE);
    }

    #[test]
    fn zero_values_are_rejected() {
        assert!(StreamConfig::default().with_chunk_size(0).validate().is_err());
        assert!(StreamConfig::default().with_pipeline_depth(0).validate().is_err());
        assert!(StreamConfig::default().with_ratio_percent(101).validate().is_err());
        assert!(DecompressConfig::default().with_pipeline_depth(0).validate().is_err());
        assert!(DecompressConfig::default().with_raw_run(0).validate().is_err());
    }

    #[test]
    fn auto_depth_is_valid() {
        assert!(StreamConfig::default().with_auto_depth().validate().is_ok());
        assert!(DecompressConfig::default().with_auto_depth().validate().is_ok());
    }

    #[test]
    fn parse_algorithm_checks_length() {
        assert_eq!(StreamConfig::parse_algorithm("").unwrap().algorithm, None);
        assert_eq!(
            StreamConfig::parse_algorithm("gzip").unwrap().algorithm,
            Some(algorithm_ids::GZIP)
        );
        assert!(matches!(
            StreamConfig::parse_algorithm("br"),
            Err(StreamError::InvalidArgument(_))
        ));
    }
}
