//! stream/compress.rs
//! Encoding reader: source bytes in, mixed raw/compressed frames out.

use std::io::{self, Read};
use std::sync::Arc;
use std::time::Instant;

use log::{debug, trace, warn};

use crate::chunk::{Chunk, CompressionPolicy};
use crate::compression::{AlgorithmId, CodecRegistry};
use crate::stream::config::StreamConfig;
use crate::stream::worker::{Executor, Slot};
use crate::stream::{check_read_args, forward_only};
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::StreamError;

/// Reads `source` and yields its bytes cut into chunks, each chunk either
/// compressed into a frame or passed through raw.
///
/// With `pipeline_depth = N` up to N chunks are compressed ahead of the
/// consumer. Output order always follows source order.
pub struct CompressReader<R> {
    source: R,
    policy: Arc<CompressionPolicy>,
    chunk_size: usize,
    slots: Vec<Slot<Chunk>>,
    active: usize,
    position: u64,
    last_algorithm: Option<AlgorithmId>,
    poisoned: bool,
    counters: TelemetryCounters,
    timer: TelemetryTimer,
    // Last: dropping the pool joins its workers after the slots are gone.
    executor: Executor,
}

impl<R: Read> CompressReader<R> {
    /// Reader over the built-in codecs.
    pub fn new(source: R, config: StreamConfig) -> Result<Self, StreamError> {
        Self::with_registry(source, config, &CodecRegistry::new())
    }

    /// Reader resolving `config.algorithm` in `registry`.
    ///
    /// Configuration errors are reported before the source is touched. On
    /// success every slot has been armed once.
    pub fn with_registry(source: R, config: StreamConfig, registry: &CodecRegistry) -> Result<Self, StreamError> {
        config.validate()?;
        let codec = config.algorithm.map(|id| registry.resolve(id)).transpose()?;

        let policy = CompressionPolicy {
            codec,
            minimum_length: config.compress_only_minimum_length,
            ratio_percent: config.compress_only_ratio_percent,
        };
        let depth = config.pipeline_depth;
        let executor = Executor::new(config.execution, depth, "chunkstream-compress")?;

        debug!(
            "[COMPRESS] start: algorithm={:?} chunk_size={} depth={} execution={:?}",
            config.algorithm,
            config.effective_chunk_size(),
            depth,
            config.execution
        );

        let mut reader = Self {
            source,
            policy: Arc::new(policy),
            chunk_size: config.effective_chunk_size(),
            slots: (0..depth).map(|_| Slot::Vacant).collect(),
            active: 0,
            position: 0,
            last_algorithm: None,
            poisoned: false,
            counters: TelemetryCounters::default(),
            timer: TelemetryTimer::new(depth),
            executor,
        };

        for index in 0..depth {
            reader.arm(index)?;
        }
        Ok(reader)
    }

    /// Read up to `count` bytes into the start of `buf`.
    ///
    /// `offset` must be 0 and `count` must fit `buf`. Returns 0 once the
    /// source is exhausted and every frame has been delivered.
    pub fn read_into(&mut self, buf: &mut [u8], offset: usize, count: usize) -> Result<usize, StreamError> {
        check_read_args(buf.len(), offset, count)?;
        if count == 0 {
            return Ok(0);
        }
        if self.poisoned {
            return Err(StreamError::Poisoned);
        }

        match self.pull(&mut buf[..count]) {
            Ok(n) => {
                trace!("[COMPRESS] read {n}/{count} bytes, position {}", self.position);
                Ok(n)
            }
            Err(e) => {
                warn!("[COMPRESS] stream failed at position {}: {e}", self.position);
                self.poisoned = true;
                Err(e)
            }
        }
    }

    /// Bytes delivered to the consumer so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Algorithm of the frame the last read came from, `None` for raw data.
    pub fn last_read_algorithm(&self) -> Option<AlgorithmId> {
        self.last_algorithm
    }

    pub fn pipeline_depth(&self) -> usize {
        self.slots.len()
    }

    pub fn telemetry(&self) -> TelemetrySnapshot {
        TelemetrySnapshot::from(&self.counters, &self.timer)
    }

    fn pull(&mut self, out: &mut [u8]) -> Result<usize, StreamError> {
        loop {
            let index = self.active;
            let timer = &mut self.timer;
            let chunk = self.slots[index]
                .settle(|waited, busy| timer.add_unit(index, Stage::Compress, waited, busy))?;

            if chunk.is_end() {
                return Ok(0);
            }

            let n = chunk.drain(out);
            self.last_algorithm = chunk.algorithm();

            if chunk.is_drained() {
                self.counters.add_chunk(chunk.algorithm().is_some(), chunk.emitted_len());
                self.arm(index)?;
                self.active = (index + 1) % self.slots.len();
            }

            if n > 0 {
                self.position += n as u64;
                return Ok(n);
            }
        }
    }

    /// Fill slot `index` from the source and start its compression unit.
    fn arm(&mut self, index: usize) -> Result<(), StreamError> {
        let mut chunk = self.slots[index]
            .take()
            .unwrap_or_else(|| Chunk::new(self.chunk_size));

        let started = Instant::now();
        let read = chunk.fill(&mut self.source)?;
        self.timer.add_stage_time(Stage::Read, started.elapsed());
        self.counters.add_read(read);

        if read == 0 {
            debug!("[COMPRESS] source exhausted, slot {index} is terminal");
        } else {
            trace!("[COMPRESS] slot {index} armed with {read} bytes");
        }

        let policy = Arc::clone(&self.policy);
        let gate = self.executor.run(move || {
            policy.compress_chunk(&mut chunk, read)?;
            Ok(chunk)
        })?;
        self.slots[index] = Slot::Armed(gate);
        Ok(())
    }
}

impl<R: Read> Read for CompressReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let count = buf.len();
        self.read_into(buf, 0, count).map_err(io::Error::from)
    }
}

forward_only!(CompressReader);

impl<R> std::fmt::Debug for CompressReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompressReader")
            .field("policy", &self.policy)
            .field("chunk_size", &self.chunk_size)
            .field("depth", &self.slots.len())
            .field("position", &self.position)
            .field("poisoned", &self.poisoned)
            .finish()
    }
}
