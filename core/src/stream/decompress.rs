//! stream/decompress.rs
//! Decoding reader: mixed raw/compressed frames in, original bytes out.

use std::io::{self, Read};
use std::time::Instant;

use log::{debug, trace, warn};

use crate::chunk::{ChunkDecompress, Loaded};
use crate::compression::{AlgorithmId, CodecRegistry};
use crate::stream::config::DecompressConfig;
use crate::stream::worker::{Executor, Gate, Slot};
use crate::stream::{check_read_args, forward_only};
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::StreamError;
use crate::utils::PushbackReader;

/// Reads a frame stream and yields the original bytes.
///
/// Frame parsing happens on the consumer thread, in order; only payload
/// decoding runs in the background, up to `pipeline_depth` frames ahead.
pub struct DecompressReader<R> {
    source: PushbackReader<R>,
    registry: CodecRegistry,
    slots: Vec<Slot<ChunkDecompress>>,
    active: usize,
    position: u64,
    last_algorithm: Option<AlgorithmId>,
    poisoned: bool,
    counters: TelemetryCounters,
    timer: TelemetryTimer,
    executor: Executor,
}

impl<R: Read> DecompressReader<R> {
    /// Reader recognising the built-in codecs.
    pub fn new(source: R, config: DecompressConfig) -> Result<Self, StreamError> {
        Self::with_registry(source, config, &CodecRegistry::new())
    }

    /// Reader recognising exactly the ids in `registry`. Anything else is raw.
    pub fn with_registry(source: R, config: DecompressConfig, registry: &CodecRegistry) -> Result<Self, StreamError> {
        config.validate()?;
        let depth = config.pipeline_depth;
        let executor = Executor::new(config.execution, depth, "chunkstream-decompress")?;

        debug!(
            "[DECOMPRESS] start: ids={:?} raw_run={} depth={} execution={:?}",
            registry.ids(),
            config.raw_run,
            depth,
            config.execution
        );

        let mut reader = Self {
            source: PushbackReader::new(source),
            registry: registry.clone(),
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
            reader.arm(index, config.raw_run)?;
        }
        Ok(reader)
    }

    /// Read up to `count` bytes into the start of `buf`.
    ///
    /// Same contract as [`CompressReader::read_into`](crate::stream::CompressReader::read_into).
    /// A frame whose payload does not decode to its declared size fails with
    /// `CorruptFrame`; every later read fails with `Poisoned`.
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
                trace!("[DECOMPRESS] read {n}/{count} bytes, position {}", self.position);
                Ok(n)
            }
            Err(e) => {
                warn!("[DECOMPRESS] stream failed at position {}: {e}", self.position);
                self.poisoned = true;
                Err(e)
            }
        }
    }

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
            let slot = self.slots[index]
                .settle(|waited, busy| timer.add_unit(index, Stage::Decompress, waited, busy))?;

            if slot.is_end() {
                return Ok(0);
            }

            let n = slot.drain(out);
            self.last_algorithm = slot.algorithm();

            if slot.is_drained() {
                self.counters.add_frame(slot.algorithm().is_some(), slot.len());
                // Raw runs follow the consumer's read size.
                self.arm(index, out.len())?;
                self.active = (index + 1) % self.slots.len();
            }

            if n > 0 {
                self.position += n as u64;
                return Ok(n);
            }
        }
    }

    /// Parse the next frame into slot `index` and start decoding it if needed.
    fn arm(&mut self, index: usize, raw_run: usize) -> Result<(), StreamError> {
        let mut chunk = self.slots[index].take().unwrap_or_default();

        let started = Instant::now();
        let loaded = chunk.load(&mut self.source, &self.registry, raw_run)?;
        self.timer.add_stage_time(Stage::Read, started.elapsed());
        self.counters.add_read(chunk.consumed());

        let gate = match loaded {
            Loaded::Ready => {
                if chunk.is_end() {
                    debug!("[DECOMPRESS] source exhausted, slot {index} is terminal");
                } else {
                    trace!("[DECOMPRESS] slot {index} holds {} raw bytes", chunk.len());
                }
                Gate::ready(Ok(chunk))
            }
            Loaded::Decode { header, codec } => {
                trace!(
                    "[DECOMPRESS] slot {index} decoding {} frame, {} -> {} bytes",
                    header.algorithm,
                    header.compressed_size,
                    header.uncompressed_size
                );
                self.executor.run(move || {
                    chunk.decode(&header, codec.as_ref())?;
                    Ok(chunk)
                })?
            }
        };
        self.slots[index] = Slot::Armed(gate);
        Ok(())
    }
}

impl<R: Read> Read for DecompressReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let count = buf.len();
        self.read_into(buf, 0, count).map_err(io::Error::from)
    }
}

forward_only!(DecompressReader);

impl<R> std::fmt::Debug for DecompressReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecompressReader")
            .field("registry", &self.registry)
            .field("depth", &self.slots.len())
            .field("position", &self.position)
            .field("poisoned", &self.poisoned)
            .finish()
    }
}
