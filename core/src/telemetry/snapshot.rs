//! telemetry/snapshot.rs
//! Immutable view of a stream's counters and timings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::TelemetryCounters;
use crate::telemetry::timers::{Stage, StageTimes, TelemetryTimer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub counters: TelemetryCounters,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
    /// Blocked time per slot, in slot order.
    pub slot_blocked: Vec<Duration>,
}

impl TelemetrySnapshot {
    pub fn from(counters: &TelemetryCounters, timer: &TelemetryTimer) -> Self {
        Self {
            counters: counters.clone(),
            elapsed: timer.elapsed(),
            stage_times: timer.stage_times.clone(),
            slot_blocked: timer.slot_blocked.clone(),
        }
    }

    /// `bytes_out / bytes_in`, or 0.0 before anything was read.
    ///
    /// Below 1.0 on an encoder that found compressible data, above 1.0 on a
    /// decoder expanding frames.
    pub fn compression_ratio(&self) -> f64 {
        if self.counters.bytes_in == 0 {
            return 0.0;
        }
        self.counters.bytes_out as f64 / self.counters.bytes_in as f64
    }

    pub fn total_blocked(&self) -> Duration {
        self.slot_blocked.iter().copied().sum()
    }

    pub fn blocked_on(&self, slot: usize) -> Duration {
        self.slot_blocked.get(slot).copied().unwrap_or(Duration::ZERO)
    }

    pub fn stage(&self, stage: Stage) -> Duration {
        self.stage_times.get(stage)
    }

    pub fn chunks(&self) -> u64 {
        self.counters.chunks_original + self.counters.chunks_compressed
    }

    pub fn frames(&self) -> u64 {
        self.counters.frames_raw + self.counters.frames_compressed
    }
}
