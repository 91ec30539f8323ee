//! telemetry/timers.rs
//! Stage timers for chunk pipelines.
//!
//! `Read` is time spent on the source, `Compress`/`Decompress` is busy time of
//! background units, `Wait` is time the consumer blocked on a slot gate.

use std::collections::{hash_map, HashMap};
use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Read,
    Compress,
    Decompress,
    Wait,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Read       => "read",
            Stage::Compress   => "compress",
            Stage::Decompress => "decompress",
            Stage::Wait       => "wait",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageTimes {
    times: HashMap<Stage, Duration>,
}

impl StageTimes {
    /// Add duration to a stage (accumulates if already present).
    pub fn add(&mut self, stage: Stage, dur: Duration) {
        *self.times.entry(stage).or_insert(Duration::ZERO) += dur;
    }

    /// Total duration for a stage.
    pub fn get(&self, stage: Stage) -> Duration {
        self.times.get(&stage).copied().unwrap_or(Duration::ZERO)
    }

    /// Sum of all stage durations.
    pub fn total(&self) -> Duration {
        self.times.values().copied().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Stage, &Duration)> {
        self.times.iter()
    }
}

impl IntoIterator for StageTimes {
    type Item = (Stage, Duration);
    type IntoIter = hash_map::IntoIter<Stage, Duration>;

    fn into_iter(self) -> Self::IntoIter {
        self.times.into_iter()
    }
}

impl<'a> IntoIterator for &'a StageTimes {
    type Item = (&'a Stage, &'a Duration);
    type IntoIter = hash_map::Iter<'a, Stage, Duration>;

    fn into_iter(self) -> Self::IntoIter {
        self.times.iter()
    }
}

/// Wall clock of one stream plus its stage times and per-slot blocked time.
#[derive(Clone, Debug)]
pub struct TelemetryTimer {
    pub start_time: Instant,
    pub stage_times: StageTimes,
    /// Time the consumer spent blocked on each slot's gate.
    pub slot_blocked: Vec<Duration>,
}

impl TelemetryTimer {
    pub fn new(slots: usize) -> Self {
        Self {
            start_time: Instant::now(),
            stage_times: StageTimes::default(),
            slot_blocked: vec![Duration::ZERO; slots],
        }
    }

    pub fn add_stage_time(&mut self, stage: Stage, dur: Duration) {
        self.stage_times.add(stage, dur);
    }

    /// Record a gate wait on `slot` and the busy time of the unit behind it.
    pub fn add_unit(&mut self, slot: usize, stage: Stage, waited: Duration, busy: Duration) {
        self.stage_times.add(Stage::Wait, waited);
        self.stage_times.add(stage, busy);
        if let Some(total) = self.slot_blocked.get_mut(slot) {
            *total += waited;
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_times_accumulate() {
        let mut times = StageTimes::default();
        times.add(Stage::Read, Duration::from_micros(100));
        times.add(Stage::Read, Duration::from_micros(50));
        times.add(Stage::Compress, Duration::from_micros(420));

        assert_eq!(times.get(Stage::Read), Duration::from_micros(150));
        assert_eq!(times.get(Stage::Wait), Duration::ZERO);
        assert_eq!(times.total(), Duration::from_micros(570));
        assert_eq!(Stage::Decompress.to_string(), "decompress");
    }

    #[test]
    fn unit_time_lands_on_its_slot() {
        let mut timer = TelemetryTimer::new(2);
        timer.add_unit(1, Stage::Compress, Duration::from_millis(3), Duration::from_millis(5));
        timer.add_unit(7, Stage::Compress, Duration::from_millis(1), Duration::ZERO);

        assert_eq!(timer.slot_blocked, vec![Duration::ZERO, Duration::from_millis(3)]);
        assert_eq!(timer.stage_times.get(Stage::Wait), Duration::from_millis(4));
        assert_eq!(timer.stage_times.get(Stage::Compress), Duration::from_millis(5));
    }
}
