//! stream/worker.rs
//! Bounded worker pool, one-shot gates and pipeline slots.
//!
//! A slot's buffers move into a job, the job runs on a worker (or inline),
//! and the buffers come back through a gate created fresh for that cycle.
//! Nothing is shared between a slot and a worker at the same time.

use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam::channel::{bounded, unbounded, Receiver, Sender};
use log::{debug, warn};

use crate::stream::config::Execution;
use crate::types::StreamError;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// What a background unit hands back: its result and how long it ran.
#[derive(Debug)]
pub struct Unit<T> {
    pub result: Result<T, StreamError>,
    pub busy: Duration,
}

/// Receiving end of a one-shot readiness signal.
///
/// Created per cycle and consumed by `wait`, so a gate can never be observed
/// twice or reused across cycles.
#[derive(Debug)]
pub struct Gate<T> {
    rx: Receiver<Unit<T>>,
}

impl<T> Gate<T> {
    /// A gate that is already open.
    pub fn ready(result: Result<T, StreamError>) -> Self {
        let (tx, rx) = bounded(1);
        // Capacity 1 and the receiver is alive: cannot fail.
        let _ = tx.send(Unit { result, busy: Duration::ZERO });
        Self { rx }
    }

    /// Block until the unit behind this gate finished.
    pub fn wait(self) -> Result<Unit<T>, StreamError> {
        self.rx
            .recv()
            .map_err(|_| StreamError::Pipeline("worker dropped a unit without completing it"))
    }
}

/// Fixed set of worker threads pulling jobs from one queue.
pub struct WorkerPool {
    jobs: Option<Sender<Job>>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub fn new(workers: usize, name: &str) -> Result<Self, StreamError> {
        let (tx, rx) = unbounded::<Job>();
        let mut handles = Vec::with_capacity(workers);

        for i in 0..workers {
            let rx = rx.clone();
            let handle = thread::Builder::new()
                .name(format!("{name}-{i}"))
                .spawn(move || {
                    debug!("[WORKER-{i}] starting");
                    for job in rx.iter() {
                        // A panicking job drops its gate sender; the slot sees a
                        // pipeline error and this worker keeps serving.
                        if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                            warn!("[WORKER-{i}] job panicked");
                        }
                    }
                    debug!("[WORKER-{i}] finished");
                })?;
            handles.push(handle);
        }

        Ok(Self { jobs: Some(tx), handles })
    }

    pub fn submit(&self, job: impl FnOnce() + Send + 'static) -> Result<(), StreamError> {
        self.jobs
            .as_ref()
            .ok_or(StreamError::Pipeline("worker pool is shut down"))?
            .send(Box::new(job))
            .map_err(|_| StreamError::Pipeline("worker pool job channel closed"))
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Closing the queue lets workers finish queued jobs and exit.
        drop(self.jobs.take());
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool").field("workers", &self.handles.len()).finish()
    }
}

/// Runs slot units either on a pool or on the calling thread.
#[derive(Debug)]
pub enum Executor {
    Inline,
    Pooled(WorkerPool),
}

impl Executor {
    pub fn new(execution: Execution, workers: usize, name: &str) -> Result<Self, StreamError> {
        match execution {
            Execution::Inline => Ok(Executor::Inline),
            Execution::Pooled => Ok(Executor::Pooled(WorkerPool::new(workers, name)?)),
        }
    }

    /// Start `unit` and return the gate that opens when it is done.
    pub fn run<T, F>(&self, unit: F) -> Result<Gate<T>, StreamError>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, StreamError> + Send + 'static,
    {
        let (tx, rx) = bounded(1);
        let job = move || {
            let started = Instant::now();
            let result = unit();
            // The reader may be gone already; nobody is left to care.
            let _ = tx.send(Unit { result, busy: started.elapsed() });
        };

        match self {
            Executor::Inline => job(),
            Executor::Pooled(pool) => pool.submit(job)?,
        }
        Ok(Gate { rx })
    }
}

/// One position in the round-robin ring.
#[derive(Debug)]
pub enum Slot<T> {
    /// Nothing in flight and no buffers (before the first arm, or after a failure).
    Vacant,
    /// A unit is in flight; its buffers are inside the job.
    Armed(Gate<T>),
    /// Buffers are back and ready to drain.
    Ready(T),
}

impl<T> Slot<T> {
    /// Wait for an armed slot to become ready and borrow its buffers.
    ///
    /// `record(waited, busy)` is told how long the caller blocked and how long
    /// the unit ran.
    pub fn settle(&mut self, record: impl FnOnce(Duration, Duration)) -> Result<&mut T, StreamError> {
        if let Slot::Armed(_) = self {
            if let Slot::Armed(gate) = std::mem::replace(self, Slot::Vacant) {
                let started = Instant::now();
                let unit = gate.wait()?;
                record(started.elapsed(), unit.busy);
                *self = Slot::Ready(unit.result?);
            }
        }

        match self {
            Slot::Ready(value) => Ok(value),
            _ => Err(StreamError::Pipeline("slot read before it was armed")),
        }
    }

    /// Take the buffers out of a ready slot for the next cycle.
    pub fn take(&mut self) -> Option<T> {
        match std::mem::replace(self, Slot::Vacant) {
            Slot::Ready(value) => Some(value),
            other => {
                *self = other;
                None
            }
        }
    }
}
