//! Wave Scheduler
//!
//! The scheduler owns the queue of pending jobs (neighbor alerts, initial
//! firings of new propagators) and drives it to a fixed point.
//!
//! # Algorithm
//!
//! `run()` proceeds in bulk-synchronous waves:
//!
//! 1. Swap the live queue out under its lock. The snapshot is this wave; the
//!    live queue is now empty.
//! 2. Execute every job of the snapshot concurrently.
//! 3. Wait for all of them. Jobs scheduled while the wave was running landed
//!    in the live queue and form the next wave.
//! 4. Stop when a snapshot is empty: the previous wave produced no new work,
//!    so the network is quiescent.
//!
//! A wave never runs a job from a later generation, so every propagator in a
//! wave sees its inputs as the earlier waves left them (plus whatever its
//! siblings wrote concurrently).
//!
//! # Failure
//!
//! When a job of a wave raises an inconsistency the remaining jobs of that
//! wave still run to completion. The first failure to complete is returned and
//! no further wave starts. Jobs produced by the failing wave stay queued.

use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures_util::stream::{FuturesUnordered, Stream, StreamExt};
use futures_util::FutureExt;
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinError;
use tracing::{debug, warn};

use super::propagator::{Job, Propagator};
use crate::config::{ExecutionMode, NetworkConfig};
use crate::error::{Error, Inconsistency, Result};

/// Counters describing the work a scheduler has done so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Waves executed across all runs.
    pub waves: u64,
    /// Jobs executed across all runs.
    pub jobs: u64,
}

/// The job queue shared by every cell and propagator of a network.
///
/// Cloning is cheap and yields a handle to the same queue.
#[derive(Clone, Default)]
pub struct Scheduler {
    inner: Arc<SchedulerInner>,
}

#[derive(Default)]
struct SchedulerInner {
    jobs: Mutex<VecDeque<Job>>,
    config: NetworkConfig,
    waves: AtomicU64,
    executed: AtomicU64,
}

impl Scheduler {
    /// Create a scheduler with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scheduler with the given configuration.
    pub fn with_config(config: NetworkConfig) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                config,
                ..SchedulerInner::default()
            }),
        }
    }

    /// The configuration this scheduler runs with.
    pub fn config(&self) -> &NetworkConfig {
        &self.inner.config
    }

    /// Append a job to the pending queue.
    ///
    /// The job is not polled until the next wave of [`run`](Self::run).
    pub fn schedule<F>(&self, job: F)
    where
        F: Future<Output = Result<(), Inconsistency>> + Send + 'static,
    {
        self.inner.jobs.lock().push_back(job.boxed());
    }

    /// Schedule one firing of `propagator`.
    pub fn alert(&self, propagator: &Propagator) {
        self.inner.jobs.lock().push_back(propagator.alert());
    }

    /// Schedule one firing of each propagator.
    pub fn alert_all<'a, I>(&self, propagators: I)
    where
        I: IntoIterator<Item = &'a Propagator>,
    {
        let mut jobs = self.inner.jobs.lock();
        jobs.extend(propagators.into_iter().map(Propagator::alert));
    }

    /// Number of jobs waiting for the next wave.
    pub fn pending(&self) -> usize {
        self.inner.jobs.lock().len()
    }

    /// Work done so far.
    pub fn stats(&self) -> SchedulerStats {
        SchedulerStats {
            waves: self.inner.waves.load(Ordering::Relaxed),
            jobs: self.inner.executed.load(Ordering::Relaxed),
        }
    }

    /// Drain the queue in waves until the network is quiescent.
    ///
    /// Returns the first inconsistency raised. With
    /// [`ExecutionMode::Parallel`] outside a tokio runtime, waves are
    /// executed cooperatively instead.
    pub async fn run(&self) -> Result<()> {
        let mut waves_this_run = 0usize;

        loop {
            let wave = self.take_wave();
            if wave.is_empty() {
                debug!(waves = waves_this_run, "network quiescent");
                return Ok(());
            }

            if let Some(limit) = self.inner.config.max_waves {
                if waves_this_run >= limit {
                    self.requeue(wave);
                    warn!(limit, pending = self.pending(), "wave limit reached before fixed point");
                    return Err(Error::WaveLimitExceeded { limit });
                }
            }

            waves_this_run += 1;
            let index = self.inner.waves.fetch_add(1, Ordering::Relaxed) + 1;
            self.inner
                .executed
                .fetch_add(wave.len() as u64, Ordering::Relaxed);
            debug!(wave = index, jobs = wave.len(), "starting wave");

            if let Err(err) = self.execute_wave(wave).await {
                warn!(wave = index, error = %err, "wave failed");
                return Err(err);
            }
        }
    }

    fn take_wave(&self) -> VecDeque<Job> {
        std::mem::take(&mut *self.inner.jobs.lock())
    }

    /// Put an unexecuted wave back in front of anything scheduled since.
    fn requeue(&self, wave: VecDeque<Job>) {
        let mut jobs = self.inner.jobs.lock();
        let newer = std::mem::replace(&mut *jobs, wave);
        jobs.extend(newer);
    }

    async fn execute_wave(&self, wave: VecDeque<Job>) -> Result<()> {
        if self.spawns_tasks() {
            let running: FuturesUnordered<_> = wave
                .into_iter()
                .map(|job| tokio::spawn(job).map(flatten_join))
                .collect();
            first_failure(running).await
        } else {
            let running: FuturesUnordered<_> = wave
                .into_iter()
                .map(|job| job.map(|outcome| outcome.map_err(Error::from)))
                .collect();
            first_failure(running).await
        }
    }

    /// Parallel execution needs a tokio runtime to spawn onto. Without one
    /// the wave is polled in place.
    fn spawns_tasks(&self) -> bool {
        match self.inner.config.execution {
            ExecutionMode::Parallel => {
                let available = Handle::try_current().is_ok();
                if !available {
                    debug!("no tokio runtime, executing wave cooperatively");
                }
                available
            }
            ExecutionMode::Cooperative => false,
        }
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("pending", &self.pending())
            .field("stats", &self.stats())
            .field("config", &self.inner.config)
            .finish()
    }
}

fn flatten_join(joined: Result<Result<(), Inconsistency>, JoinError>) -> Result<()> {
    match joined {
        Ok(outcome) => outcome.map_err(Error::from),
        Err(err) => Err(Error::JobPanicked(err.to_string())),
    }
}

/// Drive every outcome to completion and keep the first failure.
async fn first_failure<S>(mut outcomes: S) -> Result<()>
where
    S: Stream<Item = Result<()>> + Unpin,
{
    let mut first = None;
    while let Some(outcome) = outcomes.next().await {
        if let Err(err) = outcome {
            if first.is_none() {
                first = Some(err);
            } else {
                debug!(error = %err, "further failure in failing wave");
            }
        }
    }
    first.map_or(Ok(()), Err)
}
