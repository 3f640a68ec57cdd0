//! Network Configuration
//!
//! [`NetworkConfig`] controls how the scheduler executes waves. The defaults
//! match the engine's contract: every job of a wave runs in parallel and there
//! is no limit on the number of waves.

use serde::{Deserialize, Serialize};

/// How the jobs of a single wave are executed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Spawn every job as a tokio task. On a multi-thread runtime the jobs
    /// of a wave run in parallel. Outside a tokio runtime this behaves like
    /// `Cooperative`.
    #[default]
    Parallel,

    /// Poll every job concurrently inside the task that called `run()`.
    /// Nothing is spawned, so this works on any executor.
    Cooperative,
}

/// Configuration for a [`PropagationNetwork`](crate::network::PropagationNetwork).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// How wave jobs are executed.
    pub execution: ExecutionMode,

    /// Maximum number of waves a single `run()` may execute.
    ///
    /// `None` means no limit. Monotone merge policies always converge, so a
    /// limit only matters for policies that can keep changing a cell.
    pub max_waves: Option<usize>,
}

impl NetworkConfig {
    /// Use the given execution mode.
    pub fn with_execution(mut self, execution: ExecutionMode) -> Self {
        self.execution = execution;
        self
    }

    /// Fail a run after `limit` waves if work is still pending.
    pub fn with_max_waves(mut self, limit: usize) -> Self {
        self.max_waves = Some(limit);
        self
    }
}
