//! Error Types
//!
//! Two levels of failure exist in a propagator network:
//!
//! - [`Inconsistency`] is raised by a single cell when two present pieces of
//!   knowledge fail to merge. It is what a propagator job returns.
//! - [`Error`] is what [`Scheduler::run`](crate::graph::Scheduler::run)
//!   returns. Besides wrapping an inconsistency it covers failures of the run
//!   itself (a panicking job, an exhausted wave budget).
//!
//! Missing knowledge is never an error. A propagator whose inputs are empty
//! simply produces nothing.

/// Two present values for the same cell could not be merged.
///
/// All fields are rendered text so the error can cross task boundaries and be
/// reported without knowing the cell's content type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "Cell '{cell}' encountered an inconsistency: content {content}, \
     increment {increment}, merge error: {merge_error}"
)]
pub struct Inconsistency {
    /// Name of the cell that rejected the increment.
    pub cell: String,
    /// The cell's content at the time of the conflict.
    pub content: String,
    /// The increment that was rejected.
    pub increment: String,
    /// Description of the merge failure.
    pub merge_error: String,
}

impl Inconsistency {
    /// Build an inconsistency report for the named cell.
    pub fn new(
        cell: impl Into<String>,
        content: impl Into<String>,
        increment: impl Into<String>,
        merge_error: impl Into<String>,
    ) -> Self {
        Self {
            cell: cell.into(),
            content: content.into(),
            increment: increment.into(),
            merge_error: merge_error.into(),
        }
    }
}

/// Errors returned from running a propagation network.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A cell rejected an increment during the run.
    #[error(transparent)]
    Inconsistency(#[from] Inconsistency),

    /// A spawned wave job panicked or was cancelled before finishing.
    #[error("propagation job failed to complete: {0}")]
    JobPanicked(String),

    /// The network still had pending work after the configured number of waves.
    #[error("network did not reach a fixed point within {limit} waves")]
    WaveLimitExceeded {
        /// The configured wave limit.
        limit: usize,
    },
}

impl Error {
    /// The inconsistency behind this error, if that is what caused it.
    pub fn inconsistency(&self) -> Option<&Inconsistency> {
        match self {
            Error::Inconsistency(inconsistency) => Some(inconsistency),
            _ => None,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
