//! Propagators
//!
//! A Propagator is a reactive computation unit. It wraps a single alert
//! action that reads its input cells and merges a result into its output
//! cell. The propagator itself has no state of its own: everything it needs
//! is captured by the alert action when it is built.

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::error::Inconsistency;

/// A unit of work executed by the scheduler.
///
/// Jobs are lazy: building one does nothing until the scheduler polls it, so
/// a job that reads cells observes their content at execution time.
pub type Job = BoxFuture<'static, Result<(), Inconsistency>>;

type AlertFn = dyn Fn() -> Job + Send + Sync;

/// Unique identifier for a propagator.
///
/// Identity is assigned at construction. Two propagators with identical
/// behavior are still distinct neighbors of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropagatorId(u64);

impl PropagatorId {
    /// Generate a new unique propagator ID.
    ///
    /// Uses an atomic counter to ensure uniqueness across threads.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for PropagatorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PropagatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "propagator#{}", self.0)
    }
}

/// An identity-bearing handle around an alert action.
///
/// Cloning is cheap and yields the same propagator (same ID, same action).
#[derive(Clone)]
pub struct Propagator {
    id: PropagatorId,
    alert: Arc<AlertFn>,
}

impl Propagator {
    /// Create a new propagator from an alert action.
    ///
    /// `alert` is called once per firing and must return a fresh future that
    /// does the actual work.
    pub(crate) fn new<F, Fut>(alert: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), Inconsistency>> + Send + 'static,
    {
        Self {
            id: PropagatorId::new(),
            alert: Arc::new(move || alert().boxed()),
        }
    }

    /// Get the propagator's unique ID.
    pub fn id(&self) -> PropagatorId {
        self.id
    }

    /// Build the job for one firing of this propagator.
    ///
    /// The alert action itself is only invoked when the job is first polled,
    /// never by the caller. Cells alert their neighbors while holding their
    /// own lock, and the scheduler while holding the queue lock.
    pub(crate) fn alert(&self) -> Job {
        let alert = Arc::clone(&self.alert);
        async move { alert().await }.boxed()
    }
}

impl PartialEq for Propagator {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Propagator {}

impl std::hash::Hash for Propagator {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Propagator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Propagator").field("id", &self.id).finish()
    }
}
