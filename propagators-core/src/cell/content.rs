//! Cell Implementation
//!
//! A Cell holds what is currently known about one quantity: nothing yet
//! (`None`) or a value that only ever gets more specific.
//!
//! # How Cells Work
//!
//! 1. New knowledge arrives through [`Cell::add_content`].
//!
//! 2. The increment is merged with the current content by the cell's merge
//!    policy. A rejected merge is an [`Inconsistency`]; content is untouched.
//!
//! 3. If the merged value equals the current content nothing happens. This
//!    is the check that lets a network reach a fixed point.
//!
//! 4. Otherwise the content is replaced and every neighbor propagator is
//!    scheduled to fire in the next wave.
//!
//! # Thread Safety
//!
//! Content and neighbors live behind one mutex per cell, so no reader ever
//! observes a half-applied update. The lock is never held across an await.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use tracing::{trace, warn};

use super::erased::{AnyCell, ErasedCell};
use super::merge::{Content, MergePolicy};
use crate::error::Inconsistency;
use crate::graph::{Propagator, PropagatorId, Scheduler};

/// A named, merge-aware storage cell for content of type `T`.
///
/// Cloning is cheap and yields a handle to the same cell.
pub struct Cell<T: Content> {
    inner: Arc<CellInner<T>>,
}

struct CellInner<T: Content> {
    name: String,
    merge: MergePolicy<T>,
    scheduler: Scheduler,
    state: Mutex<CellState<T>>,
}

struct CellState<T> {
    content: Option<T>,
    /// Alerted in registration order.
    neighbors: IndexMap<PropagatorId, Propagator>,
}

impl<T: Content> Cell<T> {
    /// Create a cell bound to `scheduler`.
    pub(crate) fn new(
        scheduler: Scheduler,
        name: impl Into<String>,
        initial: Option<T>,
        merge: MergePolicy<T>,
    ) -> Self {
        Self {
            inner: Arc::new(CellInner {
                name: name.into(),
                merge,
                scheduler,
                state: Mutex::new(CellState {
                    content: initial,
                    neighbors: IndexMap::new(),
                }),
            }),
        }
    }

    /// The cell's name, used in diagnostics.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The merge policy this cell applies.
    pub fn merge_policy(&self) -> &MergePolicy<T> {
        &self.inner.merge
    }

    /// Snapshot of the current content.
    pub fn content(&self) -> Option<T> {
        self.inner.state.lock().content.clone()
    }

    /// Number of registered neighbor propagators.
    pub fn neighbor_count(&self) -> usize {
        self.inner.state.lock().neighbors.len()
    }

    /// Merge new knowledge into the cell.
    ///
    /// `None` means nothing new is known and always succeeds. When the merged
    /// content differs from the current content, every neighbor is alerted.
    pub fn add_content(&self, increment: Option<T>) -> Result<(), Inconsistency> {
        let Some(increment) = increment else {
            return Ok(());
        };

        let mut state = self.inner.state.lock();
        let merged = match self
            .inner
            .merge
            .merge_partial(state.content.as_ref(), Some(&increment))
        {
            Ok(merged) => merged,
            Err(conflict) => {
                let err = Inconsistency::new(
                    self.inner.name.as_str(),
                    format!("{:?}", state.content),
                    format!("{:?}", Some(&increment)),
                    conflict.to_string(),
                );
                warn!(cell = %self.inner.name, error = %err, "cell rejected increment");
                return Err(err);
            }
        };

        if merged == state.content {
            return Ok(());
        }

        trace!(
            cell = %self.inner.name,
            content = ?merged,
            neighbors = state.neighbors.len(),
            "cell content updated"
        );
        state.content = merged;
        self.inner.scheduler.alert_all(state.neighbors.values());
        Ok(())
    }

    /// Register `propagator` to be alerted on future content changes.
    ///
    /// Registering the same propagator twice has no further effect, and
    /// registration never fires the propagator.
    pub fn add_neighbor(&self, propagator: &Propagator) {
        self.inner
            .state
            .lock()
            .neighbors
            .entry(propagator.id())
            .or_insert_with(|| propagator.clone());
    }

    /// A type-erased handle to this cell.
    pub fn erase(&self) -> AnyCell {
        AnyCell::new(self.clone())
    }
}

impl<T: Content> ErasedCell for Cell<T> {
    fn add_neighbor(&self, propagator: &Propagator) {
        Cell::add_neighbor(self, propagator);
    }
}

impl<T: Content> From<&Cell<T>> for AnyCell {
    fn from(cell: &Cell<T>) -> Self {
        cell.erase()
    }
}

impl<T: Content> Clone for Cell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Content> fmt::Debug for Cell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Cell")
            .field("name", &self.inner.name)
            .field("content", &state.content)
            .field("merge", &self.inner.merge.name())
            .field("neighbor_count", &state.neighbors.len())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
