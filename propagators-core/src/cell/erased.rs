//! Type-Erased Cell Handles
//!
//! Propagator wiring only ever needs to tell a cell "this propagator is your
//! neighbor". [`AnyCell`] exposes exactly that, so a propagator reading a
//! `Cell<f64>` and a `Cell<Interval>` can keep both in one list.

use std::fmt;
use std::sync::Arc;

use crate::graph::Propagator;

/// The one operation every cell supports regardless of its content type.
pub trait ErasedCell: Send + Sync {
    /// Register `propagator` to be alerted when this cell's content changes.
    fn add_neighbor(&self, propagator: &Propagator);
}

/// A cell with its content type erased.
#[derive(Clone)]
pub struct AnyCell {
    cell: Arc<dyn ErasedCell>,
}

impl AnyCell {
    /// Erase a cell.
    pub fn new<C>(cell: C) -> Self
    where
        C: ErasedCell + 'static,
    {
        Self {
            cell: Arc::new(cell),
        }
    }

    /// Register `propagator` as a neighbor of the underlying cell.
    pub fn add_neighbor(&self, propagator: &Propagator) {
        self.cell.add_neighbor(propagator);
    }
}

impl fmt::Debug for AnyCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AnyCell")
    }
}
