//! Propagators and Scheduling
//!
//! This module implements the reactive side of a propagator network.
//!
//! # Overview
//!
//! The network is a bipartite graph:
//!
//! - Cells hold knowledge (see [`crate::cell`])
//! - Propagators read cells and write cells
//!
//! Edges are not stored centrally. Each cell knows its neighbor propagators,
//! and each propagator's alert action captures the cells it reads and writes.
//!
//! # Design Decisions
//!
//! 1. Propagators are identified by a generated [`PropagatorId`], never by
//!    behavior, so two propagators doing the same thing remain distinct.
//!
//! 2. All pending work goes through a single [`Scheduler`] queue, drained in
//!    waves. Nothing fires recursively, so stack depth stays bounded no matter
//!    how long a chain of propagators is.
//!
//! 3. Cycles are allowed. Termination comes from the cells: content only
//!    changes when it gets strictly more specific.

mod propagator;
mod scheduler;

pub use propagator::{Job, Propagator, PropagatorId};
pub use scheduler::{Scheduler, SchedulerStats};
