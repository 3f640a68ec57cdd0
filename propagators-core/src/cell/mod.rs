//! Cells
//!
//! This module implements the storage side of a propagator network: cells,
//! the merge policies that decide how knowledge combines, and the type-erased
//! handle used to wire propagators to cells of any content type.
//!
//! # Concepts
//!
//! ## Content
//!
//! A cell holds `Option<T>`. `None` means nothing is known yet; it is a normal
//! state, never an error. Content only moves toward more specific knowledge.
//!
//! ## Merge Policies
//!
//! A merge policy combines the current content with an increment. Merging
//! `None` with anything yields the other side; merging two present values
//! either produces the combined value or a conflict, which the cell reports as
//! an [`Inconsistency`](crate::error::Inconsistency).
//!
//! ## Neighbors
//!
//! Propagators register as neighbors of the cells they read. Whenever a
//! cell's content actually changes, each neighbor is scheduled to fire.

mod content;
mod erased;
mod merge;

pub use content::Cell;
pub use erased::{AnyCell, ErasedCell};
pub use merge::{Content, Merge, MergeConflict, MergePolicy};
