//! Propagators Core
//!
//! This crate provides a propagator network engine. Independent cells hold
//! partial knowledge about quantities; propagators recompute outputs from
//! inputs whenever those inputs change; a scheduler drives the whole network
//! in concurrent waves until nothing changes any more.
//!
//! It implements:
//!
//! - Merge-aware cells with deterministic conflict detection
//! - Identity-bearing propagators and type-erased cell handles for wiring
//! - A bulk-synchronous wave scheduler on tokio
//! - Typed propagator constructors and bidirectional arithmetic relations
//! - An interval content type that narrows by intersection
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `cell`: cells, merge policies and type-erased cell handles
//! - `graph`: propagators and the wave scheduler
//! - `network`: the network façade, typed constructors, arithmetic
//! - `interval`: interval content
//! - `config`: execution settings
//! - `error`: inconsistencies and run errors
//!
//! # Example
//!
//! ```rust,ignore
//! use propagators_core::{Cell, Interval, PropagationNetwork};
//!
//! let network = PropagationNetwork::new();
//! let g = network.cell("g", Interval::new(9.789, 9.832));
//! let t: Cell<Interval> = network.cell("t", Interval::new(2.9, 3.1));
//! let t2: Cell<Interval> = network.cell("t^2", None);
//! let gt2: Cell<Interval> = network.cell("gt^2", None);
//! let half = network.cell("1/2", Interval::exact(0.5));
//! let height: Cell<Interval> = network.cell("height", None);
//!
//! network.quadratic(&t, &t2);
//! network.product(&g, &t2, &gt2);
//! network.product(&half, &gt2, &height);
//! network.run().await?;
//!
//! // height is now roughly [41.163, 47.243]
//! ```

pub mod cell;
pub mod config;
pub mod error;
pub mod graph;
pub mod interval;
pub mod network;

pub use cell::{AnyCell, Cell, Content, Merge, MergeConflict, MergePolicy};
pub use config::{ExecutionMode, NetworkConfig};
pub use error::{Error, Inconsistency, Result};
pub use graph::{Scheduler, SchedulerStats};
pub use interval::Interval;
pub use network::{PropagationNetwork, SquareRoot};
