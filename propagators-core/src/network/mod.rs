//! Propagation Network
//!
//! [`PropagationNetwork`] is the entry point for building and running a
//! network. It creates cells bound to its scheduler, turns plain functions
//! into propagators, and runs the scheduler until nothing changes.
//!
//! # Building Propagators
//!
//! [`propagator`](PropagationNetwork::propagator) is the low-level primitive:
//! it wires an alert action to a list of type-erased cells and schedules one
//! initial firing, so values that are already known (constants, initial
//! content) flow without an external trigger.
//!
//! The typed constructors wrap a plain function:
//!
//! - [`lift0`](PropagationNetwork::lift0): `() -> O`, used for constants
//! - [`lift1`](PropagationNetwork::lift1): `I -> O`
//! - [`lift2`](PropagationNetwork::lift2): `(I1, I2) -> O`
//!
//! A missing input never raises. It simply produces no output, and the
//! propagator fires again once the input arrives.
//!
//! # Example
//!
//! ```rust,ignore
//! let network = PropagationNetwork::new();
//! let x: Cell<f64> = network.cell("x", None);
//! let y: Cell<f64> = network.cell("y", 3.0);
//! let total: Cell<f64> = network.cell("total", 5.0);
//!
//! network.sum(&x, &y, &total);
//! network.run().await?;
//!
//! assert_eq!(x.content(), Some(2.0));
//! ```

mod arithmetic;

pub use arithmetic::SquareRoot;

use std::future::Future;
use std::sync::Arc;

use tracing::trace;

use crate::cell::{AnyCell, Cell, Content, Merge, MergePolicy};
use crate::config::NetworkConfig;
use crate::error::{Inconsistency, Result};
use crate::graph::{Propagator, PropagatorId, Scheduler};

/// A set of cells and propagators sharing one scheduler.
///
/// Cloning is cheap and yields a handle to the same network.
#[derive(Debug, Clone, Default)]
pub struct PropagationNetwork {
    scheduler: Scheduler,
}

impl PropagationNetwork {
    /// Create a network with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a network with the given configuration.
    pub fn with_config(config: NetworkConfig) -> Self {
        Self {
            scheduler: Scheduler::with_config(config),
        }
    }

    /// The scheduler driving this network.
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Run until the network is quiescent or a cell raises an inconsistency.
    ///
    /// A failed run leaves the network as it was when the failure happened;
    /// nothing is rolled back.
    pub async fn run(&self) -> Result<()> {
        self.scheduler.run().await
    }

    /// Create a cell using the content type's own merge.
    ///
    /// For plain values that merge is equality; for
    /// [`Interval`](crate::interval::Interval) it is intersection.
    ///
    /// The content type must implement [`Merge`]. A type that only has
    /// `PartialEq` gets equality merging through
    /// `cell_with(name, initial, MergePolicy::equality())`.
    pub fn cell<T>(&self, name: impl Into<String>, initial: impl Into<Option<T>>) -> Cell<T>
    where
        T: Content + Merge,
    {
        self.cell_with(name, initial, MergePolicy::of())
    }

    /// Create a cell with an explicit merge policy.
    pub fn cell_with<T>(
        &self,
        name: impl Into<String>,
        initial: impl Into<Option<T>>,
        merge: MergePolicy<T>,
    ) -> Cell<T>
    where
        T: Content,
    {
        Cell::new(self.scheduler.clone(), name, initial.into(), merge)
    }

    /// Wire `alert` to `neighbors` and schedule its first firing.
    ///
    /// The propagator is registered on every neighbor before this returns,
    /// so any change to a neighbor from here on alerts it. `alert` is called
    /// once per firing and must return the future doing the work.
    pub fn propagator<N, F, Fut>(&self, neighbors: N, alert: F) -> PropagatorId
    where
        N: IntoIterator<Item = AnyCell>,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), Inconsistency>> + Send + 'static,
    {
        let propagator = Propagator::new(alert);
        let mut wired = 0usize;
        for neighbor in neighbors {
            neighbor.add_neighbor(&propagator);
            wired += 1;
        }
        trace!(propagator = %propagator.id(), neighbors = wired, "propagator created");

        self.scheduler.alert(&propagator);
        propagator.id()
    }

    /// A propagator with no inputs writing `f()` into `output`.
    pub fn lift0<O, F>(&self, f: F, output: &Cell<O>) -> PropagatorId
    where
        O: Content,
        F: Fn() -> O + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        let output = output.clone();
        self.propagator(std::iter::empty(), move || {
            let f = Arc::clone(&f);
            let output = output.clone();
            async move { output.add_content(Some(f())) }
        })
    }

    /// A propagator writing `f(input)` into `output` whenever `input` is known.
    pub fn lift1<I, O, F>(&self, f: F, input: &Cell<I>, output: &Cell<O>) -> PropagatorId
    where
        I: Content,
        O: Content,
        F: Fn(I) -> O + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        let (input_cell, output_cell) = (input.clone(), output.clone());
        self.propagator([input.erase()], move || {
            let f = Arc::clone(&f);
            let input = input_cell.clone();
            let output = output_cell.clone();
            async move {
                let value = input.content().map(f.as_ref());
                output.add_content(value)
            }
        })
    }

    /// A propagator writing `f(first, second)` into `output` once both
    /// inputs are known.
    pub fn lift2<I1, I2, O, F>(
        &self,
        f: F,
        first: &Cell<I1>,
        second: &Cell<I2>,
        output: &Cell<O>,
    ) -> PropagatorId
    where
        I1: Content,
        I2: Content,
        O: Content,
        F: Fn(I1, I2) -> O + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        let (first_cell, second_cell, output_cell) = (first.clone(), second.clone(), output.clone());
        self.propagator([first.erase(), second.erase()], move || {
            let f = Arc::clone(&f);
            let first = first_cell.clone();
            let second = second_cell.clone();
            let output = output_cell.clone();
            async move {
                let (Some(a), Some(b)) = (first.content(), second.content()) else {
                    return Ok(());
                };
                output.add_content(Some(f(a, b)))
            }
        })
    }

    /// Write `value` into `cell` when the network runs.
    pub fn constant<T>(&self, value: T, cell: &Cell<T>) -> PropagatorId
    where
        T: Content,
    {
        self.lift0(move || value.clone(), cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExecutionMode;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn constant_fills_cell_on_run() {
        let network = PropagationNetwork::new();
        let cell: Cell<f64> = network.cell("32", None);

        network.constant(32.0, &cell);
        assert_eq!(cell.content(), None);

        network.run().await.unwrap();
        assert_eq!(cell.content(), Some(32.0));
    }

    #[tokio::test]
    async fn lift1_waits_for_input() {
        let network = PropagationNetwork::new();
        let input: Cell<i64> = network.cell("input", None);
        let output: Cell<i64> = network.cell("output", None);
        network.lift1(|n: i64| n * 10, &input, &output);

        network.run().await.unwrap();
        assert_eq!(output.content(), None);

        input.add_content(Some(4)).unwrap();
        network.run().await.unwrap();
        assert_eq!(output.content(), Some(40));
    }

    #[tokio::test]
    async fn lift2_needs_both_inputs() {
        let network = PropagationNetwork::new();
        let a: Cell<String> = network.cell("a", String::from("prop"));
        let b: Cell<String> = network.cell("b", None);
        let joined: Cell<String> = network.cell("joined", None);
        network.lift2(|a: String, b: String| a + &b, &a, &b, &joined);

        network.run().await.unwrap();
        assert_eq!(joined.content(), None);

        b.add_content(Some(String::from("agate"))).unwrap();
        network.run().await.unwrap();
        assert_eq!(joined.content().as_deref(), Some("propagate"));
    }

    #[tokio::test]
    async fn propagator_registers_on_every_neighbor() {
        let network = PropagationNetwork::new();
        let a: Cell<f64> = network.cell("a", None);
        let b: Cell<f64> = network.cell("b", None);

        network.propagator([a.erase(), b.erase(), a.erase()], || async { Ok(()) });

        assert_eq!(a.neighbor_count(), 1);
        assert_eq!(b.neighbor_count(), 1);
        assert_eq!(network.scheduler().pending(), 1);
    }

    #[tokio::test]
    async fn cell_with_uses_given_policy() {
        let network = PropagationNetwork::with_config(
            NetworkConfig::default().with_execution(ExecutionMode::Cooperative),
        );
        let max = MergePolicy::new("maximum", |a: &u32, b: &u32| Some(*a.max(b)));
        let best = network.cell_with("best", None, max);

        network.constant(3, &best);
        network.constant(8, &best);
        network.constant(5, &best);
        network.run().await.unwrap();

        assert_eq!(best.content(), Some(8));
        assert_eq!(best.merge_policy().name(), "maximum");
    }

    #[tokio::test]
    async fn alert_action_may_touch_cells_before_returning_its_future() {
        let network = PropagationNetwork::new();
        let input: Cell<f64> = network.cell("input", None);
        let output: Cell<f64> = network.cell("output", None);
        let followups = Arc::new(AtomicUsize::new(0));

        let (reader, writer, scheduler) = (input.clone(), output.clone(), network.scheduler().clone());
        let counter = Arc::clone(&followups);
        network.propagator([input.erase()], move || {
            let snapshot = reader.content();
            let counter = Arc::clone(&counter);
            scheduler.schedule(async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });
            let writer = writer.clone();
            async move { writer.add_content(snapshot) }
        });
        network.run().await.unwrap();
        assert_eq!(output.content(), None);

        input.add_content(Some(1.0)).unwrap();
        network.run().await.unwrap();

        assert_eq!(output.content(), Some(1.0));
        assert_eq!(followups.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn equality_cell_for_content_without_merge() {
        #[derive(Debug, Clone, PartialEq)]
        struct Reading {
            sensor: &'static str,
            value: i32,
        }

        let network = PropagationNetwork::new();
        let reading = network.cell_with("reading", None, MergePolicy::equality());
        let same = Reading { sensor: "north", value: 7 };

        network.constant(same.clone(), &reading);
        network.constant(same.clone(), &reading);
        network.run().await.unwrap();
        assert_eq!(reading.content(), Some(same));

        let err = reading
            .add_content(Some(Reading { sensor: "north", value: 8 }))
            .unwrap_err();
        assert_eq!(err.cell, "reading");
        assert_eq!(err.merge_error, "equality merge rejected the increment");
    }

    #[tokio::test]
    async fn constant_written_before_reader_exists_still_propagates() {
        let network = PropagationNetwork::new();
        let source: Cell<i64> = network.cell("source", None);
        let doubled: Cell<i64> = network.cell("doubled", None);

        network.constant(21, &source);
        network.lift1(|n: i64| n * 2, &source, &doubled);
        network.run().await.unwrap();

        assert_eq!(doubled.content(), Some(42));
    }
}
