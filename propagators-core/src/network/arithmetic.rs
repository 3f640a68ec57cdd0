//! Arithmetic Combinators
//!
//! Numeric relations built from the typed constructors. Each one works for
//! any content type with the matching operators, so the same `sum` wires a
//! relation between `f64` cells or between
//! [`Interval`](crate::interval::Interval) cells.
//!
//! The bidirectional forms (`sum`, `product`, `quadratic`) install one
//! propagator per direction. Knowing any two of `lhs`, `rhs`, `total`
//! determines the third.

use std::ops::{Add, Div, Mul, Sub};

use super::PropagationNetwork;
use crate::cell::{Cell, Content};

/// Square root for cell content.
pub trait SquareRoot {
    /// The non-negative square root.
    fn square_root(self) -> Self;
}

impl SquareRoot for f64 {
    fn square_root(self) -> Self {
        self.sqrt()
    }
}

impl PropagationNetwork {
    /// `output = lhs + rhs`
    pub fn add<T>(&self, lhs: &Cell<T>, rhs: &Cell<T>, output: &Cell<T>)
    where
        T: Content + Add<Output = T>,
    {
        self.lift2(|a: T, b: T| a + b, lhs, rhs, output);
    }

    /// `output = lhs - rhs`
    pub fn subtract<T>(&self, lhs: &Cell<T>, rhs: &Cell<T>, output: &Cell<T>)
    where
        T: Content + Sub<Output = T>,
    {
        self.lift2(|a: T, b: T| a - b, lhs, rhs, output);
    }

    /// `output = lhs * rhs`
    pub fn multiply<T>(&self, lhs: &Cell<T>, rhs: &Cell<T>, output: &Cell<T>)
    where
        T: Content + Mul<Output = T>,
    {
        self.lift2(|a: T, b: T| a * b, lhs, rhs, output);
    }

    /// `output = lhs / rhs`
    pub fn divide<T>(&self, lhs: &Cell<T>, rhs: &Cell<T>, output: &Cell<T>)
    where
        T: Content + Div<Output = T>,
    {
        self.lift2(|a: T, b: T| a / b, lhs, rhs, output);
    }

    /// `total = lhs + rhs`, in every direction.
    pub fn sum<T>(&self, lhs: &Cell<T>, rhs: &Cell<T>, total: &Cell<T>)
    where
        T: Content + Add<Output = T> + Sub<Output = T>,
    {
        self.add(lhs, rhs, total);
        self.subtract(total, lhs, rhs);
        self.subtract(total, rhs, lhs);
    }

    /// `total = lhs * rhs`, in every direction.
    pub fn product<T>(&self, lhs: &Cell<T>, rhs: &Cell<T>, total: &Cell<T>)
    where
        T: Content + Mul<Output = T> + Div<Output = T>,
    {
        self.multiply(lhs, rhs, total);
        self.divide(total, lhs, rhs);
        self.divide(total, rhs, lhs);
    }

    /// `output = n * n`
    pub fn square<T>(&self, n: &Cell<T>, output: &Cell<T>)
    where
        T: Content + Mul<Output = T>,
    {
        self.lift1(|n: T| n.clone() * n, n, output);
    }

    /// `output = sqrt(n)`
    pub fn sqrt<T>(&self, n: &Cell<T>, output: &Cell<T>)
    where
        T: Content + SquareRoot,
    {
        self.lift1(T::square_root, n, output);
    }

    /// `n2 = n * n`, in both directions. Only the non-negative root is
    /// propagated back into `n`.
    pub fn quadratic<T>(&self, n: &Cell<T>, n2: &Cell<T>)
    where
        T: Content + Mul<Output = T> + SquareRoot,
    {
        self.square(n, n2);
        self.sqrt(n2, n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn add_combines_known_inputs() {
        let network = PropagationNetwork::new();
        let lhs: Cell<f64> = network.cell("lhs", 2.0);
        let rhs: Cell<f64> = network.cell("rhs", 3.0);
        let output: Cell<f64> = network.cell("output", None);

        network.add(&lhs, &rhs, &output);
        network.run().await.unwrap();

        assert_eq!(output.content(), Some(5.0));
    }

    #[tokio::test]
    async fn product_solves_for_missing_factor() {
        let network = PropagationNetwork::new();
        let lhs: Cell<f64> = network.cell("lhs", None);
        let rhs: Cell<f64> = network.cell("rhs", 4.0);
        let total: Cell<f64> = network.cell("total", 10.0);

        network.product(&lhs, &rhs, &total);
        network.run().await.unwrap();

        assert_eq!(lhs.content(), Some(2.5));
    }

    #[tokio::test]
    async fn quadratic_runs_both_ways() {
        let network = PropagationNetwork::new();
        let n: Cell<f64> = network.cell("n", 3.0);
        let n2: Cell<f64> = network.cell("n^2", None);
        network.quadratic(&n, &n2);
        network.run().await.unwrap();
        assert_eq!(n2.content(), Some(9.0));

        let m: Cell<f64> = network.cell("m", None);
        let m2: Cell<f64> = network.cell("m^2", 16.0);
        network.quadratic(&m, &m2);
        network.run().await.unwrap();
        assert_eq!(m.content(), Some(4.0));
    }

    #[tokio::test]
    async fn sum_conflict_names_the_disagreeing_cell() {
        let network = PropagationNetwork::new();
        let lhs: Cell<f64> = network.cell("lhs", 1.0);
        let rhs: Cell<f64> = network.cell("rhs", 1.0);
        let total: Cell<f64> = network.cell("total", 3.0);

        network.sum(&lhs, &rhs, &total);
        let err = network.run().await.unwrap_err();

        let inconsistency = err.inconsistency().unwrap();
        assert!(["lhs", "rhs", "total"].contains(&inconsistency.cell.as_str()));
    }
}
