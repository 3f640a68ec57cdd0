//! Interval Content
//!
//! [`Interval`] is a closed numeric range used as cell content. Two intervals
//! describing the same quantity merge by intersection, so knowledge narrows
//! as more sources agree. An empty intersection is a conflict.
//!
//! Multiplication, division and square root lift the underlying `f64`
//! operation endpoint-wise. That is exact for non-negative intervals, which
//! is the domain these operators are meant for (lengths, durations,
//! physical constants).

use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

use serde::{Deserialize, Serialize};

use crate::cell::Merge;
use crate::network::SquareRoot;

/// A closed range `[low, high]`. Empty when `low > high`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    /// Lower bound, inclusive.
    pub low: f64,
    /// Upper bound, inclusive.
    pub high: f64,
}

impl Interval {
    /// The interval `[low, high]`. Bounds are taken as given, so
    /// `low > high` builds an empty interval.
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// The interval containing exactly `value`.
    pub fn exact(value: f64) -> Self {
        Self::new(value, value)
    }

    /// True when no value lies in the interval.
    pub fn is_empty(&self) -> bool {
        self.low > self.high
    }

    /// `high - low`. Negative for an empty interval.
    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    /// Whether `value` lies within the bounds.
    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }

    /// The values in both intervals. May be empty.
    pub fn intersect(&self, other: &Interval) -> Interval {
        Interval::new(self.low.max(other.low), self.high.min(other.high))
    }

    fn lift(self, f: impl Fn(f64) -> f64) -> Interval {
        Interval::new(f(self.low), f(self.high))
    }

    fn lift2(self, other: Interval, f: impl Fn(f64, f64) -> f64) -> Interval {
        Interval::new(f(self.low, other.low), f(self.high, other.high))
    }
}

impl Merge for Interval {
    fn merge(content: &Self, increment: &Self) -> Option<Self> {
        let intersection = content.intersect(increment);
        (!intersection.is_empty()).then_some(intersection)
    }
}

impl Add for Interval {
    type Output = Interval;

    fn add(self, rhs: Interval) -> Interval {
        self.lift2(rhs, |a, b| a + b)
    }
}

impl Sub for Interval {
    type Output = Interval;

    /// Smallest minus largest, largest minus smallest.
    fn sub(self, rhs: Interval) -> Interval {
        Interval::new(self.low - rhs.high, self.high - rhs.low)
    }
}

impl Mul for Interval {
    type Output = Interval;

    fn mul(self, rhs: Interval) -> Interval {
        self.lift2(rhs, |a, b| a * b)
    }
}

impl Div for Interval {
    type Output = Interval;

    fn div(self, rhs: Interval) -> Interval {
        self * Interval::new(1.0 / rhs.high, 1.0 / rhs.low)
    }
}

impl SquareRoot for Interval {
    fn square_root(self) -> Self {
        self.lift(f64::sqrt)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.low, self.high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn exact_interval_has_zero_width() {
        let i = Interval::exact(0.5);
        assert_eq!(i.width(), 0.0);
        assert!(i.contains(0.5));
        assert!(!i.is_empty());
    }

    #[test]
    fn intersection_narrows() {
        let a = Interval::new(1.0, 4.0);
        let b = Interval::new(2.0, 6.0);
        assert_eq!(a.intersect(&b), Interval::new(2.0, 4.0));
        assert_eq!(Interval::merge(&a, &b), Some(Interval::new(2.0, 4.0)));
    }

    #[test]
    fn disjoint_intervals_do_not_merge() {
        let a = Interval::new(0.0, 1.0);
        let b = Interval::new(2.0, 3.0);
        assert!(a.intersect(&b).is_empty());
        assert_eq!(Interval::merge(&a, &b), None);
    }

    #[test]
    fn touching_intervals_merge_to_a_point() {
        let a = Interval::new(0.0, 1.0);
        let b = Interval::new(1.0, 3.0);
        assert_eq!(Interval::merge(&a, &b), Some(Interval::exact(1.0)));
    }

    #[test]
    fn arithmetic_on_positive_intervals() {
        let a = Interval::new(2.0, 3.0);
        let b = Interval::new(4.0, 5.0);

        assert_eq!(a + b, Interval::new(6.0, 8.0));
        assert_eq!(b - a, Interval::new(1.0, 3.0));
        assert_eq!(a * b, Interval::new(8.0, 15.0));

        let q = Interval::new(8.0, 15.0) / b;
        assert!(close(q.low, 1.6) && close(q.high, 3.75));
        assert!(q.contains(2.0) && q.contains(3.0));

        assert_eq!(Interval::new(4.0, 9.0).square_root(), Interval::new(2.0, 3.0));
    }

    #[test]
    fn displays_as_closed_range() {
        assert_eq!(Interval::new(2.9, 3.1).to_string(), "[2.9, 3.1]");
    }

    #[test]
    fn serializes_as_bounds() {
        let json = serde_json::to_string(&Interval::new(1.0, 2.0)).unwrap();
        assert_eq!(json, r#"{"low":1.0,"high":2.0}"#);
    }
}
