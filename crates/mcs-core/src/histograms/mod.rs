//! Keyed numeric containers for energy statistics.
//!
//! Two variants satisfy the same [`EnergyHistogram`] interface: a discrete
//! histogram ([`Histocrete`]) that uses inserted keys verbatim, and a binned
//! histogram ([`Binned`]) that maps raw x-values into bucket keys through a
//! width/reference [`Binning`] functor.

mod binned;
mod histocrete;

pub use binned::{Binned, Binning};
pub use histocrete::Histocrete;

use crate::errors::McsError;

/// Numeric bin contents: incidence counts and log-densities both qualify.
pub trait BinValue: Copy + PartialEq + PartialOrd + core::ops::AddAssign {
    /// Additive identity.
    fn zero() -> Self;
    /// The increment applied by [`EnergyHistogram::record`].
    fn one() -> Self;
    /// Lossy widening used for flatness and mean computations.
    fn as_f64(self) -> f64;
    /// Pointwise division used by [`EnergyHistogram::divide_pointwise`].
    fn div(self, divisor: Self) -> Self;
}

impl BinValue for u64 {
    fn zero() -> Self {
        0
    }
    fn one() -> Self {
        1
    }
    fn as_f64(self) -> f64 {
        self as f64
    }
    fn div(self, divisor: Self) -> Self {
        self / divisor
    }
}

impl BinValue for i64 {
    fn zero() -> Self {
        0
    }
    fn one() -> Self {
        1
    }
    fn as_f64(self) -> f64 {
        self as f64
    }
    fn div(self, divisor: Self) -> Self {
        self / divisor
    }
}

impl BinValue for f64 {
    fn zero() -> Self {
        0.0
    }
    fn one() -> Self {
        1.0
    }
    fn as_f64(self) -> f64 {
        self
    }
    fn div(self, divisor: Self) -> Self {
        self / divisor
    }
}

/// Common contract for the histogram variants.
///
/// `X` is the raw key type handed in by callers; the binned variant maps it
/// through its binning functor before storage. Iteration is always in
/// ascending key order.
pub trait EnergyHistogram<X, V: BinValue> {
    /// Adds `value` to the bin holding `x`, creating the bin if absent.
    fn accumulate(&mut self, x: X, value: V);

    /// Increments the bin holding `x` by one.
    fn record(&mut self, x: X)
    where
        X: Copy,
    {
        self.accumulate(x, V::one());
    }

    /// Returns the value stored for `x`, if the bin exists.
    fn value(&self, x: X) -> Option<V>;

    /// Returns the stored value for `x`, or zero for an absent bin.
    fn value_or_zero(&self, x: X) -> V {
        self.value(x).unwrap_or_else(V::zero)
    }

    /// Overwrites the bin holding `x` with `value`.
    fn set(&mut self, x: X, value: V);

    /// Iterates `(key, value)` pairs in ascending key order.
    fn bins(&self) -> Box<dyn Iterator<Item = (X, V)> + '_>;

    /// Number of stored bins.
    fn len(&self) -> usize;

    /// Whether no bin has been stored yet.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sets every stored bin to zero, preserving the bin set.
    fn reset_values(&mut self);

    /// Minimum over populated bins (value > 0). Zero-incidence bins are
    /// excluded so unreachable energies cannot stall a flatness criterion.
    fn min_populated(&self) -> Option<V> {
        self.bins()
            .map(|(_, value)| value)
            .filter(|value| *value > V::zero())
            .fold(None, |min, value| match min {
                None => Some(value),
                Some(current) if value < current => Some(value),
                Some(current) => Some(current),
            })
    }

    /// Mean over populated bins (value > 0).
    fn mean_populated(&self) -> Option<f64> {
        let mut sum = 0.0;
        let mut count = 0usize;
        for (_, value) in self.bins() {
            if value > V::zero() {
                sum += value.as_f64();
                count += 1;
            }
        }
        (count > 0).then(|| sum / count as f64)
    }

    /// Flatness ratio `min / mean` over populated bins; 0.0 while nothing
    /// has been recorded.
    fn flatness(&self) -> f64 {
        match (self.min_populated(), self.mean_populated()) {
            (Some(min), Some(mean)) if mean > 0.0 => min.as_f64() / mean,
            _ => 0.0,
        }
    }

    /// Adds `other` bin-by-bin; bins absent from `self` are created.
    fn add_assign_pointwise(&mut self, other: &Self);

    /// Divides `self` bin-by-bin through `other`. Every stored bin of
    /// `self` must have a non-zero divisor bin in `other`.
    fn divide_pointwise(&mut self, other: &Self) -> Result<(), McsError>;
}
