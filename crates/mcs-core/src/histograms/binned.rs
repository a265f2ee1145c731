use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, McsError};
use crate::histograms::{BinValue, EnergyHistogram};

/// Binning functor mapping raw x-values onto bucket keys:
/// `φ(x) = reference + width · floor((x − reference) / width)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Binning {
    width: f64,
    reference: f64,
}

impl Binning {
    /// Creates a binning with the given bucket width and reference point.
    pub fn new(width: f64, reference: f64) -> Self {
        debug_assert!(width > 0.0, "bin width must be positive");
        Self { width, reference }
    }

    /// Maps a raw value onto the left edge of its bucket.
    pub fn map(&self, x: f64) -> f64 {
        self.edge(self.index(x))
    }

    /// Bucket width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Reference point the bucket grid is anchored at.
    pub fn reference(&self) -> f64 {
        self.reference
    }

    fn index(&self, x: f64) -> i64 {
        ((x - self.reference) / self.width).floor() as i64
    }

    fn edge(&self, index: i64) -> f64 {
        self.reference + self.width * index as f64
    }
}

impl Default for Binning {
    fn default() -> Self {
        Self::new(1.0, 0.0)
    }
}

/// Binned histogram over continuous x-values.
///
/// Buckets are stored by integer bin index so key ordering and equality are
/// exact; iteration reports each bucket's left edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binned<V> {
    binning: Binning,
    values: BTreeMap<i64, V>,
}

impl<V> Binned<V> {
    /// Creates an empty histogram using the provided binning.
    pub fn new(binning: Binning) -> Self {
        Self {
            binning,
            values: BTreeMap::new(),
        }
    }

    /// Creates a histogram with `other`'s binning and bin set, every value
    /// set to zero.
    pub fn with_bins_of<W>(other: &Binned<W>) -> Self
    where
        V: BinValue,
    {
        Self {
            binning: other.binning,
            values: other
                .values
                .keys()
                .map(|index| (*index, V::zero()))
                .collect(),
        }
    }

    /// The binning functor in use.
    pub fn binning(&self) -> Binning {
        self.binning
    }
}

impl<V: BinValue> EnergyHistogram<f64, V> for Binned<V> {
    fn accumulate(&mut self, x: f64, value: V) {
        *self
            .values
            .entry(self.binning.index(x))
            .or_insert_with(V::zero) += value;
    }

    fn value(&self, x: f64) -> Option<V> {
        self.values.get(&self.binning.index(x)).copied()
    }

    fn set(&mut self, x: f64, value: V) {
        self.values.insert(self.binning.index(x), value);
    }

    fn bins(&self) -> Box<dyn Iterator<Item = (f64, V)> + '_> {
        Box::new(
            self.values
                .iter()
                .map(|(index, value)| (self.binning.edge(*index), *value)),
        )
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn reset_values(&mut self) {
        for value in self.values.values_mut() {
            *value = V::zero();
        }
    }

    fn add_assign_pointwise(&mut self, other: &Self) {
        // Re-bin through our own functor so histograms with shifted grids
        // still combine.
        for (edge, value) in other.bins() {
            self.accumulate(edge, value);
        }
    }

    fn divide_pointwise(&mut self, other: &Self) -> Result<(), McsError> {
        for (index, value) in self.values.iter_mut() {
            let divisor = other.values.get(index).copied().unwrap_or_else(V::zero);
            if divisor == V::zero() {
                return Err(McsError::Parameter(
                    ErrorInfo::new("histogram-divide", "divisor bin is absent or zero")
                        .with_context("bin_edge", other.binning.edge(*index).to_string()),
                ));
            }
            *value = value.div(divisor);
        }
        Ok(())
    }
}
