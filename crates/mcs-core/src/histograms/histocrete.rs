use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, McsError};
use crate::histograms::{BinValue, EnergyHistogram};

/// Discrete histogram: inserted keys are used verbatim.
///
/// Backed by a `BTreeMap`, so iteration is in ascending key order and the
/// key set grows monotonically as the walk discovers new energies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "K: Serialize, V: Serialize",
    deserialize = "K: serde::de::DeserializeOwned + Ord, V: serde::de::DeserializeOwned"
))]
pub struct Histocrete<K: Ord, V> {
    #[serde(with = "entry_pairs")]
    values: BTreeMap<K, V>,
}

impl<K: Ord, V> Default for Histocrete<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> Histocrete<K, V> {
    /// Creates an empty histogram.
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Creates a histogram with the same key set as `other` and every value
    /// set to zero.
    pub fn with_keys_of<W>(other: &Histocrete<K, W>) -> Self
    where
        K: Clone,
        V: BinValue,
    {
        Self {
            values: other
                .values
                .keys()
                .cloned()
                .map(|key| (key, V::zero()))
                .collect(),
        }
    }
}

impl<K, V> EnergyHistogram<K, V> for Histocrete<K, V>
where
    K: Ord + Copy,
    V: BinValue,
{
    fn accumulate(&mut self, x: K, value: V) {
        *self.values.entry(x).or_insert_with(V::zero) += value;
    }

    fn value(&self, x: K) -> Option<V> {
        self.values.get(&x).copied()
    }

    fn set(&mut self, x: K, value: V) {
        self.values.insert(x, value);
    }

    fn bins(&self) -> Box<dyn Iterator<Item = (K, V)> + '_> {
        Box::new(self.values.iter().map(|(key, value)| (*key, *value)))
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
        for (key, value) in &other.values {
            *self.values.entry(*key).or_insert_with(V::zero) += *value;
        }
    }

    fn divide_pointwise(&mut self, other: &Self) -> Result<(), McsError> {
        for (key, value) in self.values.iter_mut() {
            let divisor = other.values.get(key).copied().unwrap_or_else(V::zero);
            if divisor == V::zero() {
                return Err(McsError::Parameter(
                    ErrorInfo::new("histogram-divide", "divisor bin is absent or zero")
                        .with_hint("pointwise division requires matching populated bins"),
                ));
            }
            *value = value.div(divisor);
        }
        Ok(())
    }
}

mod entry_pairs {
    use std::collections::BTreeMap;

    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    // Stored as a sequence of pairs so non-string keys survive JSON.
    pub fn serialize<K, V, S>(map: &BTreeMap<K, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        K: Serialize,
        V: Serialize,
        S: Serializer,
    {
        serializer.collect_seq(map.iter())
    }

    pub fn deserialize<'de, K, V, D>(deserializer: D) -> Result<BTreeMap<K, V>, D::Error>
    where
        K: DeserializeOwned + Ord,
        V: DeserializeOwned,
        D: Deserializer<'de>,
    {
        let pairs: Vec<(K, V)> = Vec::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_and_iterates_in_key_order() {
        let mut histogram = Histocrete::<i32, u64>::new();
        histogram.record(4);
        histogram.record(-8);
        histogram.record(4);
        let bins: Vec<(i32, u64)> = histogram.bins().collect();
        assert_eq!(bins, vec![(-8, 1), (4, 2)]);
    }

    #[test]
    fn flatness_ignores_zero_bins() {
        let mut histogram = Histocrete::<i32, u64>::new();
        histogram.set(0, 4);
        histogram.set(1, 4);
        histogram.set(2, 0);
        assert!((histogram.flatness() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn flatness_of_empty_histogram_is_zero() {
        let histogram = Histocrete::<i32, u64>::new();
        assert_eq!(histogram.flatness(), 0.0);
    }

    #[test]
    fn reset_preserves_key_set() {
        let mut histogram = Histocrete::<i32, u64>::new();
        histogram.record(1);
        histogram.record(2);
        histogram.reset_values();
        assert_eq!(histogram.len(), 2);
        assert_eq!(histogram.value(1), Some(0));
    }

    #[test]
    fn with_keys_of_copies_bins_with_zero_values() {
        let mut source = Histocrete::<i32, f64>::new();
        source.accumulate(-4, 2.5);
        source.accumulate(0, 1.0);
        let empty = Histocrete::<i32, u64>::with_keys_of(&source);
        assert_eq!(empty.len(), 2);
        assert_eq!(empty.value(-4), Some(0));
    }

    #[test]
    fn pointwise_add_takes_the_union_of_key_sets() {
        let mut left = Histocrete::<i32, u64>::new();
        left.record(0);
        left.record(4);
        let mut right = Histocrete::<i32, u64>::new();
        right.record(4);
        right.record(8);
        left.add_assign_pointwise(&right);
        assert_eq!(left.bins().collect::<Vec<_>>(), vec![(0, 1), (4, 2), (8, 1)]);
    }

    #[test]
    fn divide_by_missing_bin_is_an_error() {
        let mut numerator = Histocrete::<i32, f64>::new();
        numerator.accumulate(0, 1.0);
        let denominator = Histocrete::<i32, f64>::new();
        let err = numerator.divide_pointwise(&denominator).unwrap_err();
        assert_eq!(err.info().code, "histogram-divide");
    }
}
