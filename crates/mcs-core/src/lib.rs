#![deny(missing_docs)]
#![doc = "Core traits and data types for the mcs Monte Carlo engines: the configuration/step contract, energy histograms, observables, deterministic RNG and the shared termination-signal machinery."]

use std::ops::Add;

pub mod errors;
pub mod histograms;
pub mod observables;
pub mod rng;
pub mod schema;
pub mod signal;

pub use errors::{ErrorInfo, McsError};
pub use histograms::{BinValue, Binned, Binning, EnergyHistogram, Histocrete};
pub use observables::{Accumulator, MeanVariance, Observable, ObservableValue};
pub use rng::{derive_substream_seed, RngHandle};
pub use schema::SchemaVersion;

/// Value type of configuration energies.
///
/// Energies add (step deltas accumulate onto totals) and compare; discrete
/// models typically use `i32`, continuous ones `f64`. Ordering tight enough
/// for use as a histogram key is demanded separately by the engines that
/// need it.
pub trait Energy: Copy + PartialOrd + Add<Output = Self> {}

impl<E> Energy for E where E: Copy + PartialOrd + Add<Output = E> {}

/// Inverse temperature: anything that can scale an energy difference into
/// the dimensionless exponent of a Boltzmann weight.
///
/// Typed separately from the energy so that field-resolved models can use
/// arrays of β against vector-valued energies; plain `f64` β covers every
/// scalar energy type convertible to `f64`.
pub trait InverseTemperature<E> {
    /// Computes `β · delta` as the dimensionless acceptance exponent.
    fn scaled_energy(&self, delta: E) -> f64;
}

impl<E> InverseTemperature<E> for f64
where
    E: Into<f64> + Copy,
{
    fn scaled_energy(&self, delta: E) -> f64 {
        self * delta.into()
    }
}

/// Abstract state of the physical system being simulated.
///
/// A configuration knows its size (number of elementary sites), its current
/// total energy, and how to propose a candidate mutation. Proposal must be
/// pure with respect to the configuration: only the RNG state advances.
pub trait Configuration {
    /// Energy value type of this model.
    type Energy: Energy;

    /// Candidate-move type produced by [`Configuration::propose_step`].
    type Step: Step<Self>;

    /// Number of elementary sites; one "sweep" is this many steps.
    fn system_size(&self) -> usize;

    /// Current total energy of the configuration.
    fn total_energy(&self) -> Self::Energy;

    /// Proposes a candidate step, advancing only the RNG.
    fn propose_step(&self, rng: &mut RngHandle) -> Self::Step;
}

/// A candidate mutation of a configuration.
///
/// Between proposal and execution the configuration is unchanged; after
/// [`Step::execute`] its total energy equals the old energy plus
/// [`Step::delta_energy`]. `execute` consumes the step, so an accepted step
/// runs exactly once.
pub trait Step<C: Configuration + ?Sized> {
    /// Whether the move is legal in the current state.
    fn is_executable(&self, config: &C) -> bool;

    /// Signed energy change if the step were executed. Must be exact and
    /// deterministic for this step object.
    fn delta_energy(&self, config: &C) -> C::Energy;

    /// Proposal-asymmetry factor: the probability of proposing this step
    /// divided by the probability of proposing its reverse, 1.0 for
    /// symmetric proposal schemes. Always positive.
    fn selection_probability_factor(&self, config: &C) -> f64;

    /// Applies the mutation to the configuration.
    fn execute(self, config: &mut C);
}
