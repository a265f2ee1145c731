#![deny(missing_docs)]
#![doc = "Metropolis-Hastings sampling engine: fixed-temperature step loops, observable accumulation, multi-temperature sweeps and autocorrelation analysis over any model satisfying the mcs-core configuration contract."]

mod analysis;
mod checkpoint;
mod engine;
mod params;

pub use analysis::{autocorrelation_from_samples, integrated_time_from_function};
pub use checkpoint::{MetropolisCheckpoint, METROPOLIS_SCHEMA};
pub use engine::{MeasurementEvent, Metropolis};
pub use params::MetropolisParameters;
