#![deny(missing_docs)]
#![doc = "Wang-Landau flat-histogram sampling engine: iterative modification-factor refinement of a log density of states over any model satisfying the mcs-core configuration contract."]

mod checkpoint;
mod engine;
mod params;

pub use checkpoint::{WangLandauCheckpoint, WANG_LANDAU_SCHEMA};
pub use engine::{SweepEvent, WangLandau};
pub use params::WangLandauParameters;
