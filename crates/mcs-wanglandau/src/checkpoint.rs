use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use mcs_core::errors::{ErrorInfo, McsError};
use mcs_core::{Configuration, Histocrete, RngHandle, SchemaVersion};

use crate::engine::WangLandau;
use crate::params::WangLandauParameters;

/// Schema expected by this build when loading Wang-Landau checkpoints.
pub const WANG_LANDAU_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

/// Serializable snapshot of a Wang-Landau engine.
///
/// Captures parameters, RNG state and the accumulated refinement state
/// (log density of states, incidence histogram, current `ln f` and stage).
/// The configuration is externally owned and never part of the archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "E: Serialize",
    deserialize = "E: DeserializeOwned + Ord"
))]
pub struct WangLandauCheckpoint<E: Ord> {
    /// Schema version of the payload.
    pub schema_version: SchemaVersion,
    /// Engine parameters at the time of checkpointing.
    pub parameters: WangLandauParameters,
    /// RNG state at the time of checkpointing.
    pub rng: RngHandle,
    /// Log modification factor of the current refinement stage.
    pub ln_modification_factor: f64,
    /// Zero-based refinement stage index.
    pub stage: u64,
    /// Accumulated log density of states.
    pub log_density: Histocrete<E, f64>,
    /// Incidence histogram of the current refinement stage.
    pub incidence: Histocrete<E, u64>,
}

impl<E> WangLandauCheckpoint<E>
where
    E: Ord + Serialize + DeserializeOwned,
{
    /// Restores the payload from disk.
    pub fn load(path: &Path) -> Result<Self, McsError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            McsError::Serde(
                ErrorInfo::new("checkpoint-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        Self::parse(&contents)
    }

    /// Writes the payload to disk.
    pub fn store(&self, path: &Path) -> Result<(), McsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                McsError::Serde(
                    ErrorInfo::new("checkpoint-mkdir", err.to_string())
                        .with_context("path", parent.display().to_string()),
                )
            })?;
        }
        let json = self.to_json()?;
        fs::write(path, json).map_err(|err| {
            McsError::Serde(
                ErrorInfo::new("checkpoint-write", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }

    /// Restores the payload from an arbitrary reader.
    pub fn read_from<R: Read>(mut source: R) -> Result<Self, McsError> {
        let mut contents = String::new();
        source.read_to_string(&mut contents).map_err(|err| {
            McsError::Serde(ErrorInfo::new("checkpoint-read", err.to_string()))
        })?;
        Self::parse(&contents)
    }

    /// Writes the payload to an arbitrary writer.
    pub fn write_to<W: Write>(&self, mut sink: W) -> Result<(), McsError> {
        let json = self.to_json()?;
        sink.write_all(json.as_bytes())
            .map_err(|err| McsError::Serde(ErrorInfo::new("checkpoint-write", err.to_string())))
    }

    fn parse(contents: &str) -> Result<Self, McsError> {
        let payload: Self = serde_json::from_str(contents).map_err(|err| {
            McsError::Serde(ErrorInfo::new("checkpoint-parse", err.to_string()))
        })?;
        if !WANG_LANDAU_SCHEMA.accepts(&payload.schema_version) {
            return Err(McsError::Serde(
                ErrorInfo::new("checkpoint-schema", "archive schema does not match this engine")
                    .with_context(
                        "expected",
                        format!(
                            "{}.{}.{}",
                            WANG_LANDAU_SCHEMA.major,
                            WANG_LANDAU_SCHEMA.minor,
                            WANG_LANDAU_SCHEMA.patch
                        ),
                    )
                    .with_context(
                        "found",
                        format!(
                            "{}.{}.{}",
                            payload.schema_version.major,
                            payload.schema_version.minor,
                            payload.schema_version.patch
                        ),
                    ),
            ));
        }
        Ok(payload)
    }

    fn to_json(&self) -> Result<String, McsError> {
        serde_json::to_string_pretty(self).map_err(|err| {
            McsError::Serde(ErrorInfo::new("checkpoint-serialize", err.to_string()))
        })
    }
}

impl<C: Configuration> WangLandau<C>
where
    C::Energy: Ord + Serialize + DeserializeOwned,
{
    /// Builds a checkpoint payload from the current engine state.
    pub fn checkpoint(&self) -> WangLandauCheckpoint<C::Energy> {
        WangLandauCheckpoint {
            schema_version: WANG_LANDAU_SCHEMA,
            parameters: self.parameters().clone(),
            rng: self.rng().clone(),
            ln_modification_factor: self.ln_modification_factor(),
            stage: self.stage(),
            log_density: self.log_density().clone(),
            incidence: self.incidence_histogram().clone(),
        }
    }

    /// Writes the engine state to a checkpoint file.
    pub fn save_checkpoint(&self, path: &Path) -> Result<(), McsError> {
        self.checkpoint().store(path)?;
        log::debug!("wang-landau checkpoint written to {}", path.display());
        Ok(())
    }

    /// Writes the engine state to an arbitrary sink.
    pub fn write_checkpoint<W: Write>(&self, sink: W) -> Result<(), McsError> {
        self.checkpoint().write_to(sink)
    }

    /// Restores an engine from a checkpoint payload.
    pub fn restore(payload: WangLandauCheckpoint<C::Energy>) -> Result<Self, McsError> {
        let mut engine = Self::new(payload.parameters)?;
        engine.adopt_state(
            payload.rng,
            payload.ln_modification_factor,
            payload.stage,
            payload.log_density,
            payload.incidence,
        );
        Ok(engine)
    }

    /// Restores an engine from a checkpoint file.
    pub fn from_checkpoint(path: &Path) -> Result<Self, McsError> {
        Self::restore(WangLandauCheckpoint::load(path)?)
    }

    /// Restores an engine from an arbitrary source.
    pub fn read_checkpoint<R: Read>(source: R) -> Result<Self, McsError> {
        Self::restore(WangLandauCheckpoint::read_from(source)?)
    }
}
