use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use mcs_core::errors::{ErrorInfo, McsError};
use mcs_core::{RngHandle, SchemaVersion};

use crate::engine::Metropolis;
use crate::params::MetropolisParameters;

/// Schema expected by this build when loading Metropolis checkpoints.
pub const METROPOLIS_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

/// Serializable snapshot of a Metropolis engine.
///
/// Captures parameters and the RNG state; the configuration is externally
/// owned and never part of the archive. Restoring the payload and resuming
/// with an identical configuration state reproduces the subsequent sampling
/// bit-identically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetropolisCheckpoint {
    /// Schema version of the payload.
    pub schema_version: SchemaVersion,
    /// Engine parameters at the time of checkpointing.
    pub parameters: MetropolisParameters,
    /// RNG state at the time of checkpointing.
    pub rng: RngHandle,
}

impl MetropolisCheckpoint {
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
        if !METROPOLIS_SCHEMA.accepts(&payload.schema_version) {
            return Err(McsError::Serde(
                ErrorInfo::new("checkpoint-schema", "archive schema does not match this engine")
                    .with_context(
                        "expected",
                        format!(
                            "{}.{}.{}",
                            METROPOLIS_SCHEMA.major,
                            METROPOLIS_SCHEMA.minor,
                            METROPOLIS_SCHEMA.patch
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

impl Metropolis {
    /// Builds a checkpoint payload from the current engine state.
    pub fn checkpoint(&self) -> MetropolisCheckpoint {
        MetropolisCheckpoint {
            schema_version: METROPOLIS_SCHEMA,
            parameters: self.parameters().clone(),
            rng: self.rng().clone(),
        }
    }

    /// Writes the engine state to a checkpoint file.
    pub fn save_checkpoint(&self, path: &Path) -> Result<(), McsError> {
        self.checkpoint().store(path)?;
        log::debug!("metropolis checkpoint written to {}", path.display());
        Ok(())
    }

    /// Writes the engine state to an arbitrary sink.
    pub fn write_checkpoint<W: Write>(&self, sink: W) -> Result<(), McsError> {
        self.checkpoint().write_to(sink)
    }

    /// Restores an engine from a checkpoint payload.
    pub fn restore(payload: MetropolisCheckpoint) -> Result<Self, McsError> {
        let mut engine = Self::new(payload.parameters)?;
        *engine.rng_mut() = payload.rng;
        Ok(engine)
    }

    /// Restores an engine from a checkpoint file.
    pub fn from_checkpoint(path: &Path) -> Result<Self, McsError> {
        Self::restore(MetropolisCheckpoint::load(path)?)
    }

    /// Restores an engine from an arbitrary source.
    pub fn read_checkpoint<R: Read>(source: R) -> Result<Self, McsError> {
        Self::restore(MetropolisCheckpoint::read_from(source)?)
    }
}
