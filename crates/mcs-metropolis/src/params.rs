use serde::{Deserialize, Serialize};

use mcs_core::errors::{ErrorInfo, McsError};

/// Parameters governing a Metropolis simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetropolisParameters {
    /// Equilibration steps performed before the first measurement.
    #[serde(default = "default_relaxation_steps")]
    pub relaxation_steps: u64,
    /// Number of measurements taken per simulation call.
    #[serde(default = "default_measurement_number")]
    pub measurement_number: u64,
    /// Steps performed between two consecutive measurements.
    #[serde(default = "default_steps_between_measurement")]
    pub steps_between_measurement: u64,
}

fn default_relaxation_steps() -> u64 {
    1_000
}

fn default_measurement_number() -> u64 {
    100
}

fn default_steps_between_measurement() -> u64 {
    100
}

impl Default for MetropolisParameters {
    fn default() -> Self {
        Self {
            relaxation_steps: default_relaxation_steps(),
            measurement_number: default_measurement_number(),
            steps_between_measurement: default_steps_between_measurement(),
        }
    }
}

impl MetropolisParameters {
    /// Checks the parameter set for internal consistency.
    pub fn validate(&self) -> Result<(), McsError> {
        if self.measurement_number > 0 && self.steps_between_measurement == 0 {
            return Err(McsError::Parameter(
                ErrorInfo::new(
                    "steps-between-measurement",
                    "steps_between_measurement must be positive when measurements are requested",
                )
                .with_context("measurement_number", self.measurement_number.to_string()),
            ));
        }
        Ok(())
    }
}
