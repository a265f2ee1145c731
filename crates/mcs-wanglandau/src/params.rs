use serde::{Deserialize, Serialize};

use mcs_core::errors::{ErrorInfo, McsError};

/// Parameters governing a Wang-Landau simulation.
///
/// All modification factors are log-space values: the density-of-states
/// update adds `ln_f` per visit, and refinement shrinks `ln_f` by
/// multiplying it with `modification_factor_multiplier` directly (rather
/// than raising `f` to a power, which would give a different schedule).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WangLandauParameters {
    /// Initial `ln f` used when starting fresh.
    #[serde(default = "default_modification_factor_initial")]
    pub modification_factor_initial: f64,
    /// Refinement terminates once `ln f` drops to or below this value.
    #[serde(default = "default_modification_factor_final")]
    pub modification_factor_final: f64,
    /// Shrink rate applied to `ln f` at each refinement boundary.
    #[serde(default = "default_modification_factor_multiplier")]
    pub modification_factor_multiplier: f64,
    /// Required `min/mean` ratio of the incidence histogram before a
    /// refinement step.
    #[serde(default = "default_flatness")]
    pub flatness: f64,
    /// Steps between flatness checks; `None` uses the configuration's
    /// system size (one sweep).
    #[serde(default)]
    pub sweep_steps: Option<u64>,
}

fn default_modification_factor_initial() -> f64 {
    1.0
}

fn default_modification_factor_final() -> f64 {
    1e-6
}

fn default_modification_factor_multiplier() -> f64 {
    0.9
}

fn default_flatness() -> f64 {
    0.8
}

impl Default for WangLandauParameters {
    fn default() -> Self {
        Self {
            modification_factor_initial: default_modification_factor_initial(),
            modification_factor_final: default_modification_factor_final(),
            modification_factor_multiplier: default_modification_factor_multiplier(),
            flatness: default_flatness(),
            sweep_steps: None,
        }
    }
}

impl WangLandauParameters {
    /// Checks the parameter set for internal consistency.
    pub fn validate(&self) -> Result<(), McsError> {
        if !(self.flatness > 0.0 && self.flatness <= 1.0) {
            return Err(McsError::Parameter(
                ErrorInfo::new("flatness-range", "flatness must lie in (0, 1]")
                    .with_context("flatness", self.flatness.to_string()),
            ));
        }
        if !(self.modification_factor_multiplier > 0.0
            && self.modification_factor_multiplier < 1.0)
        {
            return Err(McsError::Parameter(
                ErrorInfo::new(
                    "multiplier-range",
                    "modification_factor_multiplier must lie in (0, 1)",
                )
                .with_context(
                    "multiplier",
                    self.modification_factor_multiplier.to_string(),
                ),
            ));
        }
        if !(self.modification_factor_final > 0.0) {
            return Err(McsError::Parameter(
                ErrorInfo::new(
                    "final-factor-range",
                    "modification_factor_final must be positive",
                )
                .with_context("final", self.modification_factor_final.to_string()),
            ));
        }
        if self.modification_factor_final >= self.modification_factor_initial {
            return Err(McsError::Parameter(
                ErrorInfo::new(
                    "factor-ordering",
                    "modification_factor_final must be below modification_factor_initial",
                )
                .with_context("initial", self.modification_factor_initial.to_string())
                .with_context("final", self.modification_factor_final.to_string()),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_parameters_validate() {
        assert!(WangLandauParameters::default().validate().is_ok());
    }

    #[test]
    fn flatness_outside_unit_interval_is_rejected() {
        let parameters = WangLandauParameters {
            flatness: 1.5,
            ..WangLandauParameters::default()
        };
        assert_eq!(
            parameters.validate().unwrap_err().info().code,
            "flatness-range"
        );
    }

    #[test]
    fn multiplier_of_one_is_rejected() {
        let parameters = WangLandauParameters {
            modification_factor_multiplier: 1.0,
            ..WangLandauParameters::default()
        };
        assert_eq!(
            parameters.validate().unwrap_err().info().code,
            "multiplier-range"
        );
    }

    #[test]
    fn final_factor_above_initial_is_rejected() {
        let parameters = WangLandauParameters {
            modification_factor_initial: 1e-8,
            ..WangLandauParameters::default()
        };
        assert_eq!(
            parameters.validate().unwrap_err().info().code,
            "factor-ordering"
        );
    }
}
