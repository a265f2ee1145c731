//! Autocorrelation analysis for Metropolis sample streams.
//!
//! The sampling and the pure computation are split: the engine methods
//! gather sweep-spaced samples, the free functions turn a sample vector
//! into the autocorrelation function and the integrated autocorrelation
//! time.

use mcs_core::errors::{ErrorInfo, McsError};
use mcs_core::{Configuration, InverseTemperature, Observable, ObservableValue};

use crate::engine::Metropolis;

/// Computes the autocorrelation function from sweep-spaced samples.
///
/// `samples` must hold exactly `maximal_time · simulation_time_factor + 1`
/// entries. For every lag `t ∈ [0, maximal_time]`,
/// `C(t) = ⟨f[s·T] · f[s·T + t]⟩_s − ⟨f⟩²` with the outer average over the
/// `simulation_time_factor` sweep windows and `⟨f⟩` over all samples. The
/// 0-lag entry is therefore `⟨f²⟩ − ⟨f⟩²`.
pub fn autocorrelation_from_samples<V: ObservableValue>(
    samples: &[V],
    maximal_time: usize,
    simulation_time_factor: usize,
) -> Result<Vec<V>, McsError> {
    validate_window(maximal_time, simulation_time_factor)?;
    let expected = maximal_time * simulation_time_factor + 1;
    if samples.len() != expected {
        return Err(McsError::Parameter(
            ErrorInfo::new(
                "autocorrelation-samples",
                "sample count does not match the analysis window",
            )
            .with_context("expected", expected.to_string())
            .with_context("actual", samples.len().to_string()),
        ));
    }

    let mean = samples
        .iter()
        .fold(V::zero(), |sum, &sample| sum + sample)
        .scaled(1.0 / samples.len() as f64);
    let mean_squared = mean * mean;

    let mut function = Vec::with_capacity(maximal_time + 1);
    for time in 0..=maximal_time {
        let mut sum = V::zero();
        for sweep in 0..simulation_time_factor {
            let start_time = sweep * maximal_time;
            sum = sum + samples[start_time] * samples[start_time + time];
        }
        function.push(sum.scaled(1.0 / simulation_time_factor as f64) - mean_squared);
    }
    Ok(function)
}

/// Computes the integrated autocorrelation time
/// `τ_int = 1 + 2·Σ_{t=1}^{N−1} (1 − t/N) · C(t)/C(0)` from an
/// autocorrelation function of length `N + 1`.
///
/// A zero 0-lag baseline is a degenerate observable and surfaces as an
/// analysis error; division is pointwise for vector-like values.
pub fn integrated_time_from_function<V: ObservableValue>(
    autocorrelation: &[V],
) -> Result<V, McsError> {
    let baseline = match autocorrelation.first() {
        Some(baseline) if *baseline != V::zero() => *baseline,
        _ => {
            return Err(McsError::Analysis(
                ErrorInfo::new(
                    "degenerate-autocorrelation",
                    "autocorrelation baseline C(0) is zero",
                )
                .with_hint("the observable did not fluctuate over the sampled window"),
            ));
        }
    };

    let maximal_time = autocorrelation.len() - 1;
    // C(0)/C(0) seeds a one in every component, scalar or vector-like.
    let mut result = baseline / baseline;
    for time in 1..maximal_time {
        let weight = 2.0 * (1.0 - time as f64 / maximal_time as f64);
        result = result + (autocorrelation[time] / baseline).scaled(weight);
    }
    Ok(result)
}

fn validate_window(maximal_time: usize, simulation_time_factor: usize) -> Result<(), McsError> {
    if maximal_time == 0 || simulation_time_factor == 0 {
        return Err(McsError::Parameter(
            ErrorInfo::new(
                "autocorrelation-window",
                "maximal_time and simulation_time_factor must be positive",
            )
            .with_context("maximal_time", maximal_time.to_string())
            .with_context("simulation_time_factor", simulation_time_factor.to_string()),
        ));
    }
    Ok(())
}

impl Metropolis {
    /// Measures the autocorrelation function of `observable` at `beta`.
    ///
    /// After the relaxation steps, collects
    /// `maximal_time · simulation_time_factor + 1` samples separated by one
    /// sweep (`system_size()` Metropolis steps) each and evaluates
    /// [`autocorrelation_from_samples`].
    pub fn autocorrelation_function<C, B, O>(
        &mut self,
        config: &mut C,
        beta: &B,
        observable: &O,
        maximal_time: usize,
        simulation_time_factor: usize,
    ) -> Result<Vec<O::Value>, McsError>
    where
        C: Configuration,
        B: InverseTemperature<C::Energy>,
        O: Observable<C>,
        O::Value: ObservableValue,
    {
        validate_window(maximal_time, simulation_time_factor)?;

        self.do_metropolis_steps(config, self.parameters().relaxation_steps, beta);

        let sweep_length = config.system_size() as u64;
        let total = maximal_time * simulation_time_factor + 1;
        let mut samples = Vec::with_capacity(total);
        for _ in 0..total {
            self.do_metropolis_steps(config, sweep_length, beta);
            samples.push(observable.observe(config));
        }
        autocorrelation_from_samples(&samples, maximal_time, simulation_time_factor)
    }

    /// Measures the integrated autocorrelation time of `observable` at
    /// `beta`; see [`integrated_time_from_function`].
    pub fn integrated_autocorrelation_time<C, B, O>(
        &mut self,
        config: &mut C,
        beta: &B,
        observable: &O,
        maximal_time: usize,
        simulation_time_factor: usize,
    ) -> Result<O::Value, McsError>
    where
        C: Configuration,
        B: InverseTemperature<C::Energy>,
        O: Observable<C>,
        O::Value: ObservableValue,
    {
        let function = self.autocorrelation_function(
            config,
            beta,
            observable,
            maximal_time,
            simulation_time_factor,
        )?;
        integrated_time_from_function(&function)
    }
}
