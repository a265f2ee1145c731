use mcs_core::errors::{ErrorInfo, McsError};
use mcs_core::{
    signal, Accumulator, Configuration, InverseTemperature, Observable, RngHandle, Step,
};

use crate::params::MetropolisParameters;

/// Progress event handed to the measurement hook after every measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasurementEvent {
    /// One-based index of the measurement that was just taken.
    pub measurement: u64,
    /// Total number of measurements planned for this call.
    pub total: u64,
}

type MeasurementHook = Box<dyn FnMut(&MeasurementEvent)>;

/// Metropolis-Hastings sampling engine.
///
/// The engine owns its RNG and parameters; the configuration is borrowed
/// mutably for the duration of each sampling call and never serialized.
/// A termination signal observed between measurements latches
/// [`Metropolis::is_terminating`] and makes the current call return with
/// partial results intact.
pub struct Metropolis {
    parameters: MetropolisParameters,
    rng: RngHandle,
    terminating: bool,
    measurement_hook: Option<MeasurementHook>,
}

impl std::fmt::Debug for Metropolis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metropolis")
            .field("parameters", &self.parameters)
            .field("terminating", &self.terminating)
            .finish_non_exhaustive()
    }
}

impl Metropolis {
    /// Creates an engine with the provided parameters and a default seed.
    ///
    /// Installs the process-wide termination hook; parameter violations are
    /// reported here and fatal.
    pub fn new(parameters: MetropolisParameters) -> Result<Self, McsError> {
        parameters.validate()?;
        signal::install_termination_hook()?;
        Ok(Self {
            parameters,
            rng: RngHandle::from_seed(0),
            terminating: false,
            measurement_hook: None,
        })
    }

    /// Reseeds the engine's random number generator.
    pub fn set_random_seed(&mut self, seed: u64) {
        self.rng.reseed(seed);
    }

    /// Whether the previous sampling call was interrupted by a signal.
    pub fn is_terminating(&self) -> bool {
        self.terminating
    }

    /// The engine parameters.
    pub fn parameters(&self) -> &MetropolisParameters {
        &self.parameters
    }

    /// The engine's RNG state.
    pub fn rng(&self) -> &RngHandle {
        &self.rng
    }

    /// Mutable access to the RNG for advanced usage (tests, substream
    /// plumbing).
    pub fn rng_mut(&mut self) -> &mut RngHandle {
        &mut self.rng
    }

    /// Installs the single-subscriber measurement hook.
    pub fn set_measurement_hook<F>(&mut self, hook: F)
    where
        F: FnMut(&MeasurementEvent) + 'static,
    {
        self.measurement_hook = Some(Box::new(hook));
    }

    /// Removes the measurement hook.
    pub fn clear_measurement_hook(&mut self) {
        self.measurement_hook = None;
    }

    /// Performs `num_steps` Metropolis steps at inverse temperature `beta`.
    ///
    /// A non-executable proposal advances nothing beyond the proposal
    /// itself. For an executable step one uniform draw is consumed and the
    /// step is accepted iff
    /// `β·ΔE ≤ −ln q  ||  u < (1/q)·exp(−β·ΔE)`
    /// where `q` is the step's selection probability factor. The first arm
    /// short-circuits guaranteed acceptances without evaluating `exp`.
    pub fn do_metropolis_steps<C, B>(&mut self, config: &mut C, num_steps: u64, beta: &B)
    where
        C: Configuration,
        B: InverseTemperature<C::Energy>,
    {
        for _ in 0..num_steps {
            let step = config.propose_step(&mut self.rng);
            if !step.is_executable(config) {
                continue;
            }
            let beta_delta_energy = beta.scaled_energy(step.delta_energy(config));
            let selection_factor = step.selection_probability_factor(config);
            let random_accept = self.rng.uniform01();
            if beta_delta_energy <= -selection_factor.ln()
                || random_accept < selection_factor.recip() * (-beta_delta_energy).exp()
            {
                step.execute(config);
            }
        }
    }

    /// Runs a full simulation at `beta`, returning the raw samples.
    pub fn do_metropolis_simulation<C, B, O>(
        &mut self,
        config: &mut C,
        beta: &B,
        observable: &O,
    ) -> Vec<O::Value>
    where
        C: Configuration,
        B: InverseTemperature<C::Energy>,
        O: Observable<C>,
    {
        let mut measurements = Vec::with_capacity(self.parameters.measurement_number as usize);
        self.do_metropolis_simulation_with(config, beta, observable, &mut measurements);
        measurements
    }

    /// Runs a full simulation at `beta`, feeding each sample into
    /// `accumulator`.
    ///
    /// Performs the relaxation steps, then for every measurement: the steps
    /// between measurements, the measurement hook, the observation, and a
    /// signal poll. A pending termination signal ends the call after the
    /// current measurement with the accumulator intact.
    pub fn do_metropolis_simulation_with<C, B, O, A>(
        &mut self,
        config: &mut C,
        beta: &B,
        observable: &O,
        accumulator: &mut A,
    ) where
        C: Configuration,
        B: InverseTemperature<C::Energy>,
        O: Observable<C>,
        A: Accumulator<O::Value>,
    {
        signal::reset_termination_flag();
        self.terminating = false;

        self.do_metropolis_steps(config, self.parameters.relaxation_steps, beta);

        let total = self.parameters.measurement_number;
        for measurement in 0..total {
            self.do_metropolis_steps(config, self.parameters.steps_between_measurement, beta);
            if let Some(hook) = self.measurement_hook.as_mut() {
                hook(&MeasurementEvent {
                    measurement: measurement + 1,
                    total,
                });
            }
            accumulator.accumulate(observable.observe(config));
            if signal::termination_requested() {
                self.terminating = true;
                log::info!(
                    "metropolis simulation interrupted after measurement {} of {}",
                    measurement + 1,
                    total
                );
                return;
            }
        }
    }

    /// Runs one simulation per inverse temperature, returning one sample
    /// vector per `beta` in iteration order.
    ///
    /// The configuration is not reset between temperatures; warm starts are
    /// the caller's choice. Stops early once a call was interrupted.
    pub fn do_metropolis_simulation_series<C, B, O>(
        &mut self,
        config: &mut C,
        betas: &[B],
        observable: &O,
    ) -> Vec<Vec<O::Value>>
    where
        C: Configuration,
        B: InverseTemperature<C::Energy>,
        O: Observable<C>,
    {
        let mut results = Vec::with_capacity(betas.len());
        for beta in betas {
            results.push(self.do_metropolis_simulation(config, beta, observable));
            if self.terminating {
                break;
            }
        }
        results
    }

    /// Runs one simulation per inverse temperature, feeding accumulator `i`
    /// only with samples drawn at `betas[i]`.
    pub fn do_metropolis_simulation_series_with<C, B, O, A>(
        &mut self,
        config: &mut C,
        betas: &[B],
        observable: &O,
        accumulators: &mut [A],
    ) -> Result<(), McsError>
    where
        C: Configuration,
        B: InverseTemperature<C::Energy>,
        O: Observable<C>,
        A: Accumulator<O::Value>,
    {
        if betas.len() != accumulators.len() {
            return Err(McsError::Parameter(
                ErrorInfo::new(
                    "accumulator-count",
                    "one accumulator per inverse temperature is required",
                )
                .with_context("betas", betas.len().to_string())
                .with_context("accumulators", accumulators.len().to_string()),
            ));
        }
        for (beta, accumulator) in betas.iter().zip(accumulators.iter_mut()) {
            self.do_metropolis_simulation_with(config, beta, observable, accumulator);
            if self.terminating {
                break;
            }
        }
        Ok(())
    }
}
