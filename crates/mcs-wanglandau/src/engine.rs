use mcs_core::errors::McsError;
use mcs_core::{signal, Configuration, EnergyHistogram, Histocrete, RngHandle, Step};

use crate::params::WangLandauParameters;

/// Progress event handed to the sweep hook after every sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepEvent {
    /// Zero-based refinement stage the sweep belongs to.
    pub stage: u64,
    /// Current log modification factor.
    pub ln_f: f64,
    /// Flatness of the incidence histogram after the sweep.
    pub flatness: f64,
}

type SweepHook = Box<dyn FnMut(&SweepEvent)>;

/// Wang-Landau flat-histogram sampling engine.
///
/// Estimates the density of states `g(E)` of a model by penalizing visits
/// to already-well-sampled energies: every step adds the running
/// modification factor to `ln g` at the walker's current energy, driving
/// the walk toward flat energy coverage. All density arithmetic stays in
/// log space; `exp` is for reporting only.
///
/// The energy range is defined by the walk itself: the histograms' key sets
/// grow monotonically as new energies are discovered. Callers that want
/// fixed bounds can pre-seed the incidence histogram through
/// [`Histocrete::with_keys_of`].
pub struct WangLandau<C: Configuration>
where
    C::Energy: Ord,
{
    parameters: WangLandauParameters,
    rng: RngHandle,
    log_density: Histocrete<C::Energy, f64>,
    incidence: Histocrete<C::Energy, u64>,
    ln_modification_factor: f64,
    stage: u64,
    terminating: bool,
    sweep_hook: Option<SweepHook>,
}

impl<C: Configuration> std::fmt::Debug for WangLandau<C>
where
    C::Energy: Ord,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WangLandau")
            .field("parameters", &self.parameters)
            .field("ln_modification_factor", &self.ln_modification_factor)
            .field("stage", &self.stage)
            .field("terminating", &self.terminating)
            .finish_non_exhaustive()
    }
}

impl<C: Configuration> WangLandau<C>
where
    C::Energy: Ord,
{
    /// Creates an engine with the provided parameters and a default seed.
    ///
    /// Installs the process-wide termination hook; parameter violations are
    /// reported here and fatal.
    pub fn new(parameters: WangLandauParameters) -> Result<Self, McsError> {
        parameters.validate()?;
        signal::install_termination_hook()?;
        let ln_modification_factor = parameters.modification_factor_initial;
        Ok(Self {
            parameters,
            rng: RngHandle::from_seed(0),
            log_density: Histocrete::new(),
            incidence: Histocrete::new(),
            ln_modification_factor,
            stage: 0,
            terminating: false,
            sweep_hook: None,
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
    pub fn parameters(&self) -> &WangLandauParameters {
        &self.parameters
    }

    /// Current log modification factor `ln f`.
    pub fn ln_modification_factor(&self) -> f64 {
        self.ln_modification_factor
    }

    /// Zero-based index of the current refinement stage.
    pub fn stage(&self) -> u64 {
        self.stage
    }

    /// The incidence histogram of the current refinement stage.
    pub fn incidence_histogram(&self) -> &Histocrete<C::Energy, u64> {
        &self.incidence
    }

    /// The accumulated log density of states `ln g(E)`.
    pub fn log_density(&self) -> &Histocrete<C::Energy, f64> {
        &self.log_density
    }

    /// Returns a copy of the estimated density of states in log form;
    /// the physical `g(E)` is `exp` of each value.
    pub fn density_of_states(&self) -> Histocrete<C::Energy, f64> {
        self.log_density.clone()
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

    /// Installs the single-subscriber sweep hook.
    pub fn set_sweep_hook<F>(&mut self, hook: F)
    where
        F: FnMut(&SweepEvent) + 'static,
    {
        self.sweep_hook = Some(Box::new(hook));
    }

    /// Removes the sweep hook.
    pub fn clear_sweep_hook(&mut self) {
        self.sweep_hook = None;
    }

    /// Performs `num_steps` Wang-Landau steps at the current `ln f`.
    ///
    /// For an executable proposal the candidate energy is accepted iff
    /// `u < exp(S[E_cur] − S[E_new] − ln q)` with `q` the step's selection
    /// probability factor (the test runs in log space, so large density
    /// differences cannot overflow, and unseen energies read `S = 0`).
    /// Whether or not the walker moved, the visit counts: `ln f` is added
    /// to `S` and one to the incidence at the walker's current energy.
    pub fn do_wang_landau_steps(&mut self, config: &mut C, num_steps: u64) {
        let mut current = config.total_energy();
        for _ in 0..num_steps {
            let step = config.propose_step(&mut self.rng);
            if step.is_executable(config) {
                let candidate = current + step.delta_energy(config);
                let selection_factor = step.selection_probability_factor(config);
                let log_ratio = self.log_density.value_or_zero(current)
                    - self.log_density.value_or_zero(candidate)
                    - selection_factor.ln();
                let random_accept = self.rng.uniform01();
                if log_ratio >= 0.0 || random_accept < log_ratio.exp() {
                    step.execute(config);
                    current = candidate;
                }
            }
            self.log_density
                .accumulate(current, self.ln_modification_factor);
            self.incidence.record(current);
        }
    }

    pub(crate) fn adopt_state(
        &mut self,
        rng: RngHandle,
        ln_modification_factor: f64,
        stage: u64,
        log_density: Histocrete<C::Energy, f64>,
        incidence: Histocrete<C::Energy, u64>,
    ) {
        self.rng = rng;
        self.ln_modification_factor = ln_modification_factor;
        self.stage = stage;
        self.log_density = log_density;
        self.incidence = incidence;
    }

    /// Runs the full refinement loop.
    ///
    /// Sweeps until the incidence histogram is flat enough, then shrinks
    /// `ln f` and resets the incidence (the density of states is
    /// preserved), until `ln f` reaches the final modification factor. The
    /// sweep hook and a termination-signal poll run between sweeps; an
    /// observed signal ends the call cleanly with all partial results
    /// intact.
    pub fn do_wang_landau_simulation(&mut self, config: &mut C) {
        signal::reset_termination_flag();
        self.terminating = false;

        let sweep_steps = self
            .parameters
            .sweep_steps
            .unwrap_or(config.system_size() as u64);

        while self.ln_modification_factor > self.parameters.modification_factor_final {
            loop {
                self.do_wang_landau_steps(config, sweep_steps);
                let flatness = self.incidence.flatness();
                if let Some(hook) = self.sweep_hook.as_mut() {
                    hook(&SweepEvent {
                        stage: self.stage,
                        ln_f: self.ln_modification_factor,
                        flatness,
                    });
                }
                if signal::termination_requested() {
                    self.terminating = true;
                    log::info!(
                        "wang-landau simulation interrupted in stage {} at ln_f {:e}",
                        self.stage,
                        self.ln_modification_factor
                    );
                    return;
                }
                if flatness >= self.parameters.flatness {
                    break;
                }
            }

            log::debug!(
                "refinement stage {} flat over {} energies, shrinking ln_f {:e}",
                self.stage,
                self.incidence.len(),
                self.ln_modification_factor
            );
            self.ln_modification_factor *= self.parameters.modification_factor_multiplier;
            self.incidence.reset_values();
            self.stage += 1;
        }
    }
}
