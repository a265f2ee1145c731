mod common;

use common::{EnergyObservable, IsingChain};
use mcs_metropolis::{Metropolis, MetropolisParameters};

fn engine() -> Metropolis {
    let parameters = MetropolisParameters {
        relaxation_steps: 200,
        measurement_number: 50,
        steps_between_measurement: 4,
    };
    let mut engine = Metropolis::new(parameters).unwrap();
    engine.set_random_seed(1);
    engine
}

#[test]
fn series_returns_one_sample_vector_per_temperature() {
    let mut engine = engine();
    let mut config = IsingChain::all_up(8, true);
    let betas = [0.2_f64, 0.6, 1.0];

    let results = engine.do_metropolis_simulation_series(&mut config, &betas, &EnergyObservable);

    assert_eq!(results.len(), betas.len());
    for samples in &results {
        assert_eq!(samples.len(), 50);
    }
}

#[test]
fn series_with_feeds_each_accumulator_its_own_temperature() {
    let mut engine = engine();
    let mut config = IsingChain::all_up(8, true);
    let betas = [0.1_f64, 2.0];
    let mut accumulators: Vec<Vec<f64>> = vec![Vec::new(), Vec::new()];

    engine
        .do_metropolis_simulation_series_with(
            &mut config,
            &betas,
            &EnergyObservable,
            &mut accumulators,
        )
        .unwrap();

    assert_eq!(accumulators[0].len(), 50);
    assert_eq!(accumulators[1].len(), 50);
    // The cold run should sit well below the hot run on average.
    let hot = accumulators[0].iter().sum::<f64>() / 50.0;
    let cold = accumulators[1].iter().sum::<f64>() / 50.0;
    assert!(cold < hot);
}

#[test]
fn mismatched_accumulator_count_is_rejected() {
    let mut engine = engine();
    let mut config = IsingChain::all_up(8, true);
    let betas = [0.1_f64, 2.0];
    let mut accumulators: Vec<Vec<f64>> = vec![Vec::new()];

    let err = engine
        .do_metropolis_simulation_series_with(
            &mut config,
            &betas,
            &EnergyObservable,
            &mut accumulators,
        )
        .unwrap_err();
    assert_eq!(err.info().code, "accumulator-count");
}
