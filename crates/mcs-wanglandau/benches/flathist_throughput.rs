use criterion::{criterion_group, criterion_main, Criterion};

use mcs_core::{Configuration, EnergyHistogram, RngHandle, Step};
use mcs_wanglandau::{WangLandau, WangLandauParameters};

#[derive(Clone)]
struct IsingRing {
    spins: Vec<i8>,
}

struct SpinFlip {
    site: usize,
}

impl Configuration for IsingRing {
    type Energy = i32;
    type Step = SpinFlip;

    fn system_size(&self) -> usize {
        self.spins.len()
    }

    fn total_energy(&self) -> i32 {
        let sites = self.spins.len();
        -(0..sites)
            .map(|bond| (self.spins[bond] * self.spins[(bond + 1) % sites]) as i32)
            .sum::<i32>()
    }

    fn propose_step(&self, rng: &mut RngHandle) -> SpinFlip {
        SpinFlip {
            site: rng.uniform_int(self.spins.len() as u32) as usize,
        }
    }
}

impl Step<IsingRing> for SpinFlip {
    fn is_executable(&self, _config: &IsingRing) -> bool {
        true
    }

    fn delta_energy(&self, config: &IsingRing) -> i32 {
        let sites = config.spins.len();
        let spin = config.spins[self.site] as i32;
        let left = config.spins[(self.site + sites - 1) % sites] as i32;
        let right = config.spins[(self.site + 1) % sites] as i32;
        2 * spin * (left + right)
    }

    fn selection_probability_factor(&self, _config: &IsingRing) -> f64 {
        1.0
    }

    fn execute(self, config: &mut IsingRing) {
        config.spins[self.site] = -config.spins[self.site];
    }
}

fn bench_flathist(c: &mut Criterion) {
    let base = IsingRing {
        spins: vec![1; 64],
    };

    c.bench_function("wang_landau_steps_10k", |b| {
        b.iter(|| {
            let mut engine: WangLandau<IsingRing> =
                WangLandau::new(WangLandauParameters::default()).unwrap();
            engine.set_random_seed(42);
            let mut config = base.clone();
            engine.do_wang_landau_steps(&mut config, 10_000);
            engine.incidence_histogram().len()
        })
    });
}

criterion_group!(benches, bench_flathist);
criterion_main!(benches);
