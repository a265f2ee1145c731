#![allow(dead_code)]

use mcs_core::{Configuration, RngHandle, Step};

/// One-dimensional periodic Ising chain with unit coupling, spins ±1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsingRing {
    spins: Vec<i8>,
}

impl IsingRing {
    pub fn all_up(sites: usize) -> Self {
        assert!(sites >= 2);
        Self {
            spins: vec![1; sites],
        }
    }

    pub fn spins(&self) -> &[i8] {
        &self.spins
    }

    /// Exact density of states by enumeration of all 2^N states.
    pub fn exact_density_of_states(sites: usize) -> std::collections::BTreeMap<i32, u64> {
        let mut counts = std::collections::BTreeMap::new();
        for state in 0u32..(1 << sites) {
            let spin = |site: usize| -> i32 {
                if state >> site & 1 == 1 {
                    1
                } else {
                    -1
                }
            };
            let energy: i32 = -(0..sites)
                .map(|bond| spin(bond) * spin((bond + 1) % sites))
                .sum::<i32>();
            *counts.entry(energy).or_insert(0) += 1;
        }
        counts
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SpinFlip {
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
