#![allow(dead_code)]

use mcs_core::{Configuration, Observable, RngHandle, Step};

/// One-dimensional Ising chain with unit coupling, spins ±1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsingChain {
    spins: Vec<i8>,
    periodic: bool,
}

impl IsingChain {
    pub fn all_up(sites: usize, periodic: bool) -> Self {
        assert!(sites >= 2);
        Self {
            spins: vec![1; sites],
            periodic,
        }
    }

    pub fn spins(&self) -> &[i8] {
        &self.spins
    }

    fn bond_count(&self) -> usize {
        if self.periodic {
            self.spins.len()
        } else {
            self.spins.len() - 1
        }
    }
}

/// Single spin-flip proposal.
#[derive(Debug, Clone, Copy)]
pub struct SpinFlip {
    site: usize,
}

impl Configuration for IsingChain {
    type Energy = i32;
    type Step = SpinFlip;

    fn system_size(&self) -> usize {
        self.spins.len()
    }

    fn total_energy(&self) -> i32 {
        let sites = self.spins.len();
        -(0..self.bond_count())
            .map(|bond| (self.spins[bond] * self.spins[(bond + 1) % sites]) as i32)
            .sum::<i32>()
    }

    fn propose_step(&self, rng: &mut RngHandle) -> SpinFlip {
        SpinFlip {
            site: rng.uniform_int(self.spins.len() as u32) as usize,
        }
    }
}

impl Step<IsingChain> for SpinFlip {
    fn is_executable(&self, _config: &IsingChain) -> bool {
        true
    }

    fn delta_energy(&self, config: &IsingChain) -> i32 {
        let sites = config.spins.len();
        let spin = config.spins[self.site] as i32;
        let mut neighbor_sum = 0;
        if config.periodic || self.site > 0 {
            neighbor_sum += config.spins[(self.site + sites - 1) % sites] as i32;
        }
        if config.periodic || self.site + 1 < sites {
            neighbor_sum += config.spins[(self.site + 1) % sites] as i32;
        }
        2 * spin * neighbor_sum
    }

    fn selection_probability_factor(&self, _config: &IsingChain) -> f64 {
        1.0
    }

    fn execute(self, config: &mut IsingChain) {
        config.spins[self.site] = -config.spins[self.site];
    }
}

/// Total energy as a scalar observable.
pub struct EnergyObservable;

impl Observable<IsingChain> for EnergyObservable {
    type Value = f64;

    fn observe(&self, config: &IsingChain) -> f64 {
        config.total_energy() as f64
    }
}

/// Two-level system with E(ground) = 0, E(excited) = 1 and a deliberately
/// asymmetric proposer: from the ground state the excitation is proposed
/// with probability 2/3, from the excited state the de-excitation with
/// probability 1/3, a rest proposal (non-executable) otherwise. The flip
/// step therefore reports a selection probability factor of 2 upward and
/// 1/2 downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwoLevel {
    excited: bool,
}

impl TwoLevel {
    pub fn ground() -> Self {
        Self { excited: false }
    }

    pub fn is_excited(&self) -> bool {
        self.excited
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwoLevelStep {
    Flip,
    Rest,
}

impl Configuration for TwoLevel {
    type Energy = i32;
    type Step = TwoLevelStep;

    fn system_size(&self) -> usize {
        1
    }

    fn total_energy(&self) -> i32 {
        self.excited as i32
    }

    fn propose_step(&self, rng: &mut RngHandle) -> TwoLevelStep {
        let flip_probability = if self.excited { 1.0 / 3.0 } else { 2.0 / 3.0 };
        if rng.uniform01() < flip_probability {
            TwoLevelStep::Flip
        } else {
            TwoLevelStep::Rest
        }
    }
}

impl Step<TwoLevel> for TwoLevelStep {
    fn is_executable(&self, _config: &TwoLevel) -> bool {
        matches!(self, TwoLevelStep::Flip)
    }

    fn delta_energy(&self, config: &TwoLevel) -> i32 {
        if config.excited {
            -1
        } else {
            1
        }
    }

    fn selection_probability_factor(&self, config: &TwoLevel) -> f64 {
        if config.excited {
            0.5
        } else {
            2.0
        }
    }

    fn execute(self, config: &mut TwoLevel) {
        config.excited = !config.excited;
    }
}

/// Occupation of the excited level as a scalar observable.
pub struct Occupation;

impl Observable<TwoLevel> for Occupation {
    type Value = f64;

    fn observe(&self, config: &TwoLevel) -> f64 {
        config.is_excited() as u8 as f64
    }
}
