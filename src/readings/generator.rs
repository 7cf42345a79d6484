//! Synthetic occupancy reading generation
//!
//! Each tick perturbs a facility's count by a bounded random delta whose range
//! depends on the active scenario. The default scenario draws uniformly from
//! `[-3, 7]`, so counts drift upward and violations eventually occur.

use crate::facility::Facility;
use crate::readings::OccupancyReading;
use crate::types::SimulationScenario;
use chrono::{DateTime, Utc};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Generates occupancy readings for the simulation
#[derive(Debug, Clone)]
pub struct ReadingGenerator {
    rng: StdRng,
    scenario: SimulationScenario,
}

impl ReadingGenerator {
    /// Create a generator with entropy-seeded randomness
    pub fn new(scenario: SimulationScenario) -> Self {
        Self { rng: StdRng::from_entropy(), scenario }
    }

    /// Create a generator with a fixed seed for reproducible runs
    pub fn with_seed(scenario: SimulationScenario, seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed), scenario }
    }

    /// Create a generator seeded when `seed` is given, entropy-seeded otherwise
    pub fn from_optional_seed(scenario: SimulationScenario, seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(scenario, seed),
            None => Self::new(scenario),
        }
    }

    /// Scenario driving the delta range
    pub fn scenario(&self) -> SimulationScenario {
        self.scenario
    }

    /// Switch to another scenario, keeping the random stream
    pub fn set_scenario(&mut self, scenario: SimulationScenario) {
        self.scenario = scenario;
    }

    /// Draw a starting count as a random fraction of capacity within `load_range`
    pub fn initial_count(&mut self, facility: &Facility, load_range: (f64, f64)) -> u32 {
        let (min, max) = load_range;
        let factor = if max > min { self.rng.gen_range(min..max) } else { min };
        (facility.capacity as f64 * factor).round().max(0.0) as u32
    }

    /// Draw the next per-tick delta for the current scenario
    pub fn next_delta(&mut self) -> i64 {
        let (low, high) = self.scenario.delta_range();
        self.rng.gen_range(low..=high)
    }

    /// Produce the next reading for a facility given its current count
    pub fn next_reading(
        &mut self,
        facility: &Facility,
        current_count: u32,
        at: DateTime<Utc>,
    ) -> OccupancyReading {
        let delta = self.next_delta();
        let next = (current_count as i64 + delta).clamp(0, u32::MAX as i64) as u32;
        OccupancyReading::new(facility.id, next, at)
    }
}
