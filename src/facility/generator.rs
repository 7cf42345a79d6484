//! Baseline generation
//!
//! Builds a plausible seed dataset when no seed file is supplied: a set of
//! city parking facilities with starting counts, a month of resolved
//! violations skewed toward a few repeat offenders, and an active violation
//! for every facility that starts above capacity.

use crate::facility::{Facility, SeedData, SeedFacility};
use crate::ledger::{Evidence, EvidenceMetadata, Violation};
use crate::types::FacilityId;
use chrono::{DateTime, Duration, Utc};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

const FACILITY_NAMES: [&str; 12] = [
    "Connaught Place Block A",
    "Karol Bagh Market",
    "Sarojini Nagar Market",
    "Lajpat Nagar Central",
    "Chandni Chowk Multilevel",
    "Nehru Place Complex",
    "Rajouri Garden Main",
    "Hauz Khas Village",
    "Janpath Underground",
    "Saket District Centre",
    "Kamla Nagar Market",
    "Greater Kailash M Block",
];

const OPERATORS: [&str; 4] =
    ["Metro Parking Co", "Capital Lots Pvt Ltd", "Sharma Parking Services", "Northern Mobility"];

const ZONES: [&str; 4] = ["Central", "South", "West", "North"];

const PENALTY_RATES: [f64; 5] = [20.0, 30.0, 50.0, 75.0, 100.0];

const LOT_SECTIONS: [&str; 4] = ["Entry Gate", "Level 1", "Level 2", "Exit Ramp"];

/// Generator for baseline seed data
#[derive(Debug)]
pub struct BaselineGenerator {
    rng: StdRng,
}

impl BaselineGenerator {
    /// Create a generator with entropy-seeded randomness
    pub fn new() -> Self {
        Self { rng: StdRng::from_entropy() }
    }

    /// Create a generator with a specific seed
    pub fn with_seed(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    /// Generate a complete baseline relative to `now`
    pub fn generate(
        &mut self,
        facility_count: usize,
        historical_violations: usize,
        now: DateTime<Utc>,
    ) -> SeedData {
        let facilities: Vec<SeedFacility> =
            (0..facility_count).map(|index| self.generate_facility(index)).collect();

        let mut violations = Vec::with_capacity(historical_violations + facility_count);

        for seed_facility in &facilities {
            if seed_facility.facility.is_over_capacity(seed_facility.current_count) {
                violations.push(self.generate_active_violation(seed_facility, now));
            }
        }

        if !facilities.is_empty() {
            for _ in 0..historical_violations {
                // Squaring skews picks toward the first facilities
                let pick = self.rng.gen::<f64>().powi(2);
                let index = ((pick * facilities.len() as f64) as usize).min(facilities.len() - 1);
                violations.push(self.generate_resolved_violation(&facilities[index].facility, now));
            }
        }

        SeedData { generated_at: Some(now), facilities, violations }
    }

    fn generate_facility(&mut self, index: usize) -> SeedFacility {
        let base_name = FACILITY_NAMES[index % FACILITY_NAMES.len()];
        let name = match index / FACILITY_NAMES.len() {
            0 => base_name.to_string(),
            round => format!("{} {}", base_name, round + 1),
        };

        let operator = OPERATORS.choose(&mut self.rng).copied().unwrap_or(OPERATORS[0]);
        let zone = ZONES[index % ZONES.len()];
        let capacity = self.rng.gen_range(5..=30) * 10;
        let rate = PENALTY_RATES.choose(&mut self.rng).copied().unwrap_or(PENALTY_RATES[0]);
        let latitude = self.rng.gen_range(28.50..28.75);
        let longitude = self.rng.gen_range(77.05..77.30);

        let mut id_bytes = [0u8; 16];
        self.rng.fill(&mut id_bytes);

        let facility = Facility::new(name, operator, capacity, rate)
            .with_id(FacilityId::from_bytes(id_bytes))
            .with_zone(zone)
            .with_coordinates(latitude, longitude);

        let load = self.rng.gen_range(0.55..1.05);
        let current_count = (capacity as f64 * load).round() as u32;

        SeedFacility { facility, current_count }
    }

    fn generate_active_violation(&mut self, seed_facility: &SeedFacility, now: DateTime<Utc>) -> Violation {
        let facility = &seed_facility.facility;
        let started_at = now - Duration::minutes(self.rng.gen_range(5..=50));
        let peak = seed_facility.current_count + self.rng.gen_range(0..=5);

        let mut violation = Violation::open(facility, peak, started_at);
        let captures = self.rng.gen_range(1..=2);
        violation.evidence = self.generate_evidence(facility, peak, started_at, now, captures);
        violation
    }

    fn generate_resolved_violation(&mut self, facility: &Facility, now: DateTime<Utc>) -> Violation {
        let started_at = now - Duration::minutes(self.rng.gen_range(300..=30 * 24 * 60));
        let ended_at = started_at + Duration::minutes(self.rng.gen_range(15..=240));
        let max_extra = (facility.capacity / 4).max(1);
        let peak = facility.capacity + self.rng.gen_range(1..=max_extra);

        let mut violation = Violation::resolved(facility, peak, started_at, ended_at);
        let captures = self.rng.gen_range(0..=2);
        violation.evidence = self.generate_evidence(facility, peak, started_at, ended_at, captures);
        violation
    }

    fn generate_evidence(
        &mut self,
        facility: &Facility,
        peak: u32,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
        captures: usize,
    ) -> Vec<Evidence> {
        let span = (until - from).num_seconds().max(1);
        let mut evidence: Vec<Evidence> = (0..captures)
            .map(|_| {
                let captured_at = from + Duration::seconds(self.rng.gen_range(0..span));
                let camera = format!("CAM-{:02}", self.rng.gen_range(1..=24));
                let section = LOT_SECTIONS.choose(&mut self.rng).copied().unwrap_or(LOT_SECTIONS[0]);
                let count = self.rng.gen_range(facility.capacity + 1..=peak.max(facility.capacity + 1));
                Evidence::capture(captured_at, count, EvidenceMetadata::new(camera, section))
            })
            .collect();
        evidence.sort_by_key(|e| e.captured_at);
        evidence
    }
}

impl Default for BaselineGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::ViolationLedger;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 20, 18, 0, 0).unwrap()
    }

    #[test]
    fn test_generated_baseline_is_valid() {
        let seed = BaselineGenerator::with_seed(42).generate(8, 40, now());

        assert_eq!(seed.facilities.len(), 8);
        assert!(seed.violations.len() >= 40);
        assert!(seed.validate().is_ok());
    }

    #[test]
    fn test_over_capacity_facilities_have_active_violation() {
        let seed = BaselineGenerator::with_seed(7).generate(12, 10, now());
        let ledger = ViolationLedger::from_violations(seed.violations.clone()).unwrap();

        for entry in &seed.facilities {
            if entry.facility.is_over_capacity(entry.current_count) {
                assert!(ledger.active_for(entry.facility.id).is_some());
            }
        }
    }

    #[test]
    fn test_historical_violations_are_in_the_past() {
        let seed = BaselineGenerator::with_seed(9).generate(6, 30, now());
        for violation in seed.violations.iter().filter(|v| !v.is_active()) {
            let ended = violation.ended_at.unwrap();
            assert!(ended < now());
            assert!(violation.started_at >= now() - Duration::days(30));
            assert!(violation.penalty_amount > 0 || violation.duration_minutes < 60);
            assert!(violation.evidence.iter().all(|e| e.verify_integrity()));
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = BaselineGenerator::with_seed(5).generate(5, 10, now());
        let b = BaselineGenerator::with_seed(5).generate(5, 10, now());

        let ids_a: Vec<FacilityId> = a.facilities.iter().map(|f| f.facility.id).collect();
        let ids_b: Vec<FacilityId> = b.facilities.iter().map(|f| f.facility.id).collect();
        assert_eq!(ids_a, ids_b);
        assert_eq!(a.facilities[0].current_count, b.facilities[0].current_count);
    }

    #[test]
    fn test_names_stay_unique_beyond_catalog() {
        let seed = BaselineGenerator::with_seed(1).generate(30, 0, now());
        let mut names: Vec<&str> = seed.facilities.iter().map(|f| f.facility.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 30);
    }
}
