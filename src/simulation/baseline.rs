//! Static baseline state
//!
//! The baseline is what the monitor shows while no simulation is running and
//! what it resets to whenever a simulation starts or stops.

use crate::facility::{BaselineGenerator, FacilityRegistry, SeedData};
use crate::ledger::ViolationLedger;
use crate::simulation::{AggregateStats, HistoricalCounters, MonitorResult};
use crate::types::{FacilityId, MonitorConfig};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Facilities, counts and violation history loaded at startup
#[derive(Debug, Clone)]
pub struct Baseline {
    /// Monitored facilities
    pub registry: Arc<FacilityRegistry>,
    /// Baseline vehicle counts
    pub counts: HashMap<FacilityId, u32>,
    /// Baseline violation ledger
    pub ledger: ViolationLedger,
    /// Historical counters, computed at load time
    pub historical: HistoricalCounters,
    /// When the baseline was loaded
    pub loaded_at: DateTime<Utc>,
}

impl Baseline {
    /// Build a baseline from validated seed data
    pub fn from_seed(seed: &SeedData, now: DateTime<Utc>) -> MonitorResult<Self> {
        seed.validate()?;

        let registry = seed.registry()?;
        let ledger = seed.ledger()?;
        let counts = seed.facilities.iter().map(|f| (f.facility.id, f.current_count)).collect();
        let historical = HistoricalCounters::compute(ledger.iter(), now);

        info!(
            facilities = registry.len(),
            violations = ledger.len(),
            active = ledger.active_count(),
            "Baseline loaded"
        );

        Ok(Self { registry: Arc::new(registry), counts, ledger, historical, loaded_at: now })
    }

    /// Load the seed file named in the configuration, or generate a baseline
    pub fn load(config: &MonitorConfig, now: DateTime<Utc>) -> MonitorResult<Self> {
        let seed = match &config.seed_data {
            Some(path) => {
                info!(path = %path, "Loading seed data");
                SeedData::from_file(path)?
            }
            None => {
                let mut generator = match config.seed {
                    Some(seed) => BaselineGenerator::with_seed(seed),
                    None => BaselineGenerator::new(),
                };
                generator.generate(config.facility_count, config.historical_violations, now)
            }
        };

        Self::from_seed(&seed, now)
    }

    /// Aggregate statistics of the untouched baseline
    pub fn stats(&self) -> AggregateStats {
        AggregateStats::compute(&self.historical, &self.registry, &self.counts, &self.ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_baseline_counts_every_facility() {
        let config = MonitorConfig { seed: Some(17), facility_count: 6, ..MonitorConfig::default() };
        let baseline = Baseline::load(&config, Utc::now()).unwrap();

        assert_eq!(baseline.registry.len(), 6);
        for facility in baseline.registry.list() {
            assert!(baseline.counts.contains_key(&facility.id));
        }

        let stats = baseline.stats();
        assert_eq!(stats.total_facilities, 6);
        assert_eq!(stats.active_violations, baseline.ledger.active_count());
    }

    #[test]
    fn test_missing_seed_file_fails() {
        let config = MonitorConfig {
            seed_data: Some("/nonexistent/seed.json".to_string()),
            ..MonitorConfig::default()
        };
        assert!(Baseline::load(&config, Utc::now()).is_err());
    }
}
