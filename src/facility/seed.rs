//! Seed data loading
//!
//! Seed data is the static baseline the monitor starts from: facilities with
//! their starting counts and the historical violation ledger. It is read from
//! JSON or produced by [`BaselineGenerator`](crate::facility::BaselineGenerator).

use crate::facility::{Facility, FacilityRegistry};
use crate::ledger::{compute_penalty, Violation, ViolationLedger};
use crate::simulation::{MonitorError, MonitorResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A facility with its baseline vehicle count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedFacility {
    /// Facility descriptor
    #[serde(flatten)]
    pub facility: Facility,
    /// Vehicle count shown while no simulation is running
    pub current_count: u32,
}

/// Complete baseline dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedData {
    /// When the dataset was produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    /// Facilities in display order
    pub facilities: Vec<SeedFacility>,
    /// Historical and currently active violations
    #[serde(default)]
    pub violations: Vec<Violation>,
}

impl SeedData {
    /// Parse seed data from a JSON string
    pub fn from_json_str(json: &str) -> MonitorResult<Self> {
        let seed: SeedData = serde_json::from_str(json)?;
        Ok(seed)
    }

    /// Load seed data from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> MonitorResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MonitorError::seed_data(format!(
                "Seed data file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Write seed data to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> MonitorResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Build the facility registry described by the seed
    pub fn registry(&self) -> MonitorResult<FacilityRegistry> {
        FacilityRegistry::from_facilities(self.facilities.iter().map(|f| f.facility.clone()).collect())
    }

    /// Build the violation ledger described by the seed
    pub fn ledger(&self) -> MonitorResult<ViolationLedger> {
        ViolationLedger::from_violations(self.violations.iter().cloned())
            .map_err(|e| MonitorError::seed_data(format!("Invalid violation history: {e}")))
    }

    /// Validate facilities, violations and their cross references
    pub fn validate(&self) -> MonitorResult<()> {
        let registry = self.registry()?;
        registry.validate().map_err(MonitorError::seed_data)?;
        self.ledger()?;

        for violation in &self.violations {
            let facility = registry.get(violation.facility_id).ok_or_else(|| {
                MonitorError::seed_data(format!(
                    "Violation {} references unknown facility {}",
                    violation.id, violation.facility_id
                ))
            })?;

            if violation.authorized_capacity != facility.capacity {
                return Err(MonitorError::seed_data(format!(
                    "Violation {} records capacity {} but facility {} has {}",
                    violation.id, violation.authorized_capacity, facility.id, facility.capacity
                )));
            }

            if !violation.is_active() {
                let expected =
                    compute_penalty(violation.max_excess, violation.duration_minutes, facility.penalty_rate_per_hour);
                if violation.penalty_amount != expected {
                    return Err(MonitorError::seed_data(format!(
                        "Violation {} records penalty {} but its episode assesses {}",
                        violation.id, violation.penalty_amount, expected
                    )));
                }
            }

            if let Some(evidence) = violation.evidence.iter().find(|e| !e.verify_integrity()) {
                return Err(MonitorError::seed_data(format!(
                    "Evidence {} on violation {} failed integrity verification",
                    evidence.id, violation.id
                )));
            }
        }

        Ok(())
    }
}
