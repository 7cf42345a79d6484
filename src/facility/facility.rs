//! Parking facility descriptors
//!
//! A `Facility` is reference data: identity, operator, authorized capacity and
//! the hourly penalty rate. It is loaded once and never mutated afterwards; the
//! live vehicle count is tracked by the monitor, not by the facility.

use crate::types::FacilityId;
use serde::{Deserialize, Serialize};

/// A monitored parking facility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    /// Unique identifier for the facility
    pub id: FacilityId,
    /// Human-readable name of the facility
    pub name: String,
    /// Operator (contractor) responsible for the facility
    pub operator: String,
    /// Administrative zone the facility belongs to
    #[serde(default)]
    pub zone: String,
    /// Authorized vehicle capacity
    pub capacity: u32,
    /// Penalty charged per hour of violation, per vehicle of excess
    pub penalty_rate_per_hour: f64,
    /// Geographical coordinates (latitude, longitude) for congestion maps
    #[serde(default)]
    pub coordinates: (f64, f64),
}

impl Facility {
    /// Create a new facility with a fresh identifier
    pub fn new(
        name: impl Into<String>,
        operator: impl Into<String>,
        capacity: u32,
        penalty_rate_per_hour: f64,
    ) -> Self {
        Self {
            id: FacilityId::new(),
            name: name.into(),
            operator: operator.into(),
            zone: String::new(),
            capacity,
            penalty_rate_per_hour,
            coordinates: (0.0, 0.0),
        }
    }

    /// Set the identifier (used by seeded generators and loaders)
    pub fn with_id(mut self, id: FacilityId) -> Self {
        self.id = id;
        self
    }

    /// Set the administrative zone
    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = zone.into();
        self
    }

    /// Set the geographical coordinates
    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.coordinates = (latitude, longitude);
        self
    }

    /// Whether the given count breaches the authorized capacity
    pub fn is_over_capacity(&self, count: u32) -> bool {
        count > self.capacity
    }

    /// Vehicles above capacity for the given count (zero when compliant)
    pub fn excess_for(&self, count: u32) -> u32 {
        count.saturating_sub(self.capacity)
    }

    /// Occupancy as a percentage of capacity; exceeds 100 when over capacity
    pub fn utilization_for(&self, count: u32) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        count as f64 / self.capacity as f64 * 100.0
    }

    /// Validate the facility descriptor
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Facility name cannot be empty".to_string());
        }

        if self.capacity == 0 {
            return Err(format!("Facility {} must have a positive capacity", self.name));
        }

        if !self.penalty_rate_per_hour.is_finite() || self.penalty_rate_per_hour < 0.0 {
            return Err(format!(
                "Facility {} has an invalid penalty rate: {}",
                self.name, self.penalty_rate_per_hour
            ));
        }

        Ok(())
    }
}
