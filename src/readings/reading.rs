//! Occupancy readings

use crate::types::FacilityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A vehicle count observed at a facility at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyReading {
    /// Facility the count belongs to
    pub facility_id: FacilityId,
    /// Vehicles present
    pub vehicle_count: u32,
    /// When the count was taken
    pub observed_at: DateTime<Utc>,
}

impl OccupancyReading {
    /// Create a new reading
    pub fn new(facility_id: FacilityId, vehicle_count: u32, observed_at: DateTime<Utc>) -> Self {
        Self { facility_id, vehicle_count, observed_at }
    }
}
