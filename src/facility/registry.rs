//! Facility registry and lookup
//!
//! The registry holds the fixed, ordered set of monitored facilities with an
//! id index for constant-time lookup. It is built once at load and shared
//! read-only afterwards.

use crate::facility::Facility;
use crate::simulation::{MonitorError, MonitorResult};
use crate::types::FacilityId;
use serde::Serialize;
use std::collections::HashMap;

/// Ordered collection of facilities with lookup capabilities
#[derive(Debug, Clone, Serialize)]
pub struct FacilityRegistry {
    /// All facilities, in load order
    facilities: Vec<Facility>,
    /// Quick lookup map from facility ID to index
    #[serde(skip)]
    index: HashMap<FacilityId, usize>,
}

impl FacilityRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self { facilities: Vec::new(), index: HashMap::new() }
    }

    /// Build a registry from facilities, rejecting invalid or duplicate entries
    pub fn from_facilities(facilities: Vec<Facility>) -> MonitorResult<Self> {
        let mut registry = Self::new();
        for facility in facilities {
            registry.add_facility(facility)?;
        }
        Ok(registry)
    }

    fn add_facility(&mut self, facility: Facility) -> MonitorResult<()> {
        facility.validate().map_err(MonitorError::seed_data)?;

        if self.index.contains_key(&facility.id) {
            return Err(MonitorError::seed_data(format!(
                "Duplicate facility id {}",
                facility.id
            )));
        }

        self.index.insert(facility.id, self.facilities.len());
        self.facilities.push(facility);
        Ok(())
    }

    /// All facilities, in load order
    pub fn list(&self) -> &[Facility] {
        &self.facilities
    }

    /// Get a facility by ID
    pub fn get(&self, id: FacilityId) -> Option<&Facility> {
        self.index.get(&id).and_then(|&idx| self.facilities.get(idx))
    }

    /// Get a facility by ID, failing with `NotFound` when it is unknown
    pub fn require(&self, id: FacilityId) -> MonitorResult<&Facility> {
        self.get(id).ok_or_else(|| MonitorError::not_found("facility", id))
    }

    /// Check if a facility exists in the registry
    pub fn contains(&self, id: FacilityId) -> bool {
        self.index.contains_key(&id)
    }

    /// Number of facilities
    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    /// Whether the registry holds no facilities
    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }

    /// Sum of authorized capacity across all facilities
    pub fn total_capacity(&self) -> u64 {
        self.facilities.iter().map(|f| f.capacity as u64).sum()
    }

    /// Distinct operators, sorted by name
    pub fn operators(&self) -> Vec<&str> {
        let mut operators: Vec<&str> = self.facilities.iter().map(|f| f.operator.as_str()).collect();
        operators.sort_unstable();
        operators.dedup();
        operators
    }

    /// Validate the registry as a whole
    pub fn validate(&self) -> Result<(), String> {
        if self.facilities.is_empty() {
            return Err("Registry must have at least one facility".to_string());
        }

        for facility in &self.facilities {
            facility
                .validate()
                .map_err(|e| format!("Facility {} validation failed: {}", facility.id, e))?;
        }

        Ok(())
    }
}

impl Default for FacilityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_facilities() -> Vec<Facility> {
        vec![
            Facility::new("Sarojini Nagar", "Delhi Parkways", 120, 40.0),
            Facility::new("Lajpat Nagar", "Delhi Parkways", 80, 30.0),
            Facility::new("Karol Bagh", "Capital Lots", 200, 60.0),
        ]
    }

    #[test]
    fn test_registry_creation() {
        let registry = FacilityRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.validate().is_err());
    }

    #[test]
    fn test_registry_lookup_preserves_order() {
        let facilities = sample_facilities();
        let second_id = facilities[1].id;
        let registry = FacilityRegistry::from_facilities(facilities).unwrap();

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.list()[0].name, "Sarojini Nagar");
        assert_eq!(registry.list()[2].name, "Karol Bagh");
        assert_eq!(registry.get(second_id).unwrap().name, "Lajpat Nagar");
        assert!(registry.contains(second_id));
        assert_eq!(registry.total_capacity(), 400);
        assert_eq!(registry.operators(), vec!["Capital Lots", "Delhi Parkways"]);
        assert!(registry.validate().is_ok());
    }

    #[test]
    fn test_unknown_facility_is_absent() {
        let registry = FacilityRegistry::from_facilities(sample_facilities()).unwrap();
        let unknown = FacilityId::new();

        assert!(registry.get(unknown).is_none());
        let error = registry.require(unknown).unwrap_err();
        assert!(error.is_not_found());
    }

    #[test]
    fn test_duplicate_and_invalid_facilities_rejected() {
        let facility = Facility::new("Lot", "Op", 10, 1.0);
        let duplicate = facility.clone();
        assert!(FacilityRegistry::from_facilities(vec![facility, duplicate]).is_err());

        let zero_capacity = Facility::new("Lot", "Op", 0, 1.0);
        assert!(FacilityRegistry::from_facilities(vec![zero_capacity]).is_err());
    }
}
