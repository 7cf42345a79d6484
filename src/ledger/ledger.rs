//! Violation ledger and lifecycle transitions
//!
//! The ledger owns every violation record and the per-facility index of the
//! currently active one. Each occupancy reading is applied through
//! [`ViolationLedger::apply_reading`], which performs exactly one of four
//! transitions:
//!
//! | active? | over capacity? | transition |
//! |---------|----------------|------------|
//! | no      | no             | unchanged  |
//! | no      | yes            | opened     |
//! | yes     | yes            | updated    |
//! | yes     | no             | resolved   |

use crate::facility::Facility;
use crate::ledger::{Evidence, Violation};
use crate::readings::OccupancyReading;
use crate::simulation::{MonitorError, MonitorResult};
use crate::types::{FacilityId, ViolationId, ViolationStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// Outcome of applying one reading to the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedgerTransition {
    /// Compliant reading with no active violation
    Unchanged,
    /// A new violation was opened
    Opened {
        /// The new violation
        violation_id: ViolationId,
    },
    /// The active violation absorbed another over-capacity reading
    Updated {
        /// The active violation
        violation_id: ViolationId,
    },
    /// The active violation was closed
    Resolved {
        /// The closed violation
        violation_id: ViolationId,
        /// Penalty assessed on resolution
        penalty_amount: u64,
    },
}

impl LedgerTransition {
    /// Violation touched by the transition, if any
    pub fn violation_id(&self) -> Option<ViolationId> {
        match self {
            LedgerTransition::Unchanged => None,
            LedgerTransition::Opened { violation_id }
            | LedgerTransition::Updated { violation_id }
            | LedgerTransition::Resolved { violation_id, .. } => Some(*violation_id),
        }
    }

    /// Whether the transition changed the ledger
    pub fn is_change(&self) -> bool {
        !matches!(self, LedgerTransition::Unchanged)
    }
}

/// Optional filters for violation queries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationFilter {
    /// Keep only violations with this status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ViolationStatus>,
    /// Keep only violations for this facility
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facility_id: Option<FacilityId>,
}

impl ViolationFilter {
    /// Filter by status
    pub fn with_status(mut self, status: ViolationStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filter by facility
    pub fn with_facility(mut self, facility_id: FacilityId) -> Self {
        self.facility_id = Some(facility_id);
        self
    }

    /// Whether a violation passes every set filter
    pub fn matches(&self, violation: &Violation) -> bool {
        self.status.map_or(true, |s| violation.status == s)
            && self.facility_id.map_or(true, |f| violation.facility_id == f)
    }
}

/// Store of all violations with an index of active ones per facility
#[derive(Debug, Clone, Default)]
pub struct ViolationLedger {
    records: HashMap<ViolationId, Violation>,
    active: HashMap<FacilityId, ViolationId>,
}

impl ViolationLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from existing records
    pub fn from_violations(violations: impl IntoIterator<Item = Violation>) -> MonitorResult<Self> {
        let mut ledger = Self::new();
        for violation in violations {
            ledger.insert(violation)?;
        }
        Ok(ledger)
    }

    /// Insert an existing record, keeping ids unique and at most one active per facility
    pub fn insert(&mut self, violation: Violation) -> MonitorResult<()> {
        violation.validate()?;

        if self.records.contains_key(&violation.id) {
            return Err(MonitorError::invalid_state(format!(
                "Duplicate violation id {}",
                violation.id
            )));
        }

        if violation.is_active() {
            if let Some(existing) = self.active.get(&violation.facility_id) {
                return Err(MonitorError::invalid_state(format!(
                    "Facility {} already has active violation {}",
                    violation.facility_id, existing
                )));
            }
            self.active.insert(violation.facility_id, violation.id);
        }

        self.records.insert(violation.id, violation);
        Ok(())
    }

    /// Apply one reading for `facility`, returning the transition taken
    pub fn apply_reading(
        &mut self,
        facility: &Facility,
        reading: &OccupancyReading,
    ) -> MonitorResult<LedgerTransition> {
        if reading.facility_id != facility.id {
            return Err(MonitorError::invalid_state(format!(
                "Reading for facility {} applied to facility {}",
                reading.facility_id, facility.id
            )));
        }

        if facility.capacity == 0 {
            return Err(MonitorError::invalid_state(format!(
                "Facility {} has no authorized capacity",
                facility.id
            )));
        }

        let over_capacity = facility.is_over_capacity(reading.vehicle_count);

        let Some(active_id) = self.active.get(&facility.id).copied() else {
            if !over_capacity {
                return Ok(LedgerTransition::Unchanged);
            }
            let violation = Violation::open(facility, reading.vehicle_count, reading.observed_at);
            let violation_id = violation.id;
            info!(
                facility = %facility.id,
                violation = %violation_id,
                count = reading.vehicle_count,
                excess = violation.max_excess,
                "Violation opened"
            );
            self.active.insert(facility.id, violation_id);
            self.records.insert(violation_id, violation);
            return Ok(LedgerTransition::Opened { violation_id });
        };

        let violation = self.records.get_mut(&active_id).ok_or_else(|| {
            MonitorError::invalid_state(format!(
                "Active index points at missing violation {active_id}"
            ))
        })?;

        if over_capacity {
            violation.observe(reading.vehicle_count, reading.observed_at);
            debug!(
                violation = %active_id,
                count = reading.vehicle_count,
                max_excess = violation.max_excess,
                duration_minutes = violation.duration_minutes,
                "Violation updated"
            );
            Ok(LedgerTransition::Updated { violation_id: active_id })
        } else {
            violation.resolve(reading.observed_at, facility.penalty_rate_per_hour);
            let penalty_amount = violation.penalty_amount;
            info!(
                facility = %facility.id,
                violation = %active_id,
                duration_minutes = violation.duration_minutes,
                penalty = penalty_amount,
                "Violation resolved"
            );
            self.active.remove(&facility.id);
            Ok(LedgerTransition::Resolved { violation_id: active_id, penalty_amount })
        }
    }

    /// Append evidence to an existing violation after checking its digest
    pub fn append_evidence(&mut self, id: ViolationId, evidence: Evidence) -> MonitorResult<()> {
        let violation = self.records.get_mut(&id).ok_or_else(|| MonitorError::not_found("violation", id))?;

        if !evidence.verify_integrity() {
            return Err(MonitorError::invalid_state(format!(
                "Evidence {} failed integrity verification",
                evidence.id
            )));
        }

        if violation.evidence.iter().any(|e| e.id == evidence.id) {
            return Err(MonitorError::invalid_state(format!(
                "Evidence {} is already attached to violation {}",
                evidence.id, id
            )));
        }

        violation.evidence.push(evidence);
        Ok(())
    }

    /// Look up a violation by ID
    pub fn get(&self, id: ViolationId) -> Option<&Violation> {
        self.records.get(&id)
    }

    /// Active violation for a facility, if any
    pub fn active_for(&self, facility_id: FacilityId) -> Option<&Violation> {
        self.active.get(&facility_id).and_then(|id| self.records.get(id))
    }

    /// Iterate over all records in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.records.values()
    }

    /// Matching violations, newest start first
    pub fn query(&self, filter: &ViolationFilter) -> Vec<Violation> {
        let mut matched: Vec<Violation> =
            self.records.values().filter(|v| filter.matches(v)).cloned().collect();
        matched.sort_by(|a, b| b.started_at.cmp(&a.started_at).then_with(|| a.id.cmp(&b.id)));
        matched
    }

    /// Total number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the ledger holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of currently active violations
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Check that the active index and the records agree
    pub fn check_invariants(&self) -> MonitorResult<()> {
        for (facility_id, violation_id) in &self.active {
            match self.records.get(violation_id) {
                Some(v) if v.is_active() && v.facility_id == *facility_id => {}
                _ => {
                    return Err(MonitorError::invalid_state(format!(
                        "Active index entry for facility {facility_id} is stale"
                    )));
                }
            }
        }

        let active_records = self.records.values().filter(|v| v.is_active()).count();
        if active_records != self.active.len() {
            return Err(MonitorError::invalid_state(format!(
                "{} active records but {} indexed",
                active_records,
                self.active.len()
            )));
        }

        Ok(())
    }
}
