//! Per-facility status projection
//!
//! Projection is a pure function of a facility, its current count, the ledger
//! and the current time. It never mutates state.

use crate::facility::{Facility, FacilityRegistry};
use crate::ledger::{Violation, ViolationLedger};
use crate::projection::{synthesize_history, CountHistoryPoint};
use crate::simulation::{MonitorError, MonitorResult};
use crate::types::{ComplianceStatus, FacilityId, MonitorConfig, ViolationId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Options controlling the history series attached to each status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionOptions {
    /// Number of points in the history series
    pub history_points: usize,
    /// Minutes between points
    pub history_step_minutes: i64,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self { history_points: 25, history_step_minutes: 60 }
    }
}

impl From<&MonitorConfig> for ProjectionOptions {
    fn from(config: &MonitorConfig) -> Self {
        Self {
            history_points: config.history_points,
            history_step_minutes: config.history_step_minutes,
        }
    }
}

/// Compact view of a facility's active violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveViolationSummary {
    /// Violation identifier
    pub id: ViolationId,
    /// Facility identifier
    pub facility_id: FacilityId,
    /// When the violation started
    pub started_at: DateTime<Utc>,
    /// Highest excess so far
    pub max_excess: u32,
    /// Excess at the current count, zero when back under capacity
    pub current_excess: u32,
    /// Minutes elapsed since the start
    pub duration_minutes: u64,
}

impl ActiveViolationSummary {
    /// Summarize an active violation at the given count and time
    pub fn from_violation(violation: &Violation, current_count: u32, now: DateTime<Utc>) -> Self {
        Self {
            id: violation.id,
            facility_id: violation.facility_id,
            started_at: violation.started_at,
            max_excess: violation.max_excess,
            current_excess: violation.excess_at(current_count),
            duration_minutes: violation.current_duration_minutes(now),
        }
    }
}

/// Derived, read-only status of a facility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotStatus {
    /// Facility descriptor
    #[serde(flatten)]
    pub facility: Facility,
    /// Current vehicle count
    pub current_count: u32,
    /// Count as a percentage of capacity
    pub utilization_percent: f64,
    /// Compliance status
    pub status: ComplianceStatus,
    /// Active violation, when one is open
    pub active_violation: Option<ActiveViolationSummary>,
    /// Illustrative count history, oldest first
    pub count_history: Vec<CountHistoryPoint>,
}

/// Project the status of one facility
pub fn project(
    facility: &Facility,
    current_count: u32,
    ledger: &ViolationLedger,
    now: DateTime<Utc>,
    options: &ProjectionOptions,
) -> LotStatus {
    let active = ledger.active_for(facility.id);

    let status = if is_violating(facility, current_count, ledger) {
        ComplianceStatus::Violating
    } else {
        ComplianceStatus::Compliant
    };

    let count_history = synthesize_history(
        facility,
        status,
        now,
        options.history_points,
        options.history_step_minutes,
    );

    LotStatus {
        facility: facility.clone(),
        current_count,
        utilization_percent: facility.utilization_for(current_count),
        status,
        active_violation: active.map(|v| ActiveViolationSummary::from_violation(v, current_count, now)),
        count_history,
    }
}

/// Project every facility in registry order
pub fn project_all(
    registry: &FacilityRegistry,
    counts: &HashMap<FacilityId, u32>,
    ledger: &ViolationLedger,
    now: DateTime<Utc>,
    options: &ProjectionOptions,
) -> MonitorResult<Vec<LotStatus>> {
    registry
        .list()
        .iter()
        .map(|facility| {
            let count = counts.get(&facility.id).copied().ok_or_else(|| {
                MonitorError::invalid_state(format!("No count tracked for facility {}", facility.id))
            })?;
            Ok(project(facility, count, ledger, now, options))
        })
        .collect()
}

/// Whether a facility counts as violating under the projection's rule
pub fn is_violating(facility: &Facility, current_count: u32, ledger: &ViolationLedger) -> bool {
    ledger.active_for(facility.id).is_some() || facility.is_over_capacity(current_count)
}
