//! Violation records
//!
//! A violation is an episode during which a facility held more vehicles than
//! its authorized capacity. Records are opened, updated and resolved only by
//! the ledger; everything here is either construction or read-only helpers.

use crate::facility::Facility;
use crate::ledger::{compute_penalty, Evidence};
use crate::simulation::{MonitorError, MonitorResult};
use crate::types::{FacilityId, ViolationId, ViolationStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rule version stamped on violations opened by the live engine
pub const RULE_VERSION: &str = "capacity-v1";

/// A capacity violation episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Unique identifier for the violation
    pub id: ViolationId,
    /// Facility the violation belongs to
    pub facility_id: FacilityId,
    /// Facility name at the time the violation opened
    pub facility_name: String,
    /// Operator responsible at the time the violation opened
    pub operator: String,
    /// When the first over-capacity reading was observed
    pub started_at: DateTime<Utc>,
    /// When the violation was resolved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    /// Authorized capacity recorded when the violation opened
    pub authorized_capacity: u32,
    /// Highest vehicle count observed during the episode
    pub peak_count: u32,
    /// Highest excess over capacity observed during the episode
    pub max_excess: u32,
    /// Whole minutes since the start, as of the latest reading or the end
    pub duration_minutes: u64,
    /// Assessed penalty; zero while active
    pub penalty_amount: u64,
    /// Lifecycle status
    pub status: ViolationStatus,
    /// Rule set under which the violation was assessed
    #[serde(default = "default_rule_version")]
    pub rule_version: String,
    /// Evidence captured during the episode, in append order
    #[serde(default)]
    pub evidence: Vec<Evidence>,
}

fn default_rule_version() -> String {
    RULE_VERSION.to_string()
}

impl Violation {
    /// Open a new active violation from an over-capacity reading
    pub fn open(facility: &Facility, count: u32, at: DateTime<Utc>) -> Self {
        Self {
            id: ViolationId::new(),
            facility_id: facility.id,
            facility_name: facility.name.clone(),
            operator: facility.operator.clone(),
            started_at: at,
            ended_at: None,
            authorized_capacity: facility.capacity,
            peak_count: count,
            max_excess: facility.excess_for(count),
            duration_minutes: 0,
            penalty_amount: 0,
            status: ViolationStatus::Active,
            rule_version: default_rule_version(),
            evidence: Vec::new(),
        }
    }

    /// Build an already-resolved violation, computing duration and penalty
    pub fn resolved(
        facility: &Facility,
        peak_count: u32,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
    ) -> Self {
        let mut violation = Self::open(facility, peak_count, started_at);
        violation.resolve(ended_at, facility.penalty_rate_per_hour);
        violation
    }

    /// Whether the violation is still open
    pub fn is_active(&self) -> bool {
        self.status == ViolationStatus::Active
    }

    /// Excess over the recorded capacity for a given count
    pub fn excess_at(&self, count: u32) -> u32 {
        count.saturating_sub(self.authorized_capacity)
    }

    /// Elapsed whole minutes: running time while active, final duration once resolved
    pub fn current_duration_minutes(&self, now: DateTime<Utc>) -> u64 {
        match self.ended_at {
            Some(_) => self.duration_minutes,
            None => whole_minutes_between(self.started_at, now),
        }
    }

    /// Fold an over-capacity reading into the running maxima and duration
    pub(crate) fn observe(&mut self, count: u32, at: DateTime<Utc>) {
        self.peak_count = self.peak_count.max(count);
        self.max_excess = self.max_excess.max(self.excess_at(count));
        self.duration_minutes = self.duration_minutes.max(whole_minutes_between(self.started_at, at));
    }

    /// Close the violation, fixing its duration and penalty
    pub(crate) fn resolve(&mut self, at: DateTime<Utc>, rate_per_hour: f64) {
        let duration = whole_minutes_between(self.started_at, at);
        self.ended_at = Some(at);
        self.duration_minutes = duration;
        self.penalty_amount = compute_penalty(self.max_excess, duration, rate_per_hour);
        self.status = ViolationStatus::Resolved;
    }

    /// Check the record's internal consistency
    pub fn validate(&self) -> MonitorResult<()> {
        match (self.status, self.ended_at) {
            (ViolationStatus::Active, Some(_)) => {
                return Err(MonitorError::invalid_state(format!(
                    "Active violation {} has an end time",
                    self.id
                )));
            }
            (ViolationStatus::Resolved, None) => {
                return Err(MonitorError::invalid_state(format!(
                    "Resolved violation {} has no end time",
                    self.id
                )));
            }
            (ViolationStatus::Resolved, Some(ended_at)) if ended_at < self.started_at => {
                return Err(MonitorError::invalid_state(format!(
                    "Violation {} ends before it starts",
                    self.id
                )));
            }
            _ => {}
        }

        if self.is_active() && self.penalty_amount != 0 {
            return Err(MonitorError::invalid_state(format!(
                "Active violation {} carries a penalty",
                self.id
            )));
        }

        if let Some(ended_at) = self.ended_at {
            let expected = whole_minutes_between(self.started_at, ended_at);
            if self.duration_minutes != expected {
                return Err(MonitorError::invalid_state(format!(
                    "Violation {} lasts {} minutes but records {}",
                    self.id, expected, self.duration_minutes
                )));
            }
        }

        if self.max_excess == 0 || self.peak_count <= self.authorized_capacity {
            return Err(MonitorError::invalid_state(format!(
                "Violation {} never exceeded its capacity",
                self.id
            )));
        }

        if self.max_excess != self.peak_count - self.authorized_capacity {
            return Err(MonitorError::invalid_state(format!(
                "Violation {} peak count and max excess disagree",
                self.id
            )));
        }

        Ok(())
    }
}

fn whole_minutes_between(start: DateTime<Utc>, end: DateTime<Utc>) -> u64 {
    (end - start).num_minutes().max(0) as u64
}
