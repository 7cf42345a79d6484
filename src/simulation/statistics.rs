//! Aggregate statistics and reports
//!
//! Historical counters are computed once from the baseline ledger when it is
//! loaded and stay fixed afterwards. Live figures (active violations and the
//! compliant/violating split) are recomputed from current state on demand.

use crate::facility::FacilityRegistry;
use crate::ledger::{Violation, ViolationLedger};
use crate::projection::is_violating;
use crate::types::FacilityId;
use chrono::{DateTime, Datelike, Duration, NaiveTime, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Violation counts and penalty totals fixed at baseline load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalCounters {
    /// Violations started on the current UTC day
    pub violations_today: usize,
    /// Violations started since Monday 00:00 UTC of the current week
    pub violations_this_week: usize,
    /// Violations started in the current UTC calendar month
    pub violations_this_month: usize,
    /// Sum of penalties over resolved violations
    pub total_penalties_assessed: u64,
}

impl HistoricalCounters {
    /// Count violations relative to `now`
    pub fn compute<'a>(violations: impl IntoIterator<Item = &'a Violation>, now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let week_start = today - Duration::days(now.weekday().num_days_from_monday() as i64);
        let week_start = week_start.and_time(NaiveTime::MIN).and_utc();

        let mut counters = Self::default();
        for violation in violations {
            let started = violation.started_at;
            if started.date_naive() == today {
                counters.violations_today += 1;
            }
            if started >= week_start && started <= now {
                counters.violations_this_week += 1;
            }
            if started.year() == now.year() && started.month() == now.month() {
                counters.violations_this_month += 1;
            }
            counters.total_penalties_assessed += violation.penalty_amount;
        }
        counters
    }
}

/// Dashboard-level summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Number of monitored facilities
    pub total_facilities: usize,
    /// Sum of authorized capacity
    pub total_capacity: u64,
    /// Violations started today (baseline)
    pub violations_today: usize,
    /// Violations started this week (baseline)
    pub violations_this_week: usize,
    /// Violations started this month (baseline)
    pub violations_this_month: usize,
    /// Penalties assessed (baseline)
    pub total_penalties_assessed: u64,
    /// Currently active violations
    pub active_violations: usize,
    /// Facilities with no active violation and not over capacity
    pub facilities_in_compliance: usize,
    /// Facilities with an active violation or over capacity
    pub facilities_violating: usize,
}

impl AggregateStats {
    /// Combine fixed historical counters with live facility state
    pub fn compute(
        historical: &HistoricalCounters,
        registry: &FacilityRegistry,
        counts: &HashMap<FacilityId, u32>,
        ledger: &ViolationLedger,
    ) -> Self {
        let facilities_violating = registry
            .list()
            .iter()
            .filter(|f| is_violating(f, counts.get(&f.id).copied().unwrap_or(0), ledger))
            .count();

        Self {
            total_facilities: registry.len(),
            total_capacity: registry.total_capacity(),
            violations_today: historical.violations_today,
            violations_this_week: historical.violations_this_week,
            violations_this_month: historical.violations_this_month,
            total_penalties_assessed: historical.total_penalties_assessed,
            active_violations: ledger.active_count(),
            facilities_in_compliance: registry.len() - facilities_violating,
            facilities_violating,
        }
    }

    /// Share of facilities in compliance, as a percentage
    pub fn compliance_percentage(&self) -> f64 {
        if self.total_facilities == 0 {
            return 0.0;
        }
        self.facilities_in_compliance as f64 / self.total_facilities as f64 * 100.0
    }

    /// One-line summary
    pub fn summary(&self) -> String {
        format!(
            "{} facilities: {} compliant, {} violating, {} active violations",
            self.total_facilities,
            self.facilities_in_compliance,
            self.facilities_violating,
            self.active_violations
        )
    }
}

impl fmt::Display for AggregateStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Compliance Summary ===")?;
        writeln!(f, "Facilities:            {}", self.total_facilities)?;
        writeln!(f, "Total capacity:        {}", self.total_capacity)?;
        writeln!(
            f,
            "In compliance:         {} ({:.1}%)",
            self.facilities_in_compliance,
            self.compliance_percentage()
        )?;
        writeln!(f, "Violating:             {}", self.facilities_violating)?;
        writeln!(f, "Active violations:     {}", self.active_violations)?;
        writeln!(f, "Violations today:      {}", self.violations_today)?;
        writeln!(f, "Violations this week:  {}", self.violations_this_week)?;
        writeln!(f, "Violations this month: {}", self.violations_this_month)?;
        write!(f, "Penalties assessed:    {}", self.total_penalties_assessed)
    }
}

/// Operator with a record of repeated violations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChronicOffender {
    /// Operator name
    pub operator: String,
    /// Facilities of this operator that have violated, sorted by name
    pub facilities: Vec<String>,
    /// Number of violations, active ones included
    pub total_violations: usize,
    /// Hours spent in resolved violations
    pub total_violation_hours: f64,
    /// Penalties assessed on resolved violations
    pub total_penalties: u64,
}

/// Operators ranked by penalties, then violation count, then name
pub fn chronic_offenders(ledger: &ViolationLedger) -> Vec<ChronicOffender> {
    let mut by_operator: BTreeMap<&str, ChronicOffender> = BTreeMap::new();

    for violation in ledger.iter() {
        let entry = by_operator.entry(violation.operator.as_str()).or_insert_with(|| ChronicOffender {
            operator: violation.operator.clone(),
            facilities: Vec::new(),
            total_violations: 0,
            total_violation_hours: 0.0,
            total_penalties: 0,
        });

        entry.total_violations += 1;
        entry.total_violation_hours += violation.duration_minutes as f64 / 60.0;
        entry.total_penalties += violation.penalty_amount;
        if !entry.facilities.contains(&violation.facility_name) {
            entry.facilities.push(violation.facility_name.clone());
        }
    }

    let mut offenders: Vec<ChronicOffender> = by_operator
        .into_values()
        .map(|mut offender| {
            offender.facilities.sort();
            offender
        })
        .collect();

    offenders.sort_by(|a, b| {
        b.total_penalties
            .cmp(&a.total_penalties)
            .then_with(|| b.total_violations.cmp(&a.total_violations))
            .then_with(|| a.operator.cmp(&b.operator))
    });
    offenders
}

/// Violation starts bucketed by weekday and hour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapCell {
    /// Day of the week (UTC)
    pub weekday: Weekday,
    /// Hour of the day (UTC), 0-23
    pub hour: u32,
    /// Violations that started in this slot
    pub violation_count: usize,
}

/// Non-empty heatmap cells, Monday first, hours ascending
pub fn violation_heatmap(ledger: &ViolationLedger) -> Vec<HeatmapCell> {
    let mut buckets: BTreeMap<(u32, u32), (Weekday, usize)> = BTreeMap::new();

    for violation in ledger.iter() {
        let weekday = violation.started_at.weekday();
        let key = (weekday.num_days_from_monday(), violation.started_at.hour());
        buckets.entry(key).or_insert((weekday, 0)).1 += 1;
    }

    buckets
        .into_iter()
        .map(|((_, hour), (weekday, violation_count))| HeatmapCell { weekday, hour, violation_count })
        .collect()
}
