//! Tests for the simulation lifecycle
//!
//! No async runtime is running here, so the monitor never spawns a scheduler
//! and every tick is driven by hand.

use chrono::{Duration, Utc};
use parking_compliance_monitor::facility::{Facility, SeedData, SeedFacility};
use parking_compliance_monitor::ledger::{Violation, ViolationFilter};
use parking_compliance_monitor::simulation::{Baseline, ComplianceMonitor, SimulationState};
use parking_compliance_monitor::types::{FacilityId, MonitorConfig, SimulationScenario, ViolationStatus};
use std::collections::HashMap;

fn monitor_with(config: MonitorConfig) -> ComplianceMonitor {
    let now = Utc::now();
    let north = Facility::new("North Lot", "Gamma Parking", 100, 40.0);
    let south = Facility::new("South Lot", "Gamma Parking", 80, 25.0);
    let east = Facility::new("East Lot", "Delta Parking", 150, 60.0);

    let seed = SeedData {
        generated_at: Some(now),
        violations: vec![
            Violation::open(&north, 104, now - Duration::minutes(20)),
            Violation::resolved(&east, 170, now - Duration::days(4), now - Duration::days(4) + Duration::hours(1)),
        ],
        facilities: vec![
            SeedFacility { facility: north, current_count: 104 },
            SeedFacility { facility: south, current_count: 41 },
            SeedFacility { facility: east, current_count: 120 },
        ],
    };

    ComplianceMonitor::new(Baseline::from_seed(&seed, now).unwrap(), config).unwrap()
}

fn monitor() -> ComplianceMonitor {
    monitor_with(MonitorConfig { seed: Some(31), ..MonitorConfig::default() })
}

fn counts(monitor: &ComplianceMonitor) -> HashMap<FacilityId, u32> {
    monitor
        .get_facilities_with_status()
        .unwrap()
        .into_iter()
        .map(|s| (s.facility.id, s.current_count))
        .collect()
}

fn violation_summary(monitor: &ComplianceMonitor) -> Vec<(String, String, u32)> {
    let mut summary: Vec<_> = monitor
        .get_violations(None)
        .unwrap()
        .into_iter()
        .map(|v| (v.id.to_string(), v.status.to_string(), v.peak_count))
        .collect();
    summary.sort();
    summary
}

#[test]
fn test_stop_while_idle_is_noop() {
    let monitor = monitor();
    let before = counts(&monitor);

    let first = monitor.stop_simulation().unwrap();
    let second = monitor.stop_simulation().unwrap();

    assert_eq!(first, SimulationState::idle());
    assert_eq!(second, SimulationState::idle());
    assert_eq!(counts(&monitor), before);
}

#[test]
fn test_start_sets_running_state_and_loads_counts() {
    let monitor = monitor();
    let state = monitor.start_simulation(SimulationScenario::RushHour).unwrap();

    assert!(state.is_running);
    assert_eq!(state.scenario, Some(SimulationScenario::RushHour));
    assert!(state.started_at.is_some());
    assert_eq!(state.events_generated, 0);

    for status in monitor.get_facilities_with_status().unwrap() {
        let capacity = status.facility.capacity as f64;
        let count = status.current_count as f64;
        assert!(count >= (capacity * 0.9).round() && count <= (capacity * 1.2).round(), "{count}");
    }
}

#[test]
fn test_ticks_count_events() {
    let monitor = monitor();
    monitor.start_simulation(SimulationScenario::Standard).unwrap();

    let mut last = 0;
    for _ in 0..5 {
        let report = monitor.tick().unwrap().expect("running");
        assert_eq!(report.readings, 3);
        assert_eq!(report.transitions.len(), 3);

        let events = monitor.get_simulation_state().unwrap().events_generated;
        assert_eq!(events, last + 1);
        last = events;
    }
}

#[test]
fn test_stop_restores_baseline() {
    let monitor = monitor();
    let baseline_counts = counts(&monitor);
    let baseline_violations = violation_summary(&monitor);
    let baseline_stats = monitor.get_aggregate_stats().unwrap();

    monitor.start_simulation(SimulationScenario::EventSurge).unwrap();
    for _ in 0..25 {
        monitor.tick().unwrap();
    }
    assert_ne!(violation_summary(&monitor), baseline_violations);

    let state = monitor.stop_simulation().unwrap();
    assert_eq!(state, SimulationState::idle());
    assert_eq!(counts(&monitor), baseline_counts);
    assert_eq!(violation_summary(&monitor), baseline_violations);
    assert_eq!(monitor.get_aggregate_stats().unwrap(), baseline_stats);
}

#[test]
fn test_restart_resets_counter() {
    let monitor = monitor();
    monitor.start_simulation(SimulationScenario::Standard).unwrap();
    monitor.tick().unwrap();
    monitor.tick().unwrap();
    assert_eq!(monitor.get_simulation_state().unwrap().events_generated, 2);

    let restarted = monitor.start_simulation(SimulationScenario::EventSurge).unwrap();
    assert!(restarted.is_running);
    assert_eq!(restarted.scenario, Some(SimulationScenario::EventSurge));
    assert_eq!(restarted.events_generated, 0);
}

#[test]
fn test_seeded_runs_repeat() {
    let config = MonitorConfig { seed: Some(5), ..MonitorConfig::default() };
    let a = monitor_with(config.clone());
    let b = monitor_with(config);

    a.start_simulation(SimulationScenario::Standard).unwrap();
    b.start_simulation(SimulationScenario::Standard).unwrap();

    let counts_of = |m: &ComplianceMonitor| -> Vec<u32> {
        m.get_facilities_with_status().unwrap().iter().map(|s| s.current_count).collect()
    };

    assert_eq!(counts_of(&a), counts_of(&b));
    for _ in 0..10 {
        a.tick().unwrap();
        b.tick().unwrap();
        assert_eq!(counts_of(&a), counts_of(&b));
    }
}

#[test]
fn test_live_stats_while_running() {
    let monitor = monitor();
    let idle_stats = monitor.get_aggregate_stats().unwrap();

    monitor.start_simulation(SimulationScenario::EventSurge).unwrap();
    for _ in 0..30 {
        monitor.tick().unwrap();
    }

    let stats = monitor.get_aggregate_stats().unwrap();
    let active = monitor
        .get_violations(Some(&ViolationFilter::default().with_status(ViolationStatus::Active)))
        .unwrap();

    assert_eq!(stats.active_violations, active.len());
    assert_eq!(stats.facilities_in_compliance + stats.facilities_violating, 3);
    assert_eq!(stats.violations_this_month, idle_stats.violations_this_month);
    assert_eq!(stats.total_penalties_assessed, idle_stats.total_penalties_assessed);
}

#[test]
fn test_at_most_one_active_violation_per_facility() {
    let monitor = monitor();
    monitor.start_simulation(SimulationScenario::Standard).unwrap();

    for _ in 0..60 {
        monitor.tick().unwrap();

        let active = monitor
            .get_violations(Some(&ViolationFilter::default().with_status(ViolationStatus::Active)))
            .unwrap();
        let mut facilities: Vec<FacilityId> = active.iter().map(|v| v.facility_id).collect();
        let total = facilities.len();
        facilities.sort();
        facilities.dedup();
        assert_eq!(facilities.len(), total);

        for status in monitor.get_facilities_with_status().unwrap() {
            if status.active_violation.is_none() {
                assert!(status.current_count <= status.facility.capacity);
            }
        }
    }
}

#[test]
fn test_advancing_clock_extends_active_duration() {
    let monitor = monitor();
    monitor.start_simulation(SimulationScenario::Standard).unwrap();

    // The baseline's active violation is restored on start
    let status = monitor
        .get_facilities_with_status()
        .unwrap()
        .into_iter()
        .find(|s| s.active_violation.is_some())
        .expect("baseline active violation");
    let before = status.active_violation.unwrap().duration_minutes;
    assert!(before >= 20);

    monitor.advance_clock(Duration::minutes(90)).unwrap();
    let after = monitor
        .get_facility_status(status.facility.id)
        .unwrap()
        .unwrap()
        .active_violation
        .map(|s| s.duration_minutes)
        .unwrap_or_default();

    assert!(after >= before + 90, "{before} -> {after}");
}
