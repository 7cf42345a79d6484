//! Compliance monitor facade
//!
//! [`ComplianceMonitor`] is the single entry point for reads and for the
//! simulation lifecycle. It is a cheap, cloneable handle over shared state
//! guarded by one `RwLock`:
//!
//! - reads take the read lock and return owned snapshots
//! - ticks, start and stop take the write lock, so every reader sees either
//!   all of a tick's effects or none of them
//!
//! While no simulation runs, facility counts come from the static baseline.
//! Starting or stopping a simulation resets the live counts and ledger to the
//! baseline.

use crate::facility::FacilityRegistry;
use crate::ledger::{Evidence, LedgerTransition, Violation, ViolationFilter, ViolationLedger};
use crate::projection::{project, project_all, LotStatus, ProjectionOptions};
use crate::readings::ReadingGenerator;
use crate::simulation::{
    chronic_offenders, violation_heatmap, AggregateStats, Baseline, ChronicOffender, HeatmapCell,
    MonitorError, MonitorResult, SimulationClock, SimulationState, TickScheduler,
};
use crate::types::{FacilityId, MonitorConfig, SimulationScenario, ViolationId};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};
use tokio::runtime::Handle;
use tracing::{debug, info, instrument};

/// Summary of one applied tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickReport {
    /// Timestamp stamped on every reading of the tick
    pub at: DateTime<Utc>,
    /// Readings applied, one per facility
    pub readings: usize,
    /// Violations opened
    pub opened: usize,
    /// Active violations updated
    pub updated: usize,
    /// Violations resolved
    pub resolved: usize,
    /// Penalties assessed by resolutions in this tick
    pub penalties_assessed: u64,
    /// Per-facility transitions, in registry order
    pub transitions: Vec<(FacilityId, LedgerTransition)>,
}

impl TickReport {
    fn new(at: DateTime<Utc>, capacity: usize) -> Self {
        Self {
            at,
            readings: 0,
            opened: 0,
            updated: 0,
            resolved: 0,
            penalties_assessed: 0,
            transitions: Vec::with_capacity(capacity),
        }
    }

    fn record(&mut self, facility_id: FacilityId, transition: LedgerTransition) {
        self.readings += 1;
        match transition {
            LedgerTransition::Unchanged => {}
            LedgerTransition::Opened { .. } => self.opened += 1,
            LedgerTransition::Updated { .. } => self.updated += 1,
            LedgerTransition::Resolved { penalty_amount, .. } => {
                self.resolved += 1;
                self.penalties_assessed += penalty_amount;
            }
        }
        self.transitions.push((facility_id, transition));
    }
}

#[derive(Debug)]
struct MonitorInner {
    baseline: Baseline,
    counts: HashMap<FacilityId, u32>,
    ledger: ViolationLedger,
    state: SimulationState,
    generator: ReadingGenerator,
    clock: SimulationClock,
    generation: u64,
    scheduler: Option<TickScheduler>,
}

impl MonitorInner {
    fn reset_to_baseline(&mut self) {
        self.counts = self.baseline.counts.clone();
        self.ledger = self.baseline.ledger.clone();
    }

    /// End the current run generation and cancel its scheduler
    fn halt(&mut self) {
        self.generation += 1;
        if let Some(scheduler) = self.scheduler.take() {
            scheduler.cancel();
        }
    }

    fn visible_counts(&self) -> &HashMap<FacilityId, u32> {
        if self.state.is_running {
            &self.counts
        } else {
            &self.baseline.counts
        }
    }

    /// Apply one reading per facility; state is replaced only if all succeed
    fn apply_tick(&mut self, registry: &FacilityRegistry) -> MonitorResult<TickReport> {
        let now = self.clock.now();
        let mut counts = self.counts.clone();
        let mut ledger = self.ledger.clone();
        let mut report = TickReport::new(now, registry.len());

        for facility in registry.list() {
            let current = counts.get(&facility.id).copied().ok_or_else(|| {
                MonitorError::invalid_state(format!("No count tracked for facility {}", facility.id))
            })?;
            let reading = self.generator.next_reading(facility, current, now);
            let transition = ledger.apply_reading(facility, &reading)?;
            counts.insert(facility.id, reading.vehicle_count);
            report.record(facility.id, transition);
        }
        ledger.check_invariants()?;

        self.counts = counts;
        self.ledger = ledger;
        self.state.events_generated += 1;
        Ok(report)
    }
}

/// Shared handle to the monitor state
#[derive(Debug, Clone)]
pub struct ComplianceMonitor {
    registry: Arc<FacilityRegistry>,
    config: Arc<MonitorConfig>,
    inner: Arc<RwLock<MonitorInner>>,
}

/// Non-owning handle held by the tick scheduler
#[derive(Debug, Clone)]
pub struct WeakMonitor {
    registry: Arc<FacilityRegistry>,
    config: Arc<MonitorConfig>,
    inner: Weak<RwLock<MonitorInner>>,
}

impl WeakMonitor {
    /// Recover a strong handle if the monitor is still alive
    pub fn upgrade(&self) -> Option<ComplianceMonitor> {
        self.inner.upgrade().map(|inner| ComplianceMonitor {
            registry: Arc::clone(&self.registry),
            config: Arc::clone(&self.config),
            inner,
        })
    }
}

impl ComplianceMonitor {
    /// Create a monitor over a loaded baseline
    pub fn new(baseline: Baseline, config: MonitorConfig) -> MonitorResult<Self> {
        config.validate()?;

        let registry = Arc::clone(&baseline.registry);
        let generator = ReadingGenerator::from_optional_seed(SimulationScenario::default(), config.seed);
        let inner = MonitorInner {
            counts: baseline.counts.clone(),
            ledger: baseline.ledger.clone(),
            baseline,
            state: SimulationState::idle(),
            generator,
            clock: SimulationClock::new(),
            generation: 0,
            scheduler: None,
        };

        info!(facilities = registry.len(), "Compliance monitor ready");
        Ok(Self { registry, config: Arc::new(config), inner: Arc::new(RwLock::new(inner)) })
    }

    /// Load the baseline described by `config` and create a monitor over it
    pub fn from_config(config: MonitorConfig) -> MonitorResult<Self> {
        config.validate()?;
        let baseline = Baseline::load(&config, Utc::now())?;
        Self::new(baseline, config)
    }

    fn read(&self) -> MonitorResult<RwLockReadGuard<'_, MonitorInner>> {
        self.inner.read().map_err(|_| MonitorError::invalid_state("Monitor state lock poisoned"))
    }

    fn write(&self) -> MonitorResult<RwLockWriteGuard<'_, MonitorInner>> {
        self.inner.write().map_err(|_| MonitorError::invalid_state("Monitor state lock poisoned"))
    }

    fn projection_options(&self) -> ProjectionOptions {
        ProjectionOptions::from(self.config.as_ref())
    }

    /// Monitored facilities
    pub fn registry(&self) -> &FacilityRegistry {
        &self.registry
    }

    /// Active configuration
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Non-owning handle for background tasks
    pub fn downgrade(&self) -> WeakMonitor {
        WeakMonitor {
            registry: Arc::clone(&self.registry),
            config: Arc::clone(&self.config),
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Current simulated time
    pub fn now(&self) -> MonitorResult<DateTime<Utc>> {
        Ok(self.read()?.clock.now())
    }

    /// Status of every facility, in registry order
    pub fn get_facilities_with_status(&self) -> MonitorResult<Vec<LotStatus>> {
        let inner = self.read()?;
        project_all(
            &self.registry,
            inner.visible_counts(),
            &inner.ledger,
            inner.clock.now(),
            &self.projection_options(),
        )
    }

    /// Status of one facility, `None` when the id is unknown
    pub fn get_facility_status(&self, id: FacilityId) -> MonitorResult<Option<LotStatus>> {
        let Some(facility) = self.registry.get(id) else {
            return Ok(None);
        };
        let inner = self.read()?;
        let count = inner.visible_counts().get(&id).copied().ok_or_else(|| {
            MonitorError::invalid_state(format!("No count tracked for facility {id}"))
        })?;
        Ok(Some(project(facility, count, &inner.ledger, inner.clock.now(), &self.projection_options())))
    }

    /// Violations matching `filter`, newest start first
    pub fn get_violations(&self, filter: Option<&ViolationFilter>) -> MonitorResult<Vec<Violation>> {
        let inner = self.read()?;
        let all = ViolationFilter::default();
        Ok(inner.ledger.query(filter.unwrap_or(&all)))
    }

    /// A single violation, `None` when the id is unknown
    pub fn get_violation(&self, id: ViolationId) -> MonitorResult<Option<Violation>> {
        Ok(self.read()?.ledger.get(id).cloned())
    }

    /// Dashboard statistics
    ///
    /// Historical counters always come from the baseline. While a simulation
    /// runs, the active and compliance figures reflect live state.
    pub fn get_aggregate_stats(&self) -> MonitorResult<AggregateStats> {
        let inner = self.read()?;
        if !inner.state.is_running {
            return Ok(inner.baseline.stats());
        }
        Ok(AggregateStats::compute(&inner.baseline.historical, &self.registry, &inner.counts, &inner.ledger))
    }

    /// Lifecycle state of the simulation
    pub fn get_simulation_state(&self) -> MonitorResult<SimulationState> {
        Ok(self.read()?.state.clone())
    }

    /// Operators ranked by penalties and violation counts
    pub fn get_chronic_offenders(&self) -> MonitorResult<Vec<ChronicOffender>> {
        Ok(chronic_offenders(&self.read()?.ledger))
    }

    /// Violation starts bucketed by weekday and hour
    pub fn get_violation_heatmap(&self) -> MonitorResult<Vec<HeatmapCell>> {
        Ok(violation_heatmap(&self.read()?.ledger))
    }

    /// Start a simulation run, restarting any run in progress
    ///
    /// Live state is reset to the baseline and every facility is given a fresh
    /// starting count. When called inside a tokio runtime a tick scheduler is
    /// spawned on it; otherwise ticks must be driven through [`Self::tick`].
    #[instrument(skip(self))]
    pub fn start_simulation(&self, scenario: SimulationScenario) -> MonitorResult<SimulationState> {
        let mut inner = self.write()?;

        if inner.state.is_running {
            crate::monitor_event!(info, "Restarting simulation run");
            inner.halt();
        }

        inner.reset_to_baseline();
        inner.generator = ReadingGenerator::from_optional_seed(scenario, self.config.seed);

        let load_range = self.config.initial_load_range();
        for facility in self.registry.list() {
            let count = inner.generator.initial_count(facility, load_range);
            inner.counts.insert(facility.id, count);
        }

        let now = inner.clock.now();
        inner.generation += 1;
        inner.state = SimulationState::running(scenario, now);

        if let Ok(handle) = Handle::try_current() {
            let scheduler =
                TickScheduler::spawn(&handle, self.downgrade(), self.config.tick_interval(), inner.generation);
            inner.scheduler = Some(scheduler);
        } else {
            debug!("No async runtime available, ticks must be driven manually");
        }

        crate::monitor_event!(
            info,
            "Simulation started",
            generation = inner.generation,
            facilities = self.registry.len()
        );
        Ok(inner.state.clone())
    }

    /// Stop the simulation and restore the baseline; stopping while idle is a no-op
    pub fn stop_simulation(&self) -> MonitorResult<SimulationState> {
        let mut inner = self.write()?;
        let was_running = inner.state.is_running;

        inner.halt();
        inner.reset_to_baseline();
        inner.state = SimulationState::idle();

        if was_running {
            crate::monitor_event!(info, "Simulation stopped", generation = inner.generation);
        }
        Ok(inner.state.clone())
    }

    /// Apply one reading to every facility as a single atomic step
    ///
    /// Returns `None` without touching state when no simulation is running.
    pub fn tick(&self) -> MonitorResult<Option<TickReport>> {
        let mut inner = self.write()?;
        if !inner.state.is_running {
            return Ok(None);
        }
        inner.apply_tick(&self.registry).map(Some)
    }

    /// Tick on behalf of the scheduler serving `generation`
    ///
    /// Returns `None` once that run has ended.
    pub(crate) fn scheduled_tick(&self, generation: u64) -> MonitorResult<Option<TickReport>> {
        let mut inner = self.write()?;
        if inner.generation != generation || !inner.state.is_running {
            return Ok(None);
        }
        inner.apply_tick(&self.registry).map(Some)
    }

    /// Attach evidence to a violation after verifying its digest
    pub fn append_evidence(&self, id: ViolationId, evidence: Evidence) -> MonitorResult<()> {
        let mut inner = self.write()?;
        inner.ledger.append_evidence(id, evidence)?;
        debug!(violation = %id, "Evidence appended");
        Ok(())
    }

    /// Move the simulated clock forward
    pub fn advance_clock(&self, duration: Duration) -> MonitorResult<()> {
        self.write()?.clock.advance_by(duration);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facility::{Facility, SeedData, SeedFacility};

    fn monitor() -> ComplianceMonitor {
        let facility = Facility::new("Test Lot", "Test Operator", 100, 50.0);
        let seed = SeedData {
            generated_at: None,
            facilities: vec![SeedFacility { facility, current_count: 80 }],
            violations: Vec::new(),
        };
        let config = MonitorConfig { seed: Some(1), ..MonitorConfig::default() };
        ComplianceMonitor::new(Baseline::from_seed(&seed, Utc::now()).unwrap(), config).unwrap()
    }

    #[test]
    fn test_idle_reads_use_baseline() {
        let monitor = monitor();
        let statuses = monitor.get_facilities_with_status().unwrap();

        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].current_count, 80);
        assert!(!monitor.get_simulation_state().unwrap().is_running);
    }

    #[test]
    fn test_tick_is_noop_while_idle() {
        let monitor = monitor();
        assert_eq!(monitor.tick().unwrap(), None);
        assert_eq!(monitor.get_simulation_state().unwrap().events_generated, 0);

        monitor.start_simulation(SimulationScenario::Standard).unwrap();
        let report = monitor.tick().unwrap().unwrap();
        assert_eq!(report.readings, 1);
        assert_eq!(monitor.get_simulation_state().unwrap().events_generated, 1);
    }

    #[test]
    fn test_stale_generation_tick_is_ignored() {
        let monitor = monitor();
        monitor.start_simulation(SimulationScenario::Standard).unwrap();
        let generation = monitor.read().unwrap().generation;

        monitor.stop_simulation().unwrap();
        assert_eq!(monitor.scheduled_tick(generation).unwrap(), None);

        monitor.start_simulation(SimulationScenario::Standard).unwrap();
        assert_eq!(monitor.scheduled_tick(generation).unwrap(), None);
        assert_eq!(monitor.get_simulation_state().unwrap().events_generated, 0);
    }

    #[test]
    fn test_weak_handle_does_not_keep_monitor_alive() {
        let monitor = monitor();
        let weak = monitor.downgrade();
        assert!(weak.upgrade().is_some());
        drop(monitor);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_unknown_lookups_are_absent() {
        let monitor = monitor();
        assert!(monitor.get_violation(ViolationId::new()).unwrap().is_none());
        assert!(monitor.get_facility_status(FacilityId::new()).unwrap().is_none());

        let evidence = Evidence::capture(Utc::now(), 1, crate::ledger::EvidenceMetadata::new("c", "s"));
        assert!(monitor.append_evidence(ViolationId::new(), evidence).unwrap_err().is_not_found());
    }
}
