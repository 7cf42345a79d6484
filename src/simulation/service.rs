//! Async query service
//!
//! Wraps a [`ComplianceMonitor`] for async callers and adds a configurable
//! delay before each call, mimicking a remote backend. The delay is awaited
//! before the monitor is touched, so it never holds the state lock.

use crate::ledger::{Evidence, Violation, ViolationFilter};
use crate::projection::LotStatus;
use crate::simulation::{
    AggregateStats, ChronicOffender, ComplianceMonitor, HeatmapCell, MonitorResult, SimulationState,
};
use crate::types::{SimulationScenario, ViolationId};
use std::time::Duration;

/// Async front end over the monitor
#[derive(Debug, Clone)]
pub struct MonitorService {
    monitor: ComplianceMonitor,
    latency: Duration,
}

impl MonitorService {
    /// Service using the latency from the monitor's configuration
    pub fn new(monitor: ComplianceMonitor) -> Self {
        let latency = monitor.config().simulated_latency();
        Self { monitor, latency }
    }

    /// Service with an explicit latency
    pub fn with_latency(monitor: ComplianceMonitor, latency: Duration) -> Self {
        Self { monitor, latency }
    }

    /// Underlying monitor
    pub fn monitor(&self) -> &ComplianceMonitor {
        &self.monitor
    }

    /// Configured per-call latency
    pub fn latency(&self) -> Duration {
        self.latency
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    /// Status of every facility
    pub async fn lots(&self) -> MonitorResult<Vec<LotStatus>> {
        self.simulate_latency().await;
        self.monitor.get_facilities_with_status()
    }

    /// Violations matching an optional filter
    pub async fn violations(&self, filter: Option<ViolationFilter>) -> MonitorResult<Vec<Violation>> {
        self.simulate_latency().await;
        self.monitor.get_violations(filter.as_ref())
    }

    /// A single violation
    pub async fn violation(&self, id: ViolationId) -> MonitorResult<Option<Violation>> {
        self.simulate_latency().await;
        self.monitor.get_violation(id)
    }

    /// Dashboard statistics
    pub async fn stats(&self) -> MonitorResult<AggregateStats> {
        self.simulate_latency().await;
        self.monitor.get_aggregate_stats()
    }

    /// Simulation lifecycle state
    pub async fn simulation_state(&self) -> MonitorResult<SimulationState> {
        self.simulate_latency().await;
        self.monitor.get_simulation_state()
    }

    /// Chronic offender report
    pub async fn chronic_offenders(&self) -> MonitorResult<Vec<ChronicOffender>> {
        self.simulate_latency().await;
        self.monitor.get_chronic_offenders()
    }

    /// Violation heatmap
    pub async fn heatmap(&self) -> MonitorResult<Vec<HeatmapCell>> {
        self.simulate_latency().await;
        self.monitor.get_violation_heatmap()
    }

    /// Start a simulation run
    pub async fn start_simulation(&self, scenario: SimulationScenario) -> MonitorResult<SimulationState> {
        self.simulate_latency().await;
        self.monitor.start_simulation(scenario)
    }

    /// Stop the simulation
    pub async fn stop_simulation(&self) -> MonitorResult<SimulationState> {
        self.simulate_latency().await;
        self.monitor.stop_simulation()
    }

    /// Attach evidence to a violation
    pub async fn append_evidence(&self, id: ViolationId, evidence: Evidence) -> MonitorResult<()> {
        self.simulate_latency().await;
        self.monitor.append_evidence(id, evidence)
    }
}
