//! Simulation lifecycle state

use crate::types::SimulationScenario;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether the simulation is running, and since when
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Whether scheduled ticks are being applied
    pub is_running: bool,
    /// Scenario of the current run
    pub scenario: Option<SimulationScenario>,
    /// When the current run started
    pub started_at: Option<DateTime<Utc>>,
    /// Ticks applied during the current run
    pub events_generated: u64,
}

impl SimulationState {
    /// The idle state: not running, no scenario, nothing generated
    pub fn idle() -> Self {
        Self::default()
    }

    /// A freshly started run
    pub fn running(scenario: SimulationScenario, started_at: DateTime<Utc>) -> Self {
        Self { is_running: true, scenario: Some(scenario), started_at: Some(started_at), events_generated: 0 }
    }
}

/// Catalog entry describing a scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioInfo {
    /// Scenario identifier
    pub scenario: SimulationScenario,
    /// Human-readable name
    pub name: String,
    /// Short description
    pub description: String,
    /// Inclusive per-tick delta range
    pub delta_range: (i64, i64),
}

/// All scenarios with their descriptions
pub fn scenario_catalog() -> Vec<ScenarioInfo> {
    SimulationScenario::ALL
        .iter()
        .map(|&scenario| ScenarioInfo {
            scenario,
            name: scenario.display_name().to_string(),
            description: scenario.description().to_string(),
            delta_range: scenario.delta_range(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_state() {
        let state = SimulationState::idle();
        assert!(!state.is_running);
        assert!(state.scenario.is_none());
        assert!(state.started_at.is_none());
        assert_eq!(state.events_generated, 0);
    }

    #[test]
    fn test_running_state() {
        let now = Utc::now();
        let state = SimulationState::running(SimulationScenario::RushHour, now);
        assert!(state.is_running);
        assert_eq!(state.scenario, Some(SimulationScenario::RushHour));
        assert_eq!(state.started_at, Some(now));
    }

    #[test]
    fn test_catalog_lists_every_scenario() {
        let catalog = scenario_catalog();
        assert_eq!(catalog.len(), SimulationScenario::ALL.len());
        assert_eq!(catalog[0].delta_range, (-3, 7));
    }
}
