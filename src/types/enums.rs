//! Enumeration types for the compliance monitor
//!
//! Lifecycle status of violations, compliance status of facilities, simulation
//! scenarios and CLI output formats.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a capacity violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationStatus {
    /// Occupancy is still above the authorized capacity
    Active,
    /// Occupancy returned to or below capacity and the penalty is fixed
    Resolved,
}

impl fmt::Display for ViolationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationStatus::Active => write!(f, "active"),
            ViolationStatus::Resolved => write!(f, "resolved"),
        }
    }
}

impl FromStr for ViolationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" | "open" => Ok(ViolationStatus::Active),
            "resolved" | "closed" => Ok(ViolationStatus::Resolved),
            _ => Err(format!("Unknown violation status: {}", s)),
        }
    }
}

/// Compliance status of a facility at the time of a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    /// Within authorized capacity and no open violation
    Compliant,
    /// Over capacity, or an active violation is still open
    Violating,
}

impl ComplianceStatus {
    /// Whether this status represents a breach
    pub fn is_violating(&self) -> bool {
        matches!(self, ComplianceStatus::Violating)
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComplianceStatus::Compliant => write!(f, "compliant"),
            ComplianceStatus::Violating => write!(f, "violating"),
        }
    }
}

/// Synthetic load scenarios for simulation mode
///
/// Every scenario draws an integer occupancy delta uniformly from its range.
/// All ranges have a positive mean so breaches become more likely over time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationScenario {
    /// Ordinary daytime fluctuation
    #[default]
    Standard,
    /// Commuter peak with steadier inflow
    RushHour,
    /// Stadium or festival style surge
    EventSurge,
}

impl SimulationScenario {
    /// All scenarios, in catalog order
    pub const ALL: [SimulationScenario; 3] = [
        SimulationScenario::Standard,
        SimulationScenario::RushHour,
        SimulationScenario::EventSurge,
    ];

    /// Inclusive range of the per-tick occupancy delta
    pub fn delta_range(&self) -> (i64, i64) {
        match self {
            SimulationScenario::Standard => (-3, 7),
            SimulationScenario::RushHour => (-2, 9),
            SimulationScenario::EventSurge => (-1, 12),
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            SimulationScenario::Standard => "Standard Operations",
            SimulationScenario::RushHour => "Rush Hour",
            SimulationScenario::EventSurge => "Event Surge",
        }
    }

    /// Short description shown by scenario pickers
    pub fn description(&self) -> &'static str {
        match self {
            SimulationScenario::Standard => {
                "Mixed arrivals and departures with a mild upward drift"
            }
            SimulationScenario::RushHour => "Sustained inflow during commuter peaks",
            SimulationScenario::EventSurge => {
                "Large inflow around a public event, breaches escalate quickly"
            }
        }
    }
}

impl fmt::Display for SimulationScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationScenario::Standard => write!(f, "standard"),
            SimulationScenario::RushHour => write!(f, "rush_hour"),
            SimulationScenario::EventSurge => write!(f, "event_surge"),
        }
    }
}

impl FromStr for SimulationScenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "standard" | "normal" => Ok(SimulationScenario::Standard),
            "rush_hour" | "rushhour" | "peak" => Ok(SimulationScenario::RushHour),
            "event_surge" | "eventsurge" | "event" | "surge" => Ok(SimulationScenario::EventSurge),
            _ => Err(format!("Unknown simulation scenario: {}", s)),
        }
    }
}

/// Output formats for the command line driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Pretty-printed JSON snapshots
    Json,
    /// Plain text summary tables
    Text,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Text => write!(f, "text"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "text" | "txt" => Ok(OutputFormat::Text),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}
