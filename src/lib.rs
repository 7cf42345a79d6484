//! Parking Compliance Monitor
//!
//! Occupancy monitoring and violation lifecycle engine for parking facilities.
//!
//! # Overview
//!
//! Each facility has an authorized capacity and an hourly penalty rate. Every
//! occupancy reading is compared against that capacity: the first reading over
//! capacity opens a violation, further over-capacity readings raise its peak,
//! and the first reading back at or under capacity resolves it and assesses a
//! penalty. A simulation mode feeds synthetic readings on a fixed cadence so
//! the whole lifecycle can be observed without live sensors.
//!
//! ## Key Features
//!
//! - **Violation Ledger**: at most one active violation per facility, peak tracking, penalties
//! - **Status Projection**: utilization, compliance status and history per facility
//! - **Simulation Mode**: scenario-driven readings with atomic, cancellable ticks
//! - **Reports**: aggregate statistics, chronic offenders and a weekday/hour heatmap
//! - **Evidence**: SHA-256 integrity hashes on captured evidence
//!
//! ## Quick Start
//!
//! ```rust
//! use parking_compliance_monitor::*;
//!
//! let config = MonitorConfig { seed: Some(42), ..Default::default() };
//! let monitor = ComplianceMonitor::from_config(config)?;
//!
//! for status in monitor.get_facilities_with_status()? {
//!     println!("{}: {:.0}% ({})", status.facility.name, status.utilization_percent, status.status);
//! }
//!
//! let stats = monitor.get_aggregate_stats()?;
//! println!("{}", stats.summary());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`types`]: Identifiers, enums and configuration
//! - [`facility`]: Facilities, registry and seed data
//! - [`readings`]: Occupancy readings and the synthetic generator
//! - [`ledger`]: Violations, evidence, penalties and lifecycle transitions
//! - [`projection`]: Per-facility status and history
//! - [`simulation`]: Monitor facade, scheduler, statistics, logging and errors
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │  Readings   │───►│   Ledger    │◄───│  Facility   │
//! │ Generator   │    │ Transitions │    │  Registry   │
//! └─────────────┘    └─────────────┘    └─────────────┘
//!        ▲                  │                  │
//!        │                  ▼                  ▼
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │   Tick      │───►│  Monitor    │───►│ Projection  │
//! │ Scheduler   │    │  Facade     │    │ Statistics  │
//! └─────────────┘    └─────────────┘    └─────────────┘
//! ```
#![warn(missing_docs, missing_debug_implementations, unreachable_pub)]

pub mod facility;
pub mod ledger;
pub mod projection;
pub mod readings;
pub mod simulation;
pub mod types;

// Core types and identifiers
pub use types::{
    CliArgs, ComplianceStatus, ConfigError, ConfigValidationError, EvidenceId, FacilityId,
    MonitorConfig, OutputFormat, SimulationScenario, ViolationId, ViolationStatus,
};

// Facilities
pub use facility::{BaselineGenerator, Facility, FacilityRegistry, SeedData, SeedFacility};

// Ledger
pub use ledger::{
    compute_penalty, Evidence, EvidenceMetadata, LedgerTransition, Violation, ViolationFilter,
    ViolationLedger,
};

// Readings and projection
pub use projection::{ActiveViolationSummary, CountHistoryPoint, LotStatus, ProjectionOptions};
pub use readings::{OccupancyReading, ReadingGenerator};

// Monitor
pub use simulation::{
    AggregateStats, Baseline, ChronicOffender, ComplianceMonitor, HeatmapCell, LoggingConfig,
    MonitorError, MonitorResult, MonitorService, SimulationState, TickReport, TickScheduler,
};
