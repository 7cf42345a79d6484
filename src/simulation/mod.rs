//! Monitoring engine and simulation control
//!
//! # Overview
//!
//! - **ComplianceMonitor**: shared facade for reads, ticks and the simulation lifecycle
//! - **MonitorService**: async wrapper adding simulated backend latency
//! - **TickScheduler**: tokio task that applies a tick every period
//! - **Baseline**: static seed state shown while idle and restored on start/stop
//! - **AggregateStats**: dashboard statistics, offender ranking and heatmap
//! - **MonitorError**: error type shared by every fallible operation
//!
//! # Usage Example
//!
//! ```rust
//! use parking_compliance_monitor::simulation::*;
//! use parking_compliance_monitor::types::*;
//!
//! let config = MonitorConfig { seed: Some(7), facility_count: 4, ..Default::default() };
//! let monitor = ComplianceMonitor::from_config(config).unwrap();
//!
//! // Outside an async runtime ticks are driven by hand
//! monitor.start_simulation(SimulationScenario::Standard).unwrap();
//! let report = monitor.tick().unwrap().expect("simulation is running");
//! assert_eq!(report.readings, 4);
//! assert_eq!(monitor.get_simulation_state().unwrap().events_generated, 1);
//!
//! let state = monitor.stop_simulation().unwrap();
//! assert!(!state.is_running);
//! ```

pub mod baseline;
pub mod clock;
pub mod error;
pub mod logging;
pub mod monitor;
pub mod scheduler;
pub mod service;
pub mod state;
pub mod statistics;

pub use baseline::*;
pub use clock::*;
pub use error::*;
pub use logging::*;
pub use monitor::*;
pub use scheduler::*;
pub use service::*;
pub use state::*;
pub use statistics::*;
