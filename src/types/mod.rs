//! Core types and identifiers for the compliance monitor
//!
//! This module contains fundamental types, identifiers, and configuration structures
//! used throughout the monitor.
//!
//! # Overview
//!
//! - **Identifiers**: UUID-based unique identifiers for facilities, violations and evidence
//! - **Enums**: Violation lifecycle, compliance status, scenarios and output formats
//! - **Configuration**: Monitor configuration with validation and CLI support
//!
//! # Usage Example
//!
//! ```rust
//! use parking_compliance_monitor::types::*;
//!
//! let facility_id = FacilityId::new();
//! assert!(facility_id.to_string().starts_with("LOT_"));
//!
//! let config = MonitorConfig {
//!     tick_interval_ms: 1_000,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

pub mod config;
pub mod enums;
pub mod identifiers;

// Re-export all public types for convenience
pub use config::*;
pub use enums::*;
pub use identifiers::*;
