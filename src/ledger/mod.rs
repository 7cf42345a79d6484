//! Violation ledger
//!
//! Records, evidence and the state machine that turns occupancy readings into
//! opened, updated and resolved violations.
//!
//! ## Usage Example
//!
//! ```rust
//! use parking_compliance_monitor::facility::Facility;
//! use parking_compliance_monitor::ledger::{LedgerTransition, ViolationLedger};
//! use parking_compliance_monitor::readings::OccupancyReading;
//! use chrono::{Duration, Utc};
//!
//! let facility = Facility::new("Connaught Place", "Metro Parking Co", 100, 50.0);
//! let mut ledger = ViolationLedger::new();
//! let start = Utc::now();
//!
//! let opened = ledger
//!     .apply_reading(&facility, &OccupancyReading::new(facility.id, 130, start))
//!     .unwrap();
//! assert!(matches!(opened, LedgerTransition::Opened { .. }));
//!
//! let closed = ledger
//!     .apply_reading(&facility, &OccupancyReading::new(facility.id, 90, start + Duration::hours(2)))
//!     .unwrap();
//! assert!(matches!(closed, LedgerTransition::Resolved { penalty_amount: 3000, .. }));
//! ```

pub mod evidence;
pub mod ledger;
pub mod penalty;
pub mod violation;

pub use evidence::*;
pub use ledger::*;
pub use penalty::*;
pub use violation::*;
