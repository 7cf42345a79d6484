//! Facility reference data
//!
//! Facilities, the registry that indexes them, and the seed data they are
//! loaded from.
//!
//! ## Usage Example
//!
//! ```rust
//! use parking_compliance_monitor::facility::BaselineGenerator;
//! use chrono::Utc;
//!
//! let seed = BaselineGenerator::with_seed(42).generate(5, 20, Utc::now());
//! let registry = seed.registry().unwrap();
//! assert_eq!(registry.len(), 5);
//! ```

pub mod facility;
pub mod generator;
pub mod registry;
pub mod seed;

pub use facility::*;
pub use generator::*;
pub use registry::*;
pub use seed::*;
