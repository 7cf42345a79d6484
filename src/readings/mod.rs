//! Occupancy readings and their synthetic source

pub mod generator;
pub mod reading;

pub use generator::*;
pub use reading::*;
