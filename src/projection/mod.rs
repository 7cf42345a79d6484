//! Read-side projection of facility status

pub mod history;
pub mod status;

pub use history::*;
pub use status::*;
