//! Input/output helpers.
//!
//! - scaling analysis JSON read/write (`analysis`)
//! - sampled trajectory CSV export (`export`)

pub mod analysis;
pub mod export;

pub use analysis::*;
pub use export::*;
