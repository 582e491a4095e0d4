//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - trajectory inputs and outputs (`BoundaryConditions`, `Coefficients`, `TrajectorySample`)
//! - fitted laws and their diagnostics (`ScalingLaw`, `FitQuality`)
//! - sweep configuration (`SweepConfig`, `FitOptions`, `PeakMethod`)

pub mod config;
pub mod types;

pub use types::*;
