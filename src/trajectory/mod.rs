//! Minimum-jerk trajectories.
//!
//! - `solver`: boundary conditions → quintic coefficients
//! - `profile`: evaluation of position and derivatives
//! - `peak`: peak velocity, and duration from a velocity limit
//! - `schedule`: per-step timing for stepper actuators

pub mod peak;
pub mod profile;
pub mod schedule;
pub mod solver;

pub use peak::*;
pub use profile::*;
pub use schedule::*;
pub use solver::*;
