//! `mjt-laws` library crate.
//!
//! Closed-form minimum-jerk (quintic) trajectories and the empirical scaling
//! laws linking duration, displacement and peak velocity.
//!
//! The binary (`mjt`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the solver and fitter can be reused without the CLI

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod report;
pub mod trajectory;
