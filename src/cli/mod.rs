//! Command-line parsing for the `mjt` binary.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! trajectory and fitting code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{BoundaryConditions, FitOptions, PeakMethod, SweepConfig};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "mjt", version, about = "Minimum-jerk trajectories and their scaling laws")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Solve the boundary value problem and print the six coefficients.
    Coeffs(CoeffsArgs),
    /// Sample x, v, a, j over [0, T] and print or export them.
    Sample(SampleArgs),
    /// Sweep duration and displacement, then fit Vmax = a/T and a = b*xT + c.
    Fit(FitArgs),
    /// Compute per-step timing for a stepper move.
    Schedule(ScheduleArgs),
}

/// The seven scalars of a boundary value problem.
#[derive(Debug, Args, Clone)]
pub struct BoundaryArgs {
    /// Start position.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub x0: f64,
    /// End position.
    #[arg(long, default_value_t = 1.0, allow_hyphen_values = true)]
    pub x_end: f64,
    /// Start velocity.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub v0: f64,
    /// End velocity.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub v_end: f64,
    /// Start acceleration.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub a0: f64,
    /// End acceleration.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub a_end: f64,
    /// Trajectory duration T (must be > 0).
    #[arg(long, default_value_t = 1.0)]
    pub duration: f64,
}

impl BoundaryArgs {
    pub fn to_conditions(&self) -> BoundaryConditions {
        BoundaryConditions::new(
            self.x0,
            self.x_end,
            self.v0,
            self.v_end,
            self.a0,
            self.a_end,
            self.duration,
        )
    }
}

#[derive(Debug, Parser, Clone)]
pub struct CoeffsArgs {
    #[command(flatten)]
    pub boundary: BoundaryArgs,

    /// Solve the t=T block with an LU factorisation instead of the closed form.
    #[arg(long)]
    pub numeric: bool,

    /// How to report the peak velocity.
    #[arg(long, value_enum, default_value_t = PeakMethod::Located)]
    pub peak: PeakMethod,
}

#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    #[command(flatten)]
    pub boundary: BoundaryArgs,

    /// Number of samples over [0, T] (inclusive).
    #[arg(short = 'n', long, default_value_t = 100)]
    pub samples: usize,

    /// Export samples to CSV instead of printing them.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Sweep and fit options.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Minimum duration T.
    #[arg(long, default_value_t = 0.1)]
    pub duration_min: f64,

    /// Maximum duration T.
    #[arg(long, default_value_t = 10.0)]
    pub duration_max: f64,

    /// Number of duration samples.
    #[arg(long, default_value_t = 1000)]
    pub duration_samples: usize,

    /// Minimum displacement xT.
    #[arg(long, default_value_t = 0.1, allow_hyphen_values = true)]
    pub displacement_min: f64,

    /// Maximum displacement xT.
    #[arg(long, default_value_t = 10.0, allow_hyphen_values = true)]
    pub displacement_max: f64,

    /// Number of displacement samples.
    #[arg(long, default_value_t = 1000)]
    pub displacement_samples: usize,

    /// How peak velocity is taken from each trajectory.
    #[arg(long, value_enum, default_value_t = PeakMethod::Midpoint)]
    pub peak: PeakMethod,

    /// Gaussian noise sigma added to each peak velocity (0 disables).
    #[arg(long, default_value_t = 0.0)]
    pub noise_sigma: f64,

    /// Random seed for the noise.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Flag inner fits whose RMSE relative to mean |Vmax| exceeds this.
    #[arg(long, default_value_t = 1e-6)]
    pub flag_rel_rmse: f64,

    /// Levenberg–Marquardt iteration cap per fit.
    #[arg(long, default_value_t = 200)]
    pub max_iterations: usize,

    /// Export the full analysis (surface + fits) to JSON.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

impl FitArgs {
    pub fn to_config(&self) -> SweepConfig {
        SweepConfig {
            duration_min: self.duration_min,
            duration_max: self.duration_max,
            duration_samples: self.duration_samples,
            displacement_min: self.displacement_min,
            displacement_max: self.displacement_max,
            displacement_samples: self.displacement_samples,
            peak: self.peak,
            noise_sigma: self.noise_sigma,
            seed: self.seed,
            flag_rel_rmse: self.flag_rel_rmse,
            fit: FitOptions {
                max_iterations: self.max_iterations,
                ..FitOptions::default()
            },
        }
    }
}

#[derive(Debug, Parser, Clone)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub boundary: BoundaryArgs,

    /// Derive T from a peak velocity limit (rest-to-rest only); overrides --duration.
    #[arg(long)]
    pub vmax: Option<f64>,

    /// Distance covered by one step.
    #[arg(long, default_value_t = 0.01)]
    pub step_size: f64,

    /// Time resolution of the schedule.
    #[arg(long, default_value_t = 1e-5)]
    pub tick: f64,

    /// Number of intervals to print.
    #[arg(long, default_value_t = 20)]
    pub preview: usize,
}
