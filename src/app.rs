//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and initialises logging
//! - parses CLI arguments
//! - runs the requested computation
//! - prints reports and writes optional exports

use clap::Parser;
use log::info;

use crate::cli::{CoeffsArgs, Command, FitArgs, SampleArgs, ScheduleArgs};
use crate::domain::{BoundaryConditions, PeakMethod};
use crate::error::AppError;
use crate::trajectory::{Trajectory, duration_for_peak_velocity, solve_coefficients_numeric, step_schedule};

/// Entry point for the `mjt` binary.
pub fn run() -> Result<(), AppError> {
    // `.env` may set RUST_LOG, so load it before the logger reads the environment.
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init()
        .ok();

    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Coeffs(args) => handle_coeffs(args),
        Command::Sample(args) => handle_sample(args),
        Command::Fit(args) => handle_fit(args),
        Command::Schedule(args) => handle_schedule(args),
    }
}

fn handle_coeffs(args: CoeffsArgs) -> Result<(), AppError> {
    let bc = args.boundary.to_conditions();
    let traj = Trajectory::new(bc)?;

    let coeffs = if args.numeric {
        solve_coefficients_numeric(&bc)?
    } else {
        *traj.coefficients()
    };
    let peak = traj.peak_velocity(args.peak);

    println!("{}", crate::report::format_coefficients(&bc, &coeffs, &peak));
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let traj = Trajectory::new(args.boundary.to_conditions())?;
    let series = traj.sample_series(args.samples)?;

    match &args.export {
        Some(path) => {
            crate::io::write_series_csv(path, &series)?;
            info!("wrote {} samples to {}", series.len(), path.display());
        }
        None => print!("{}", crate::report::format_series(&series)),
    }
    Ok(())
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = args.to_config();
    let analysis = crate::fit::fit_scaling_laws(&config)?;

    println!("{}", crate::report::format_analysis(&analysis));

    if let Some(path) = &args.export {
        crate::io::write_analysis_json(path, &analysis)?;
        info!("wrote analysis to {}", path.display());
    }
    Ok(())
}

fn handle_schedule(args: ScheduleArgs) -> Result<(), AppError> {
    let mut bc = args.boundary.to_conditions();
    if let Some(vmax) = args.vmax {
        if !bc.is_rest_to_rest() {
            return Err(AppError::config(
                "--vmax derives the duration for rest-to-rest moves only.",
            ));
        }
        bc = BoundaryConditions::rest_to_rest(bc.x0, bc.x_end, duration_for_peak_velocity(bc.displacement(), vmax)?);
        info!("duration from vmax={vmax}: T={:.6}", bc.duration);
    }

    let traj = Trajectory::new(bc)?;
    let schedule = step_schedule(&traj, args.step_size, args.tick)?;
    let peak = traj.peak_velocity(PeakMethod::Located);

    println!("Peak velocity: v={:.6} at t={:.6}", peak.v, peak.t);
    println!("{}", crate::report::format_schedule(&schedule, args.preview));
    Ok(())
}
