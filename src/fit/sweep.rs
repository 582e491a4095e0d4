//! Peak-velocity sweep over the duration × displacement grid.
//!
//! Each cell solves one rest-to-rest trajectory `(0 → xT_i, T_j)` with the closed
//! form and records its peak velocity. Cells are independent; rows (one per
//! displacement) are computed in parallel and the result does not depend on
//! scheduling order.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use log::debug;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::{BoundaryConditions, PeakMethod, SweepConfig};
use crate::error::AppError;
use crate::math::lin_space;
use crate::trajectory::{peak_velocity, solve_coefficients};

/// Peak velocity for every (displacement, duration) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VelocitySurface {
    pub durations: Vec<f64>,
    pub displacements: Vec<f64>,
    /// `peak_velocity[i][j]` is the peak for `displacements[i]` over `durations[j]`.
    pub peak_velocity: Vec<Vec<f64>>,
}

/// Peak velocity of `0 → displacement` for each duration.
pub fn peak_velocity_row(displacement: f64, durations: &[f64], method: PeakMethod) -> Result<Vec<f64>, AppError> {
    durations
        .iter()
        .map(|&t| {
            let bc = BoundaryConditions::rest_to_rest(0.0, displacement, t);
            let coeffs = solve_coefficients(&bc)?;
            Ok(peak_velocity(&coeffs, t, method).v)
        })
        .collect()
}

/// Run the full sweep described by `config`.
pub fn sweep_peak_velocity(config: &SweepConfig) -> Result<VelocitySurface, AppError> {
    config.validate()?;

    let durations = lin_space(config.duration_min, config.duration_max, config.duration_samples)?;
    let displacements = lin_space(
        config.displacement_min,
        config.displacement_max,
        config.displacement_samples,
    )?;

    let noise = if config.noise_sigma > 0.0 {
        Some(
            Normal::new(0.0, config.noise_sigma)
                .map_err(|e| AppError::config(format!("Noise distribution error: {e}")))?,
        )
    } else {
        None
    };

    let rows: Vec<Result<Vec<f64>, AppError>> = displacements
        .par_iter()
        .enumerate()
        .map(|(i, &xt)| {
            let mut row = peak_velocity_row(xt, &durations, config.peak)?;
            if let Some(normal) = &noise {
                let mut rng = StdRng::seed_from_u64(row_seed(config.seed, i));
                for v in row.iter_mut() {
                    *v += normal.sample(&mut rng);
                }
            }
            Ok(row)
        })
        .collect();

    // Report the lowest failing row so errors are reproducible.
    let mut peak_velocity = Vec::with_capacity(rows.len());
    for row in rows {
        peak_velocity.push(row?);
    }

    debug!(
        "sweep: {} displacements x {} durations ({:?} peak, noise sigma {})",
        displacements.len(),
        durations.len(),
        config.peak,
        config.noise_sigma
    );

    Ok(VelocitySurface {
        durations,
        displacements,
        peak_velocity,
    })
}

/// Per-row seed so each row's noise is independent of which thread runs it.
fn row_seed(seed: u64, row: usize) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    row.hash(&mut hasher);
    hasher.finish()
}
