//! Step timing for stepper-style actuators.
//!
//! A stepper advances in fixed increments, so a smooth trajectory is executed as
//! a list of waits: walk the trajectory on a fixed time tick and record how many
//! ticks elapse between successive crossings of `k · step_size`.
//!
//! Steps are counted on net progress toward the target. Moves that overshoot and
//! come back (possible with large boundary velocities) are not scheduled in
//! reverse.

use log::{debug, warn};

use crate::domain::{StepDirection, StepSchedule};
use crate::error::AppError;
use crate::trajectory::Trajectory;

/// Upper bound on ticks walked for one schedule.
const MAX_TICKS: usize = 50_000_000;

/// Upper bound on steps in one schedule.
const MAX_STEPS: usize = 50_000_000;

/// Crossing tolerance relative to the step size.
const STEP_EPS: f64 = 1e-9;

pub fn step_schedule(traj: &Trajectory, step_size: f64, tick: f64) -> Result<StepSchedule, AppError> {
    if !(step_size.is_finite() && step_size > 0.0) {
        return Err(AppError::config(format!("Step size must be finite and > 0 (got {step_size}).")));
    }
    let duration = traj.duration();
    if !(tick.is_finite() && tick > 0.0 && tick <= duration) {
        return Err(AppError::config(format!(
            "Tick must be finite, > 0 and <= the duration {duration} (got {tick})."
        )));
    }

    let ticks = (duration / tick).ceil();
    if ticks > MAX_TICKS as f64 {
        return Err(AppError::config(format!(
            "Tick {tick} is too fine for duration {duration}: {ticks} ticks exceeds {MAX_TICKS}."
        )));
    }
    let ticks = ticks as usize;

    let bc = traj.boundary();
    let distance = bc.displacement();
    let (direction, sign) = if distance >= 0.0 {
        (StepDirection::Forward, 1.0)
    } else {
        (StepDirection::Reverse, -1.0)
    };
    let steps = (distance.abs() / step_size + STEP_EPS).floor();
    if !steps.is_finite() || steps > MAX_STEPS as f64 {
        return Err(AppError::config(format!(
            "Step size {step_size} is too fine for distance {}: {steps} steps exceeds {MAX_STEPS}.",
            distance.abs()
        )));
    }
    let total_steps = steps as usize;

    let mut intervals = Vec::with_capacity(total_steps);
    let mut next_step = 1usize;
    let mut prev_tick = 0usize;
    let mut coarse = false;

    for i in 1..=ticks {
        if next_step > total_steps {
            break;
        }
        let t = (i as f64 * tick).min(duration);
        let progress = sign * (traj.sample(t).x - bc.x0);

        while next_step <= total_steps && progress >= (next_step as f64 - STEP_EPS) * step_size {
            if i == prev_tick {
                coarse = true;
            }
            intervals.push((i - prev_tick) as f64 * tick);
            prev_tick = i;
            next_step += 1;
        }
    }

    if coarse {
        warn!("Tick {tick} is coarser than the fastest step; some steps are scheduled back to back");
    }
    debug!(
        "step schedule: {} of {total_steps} steps over {ticks} ticks ({direction:?})",
        intervals.len()
    );

    Ok(StepSchedule {
        step_size,
        tick,
        direction,
        intervals,
    })
}
