//! Peak velocity of a quintic trajectory.
//!
//! For a rest-to-rest move the velocity profile is symmetric about `T/2` and
//! peaks there at exactly `15/8 · (xT − x0) / T`. With non-zero derivative
//! boundary conditions the peak moves, so [`PeakMethod::Located`] finds it from
//! the roots of `a(t)` (the interior extrema of `v`) plus both endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::{Coefficients, PeakMethod};
use crate::error::AppError;

/// `Vmax · T / |xT − x0|` for any rest-to-rest quintic.
pub const REST_TO_REST_PEAK_FACTOR: f64 = 1.875;

/// Intervals used to bracket sign changes of `a(t)`.
const BRACKET_INTERVALS: usize = 256;

const BISECT_MAX_ITERS: usize = 200;

/// Where the velocity extremum sits and its value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakVelocity {
    pub t: f64,
    pub v: f64,
}

/// Peak velocity over `[0, duration]`.
///
/// The peak is the sample of largest `|v|`; the signed value is returned so
/// reverse moves keep their direction.
pub fn peak_velocity(coeffs: &Coefficients, duration: f64, method: PeakMethod) -> PeakVelocity {
    match method {
        PeakMethod::Midpoint => {
            let t = 0.5 * duration;
            PeakVelocity {
                t,
                v: coeffs.velocity(t),
            }
        }
        PeakMethod::Located => locate_peak(coeffs, duration),
    }
}

fn locate_peak(coeffs: &Coefficients, duration: f64) -> PeakVelocity {
    let mut candidates = vec![0.0, duration];
    candidates.extend(acceleration_roots(coeffs, duration));

    let mut best = PeakVelocity {
        t: 0.0,
        v: coeffs.velocity(0.0),
    };
    for t in candidates {
        let v = coeffs.velocity(t);
        // Ties go to the earlier time so the result is deterministic.
        if v.abs() > best.v.abs() || (v.abs() == best.v.abs() && t < best.t) {
            best = PeakVelocity { t, v };
        }
    }
    best
}

/// Roots of `a(t)` on `[0, duration]` found by bracketing and bisection.
fn acceleration_roots(coeffs: &Coefficients, duration: f64) -> Vec<f64> {
    let n = BRACKET_INTERVALS;
    let h = duration / n as f64;
    let mut roots = Vec::new();

    let mut t_prev = 0.0;
    let mut a_prev = coeffs.acceleration(t_prev);
    for i in 1..=n {
        let t = if i == n { duration } else { h * i as f64 };
        let a = coeffs.acceleration(t);

        if a_prev == 0.0 {
            roots.push(t_prev);
        } else if a_prev.signum() != a.signum() && a != 0.0 {
            roots.push(bisect(coeffs, t_prev, t, a_prev));
        }

        t_prev = t;
        a_prev = a;
    }
    if a_prev == 0.0 {
        roots.push(t_prev);
    }

    roots
}

fn bisect(coeffs: &Coefficients, mut lo: f64, mut hi: f64, mut a_lo: f64) -> f64 {
    for _ in 0..BISECT_MAX_ITERS {
        let mid = 0.5 * (lo + hi);
        if mid <= lo || mid >= hi {
            break;
        }
        let a_mid = coeffs.acceleration(mid);
        if a_mid == 0.0 {
            return mid;
        }
        if a_mid.signum() == a_lo.signum() {
            lo = mid;
            a_lo = a_mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

/// Shortest rest-to-rest duration whose peak velocity does not exceed `vmax`.
pub fn duration_for_peak_velocity(distance: f64, vmax: f64) -> Result<f64, AppError> {
    if !(distance.is_finite() && vmax.is_finite()) {
        return Err(AppError::domain(format!(
            "Distance and velocity limit must be finite (distance={distance}, vmax={vmax})."
        )));
    }
    if vmax <= 0.0 {
        return Err(AppError::domain(format!("Velocity limit must be > 0 (got {vmax}).")));
    }
    if distance == 0.0 {
        return Err(AppError::domain("Zero-distance move has no defined duration."));
    }
    Ok(REST_TO_REST_PEAK_FACTOR * distance.abs() / vmax)
}
