//! Evaluating a solved trajectory.

use log::warn;

use crate::domain::{BoundaryConditions, Coefficients, PeakMethod, TrajectorySample, TrajectorySeries};
use crate::error::AppError;
use crate::math::{horner, lin_space, quintic_derivatives};
use crate::trajectory::peak::{PeakVelocity, peak_velocity};
use crate::trajectory::solver::solve_coefficients;

impl Coefficients {
    /// Position and derivatives at `t`.
    pub fn evaluate(&self, t: f64) -> TrajectorySample {
        let [x, v, a, j] = quintic_derivatives(self.as_array(), t);
        TrajectorySample { t, x, v, a, j }
    }

    /// Evaluate at each time in `ts`.
    pub fn evaluate_many(&self, ts: &[f64]) -> TrajectorySeries {
        let mut out = TrajectorySeries::with_capacity(ts.len());
        for &t in ts {
            out.push(self.evaluate(t));
        }
        out
    }

    pub fn velocity(&self, t: f64) -> f64 {
        let c = self.as_array();
        horner(&[c[1], 2.0 * c[2], 3.0 * c[3], 4.0 * c[4], 5.0 * c[5]], t)
    }

    pub fn acceleration(&self, t: f64) -> f64 {
        let c = self.as_array();
        horner(&[2.0 * c[2], 6.0 * c[3], 12.0 * c[4], 20.0 * c[5]], t)
    }
}

/// Boundary conditions together with their solved coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trajectory {
    bc: BoundaryConditions,
    coeffs: Coefficients,
}

impl Trajectory {
    pub fn new(bc: BoundaryConditions) -> Result<Self, AppError> {
        let coeffs = solve_coefficients(&bc)?;
        Ok(Self { bc, coeffs })
    }

    pub fn boundary(&self) -> &BoundaryConditions {
        &self.bc
    }

    pub fn coefficients(&self) -> &Coefficients {
        &self.coeffs
    }

    pub fn duration(&self) -> f64 {
        self.bc.duration
    }

    /// Evaluate at `t`. Times outside `[0, T]` extrapolate the polynomial.
    pub fn sample(&self, t: f64) -> TrajectorySample {
        self.coeffs.evaluate(t)
    }

    /// `n` evenly spaced samples covering `[0, T]` inclusive.
    pub fn sample_series(&self, n: usize) -> Result<TrajectorySeries, AppError> {
        let ts = lin_space(0.0, self.bc.duration, n)?;
        Ok(self.coeffs.evaluate_many(&ts))
    }

    /// Peak velocity by the requested method.
    ///
    /// The midpoint is only the true peak for rest-to-rest moves; asking for it
    /// on anything else is allowed but logged.
    pub fn peak_velocity(&self, method: PeakMethod) -> PeakVelocity {
        if method == PeakMethod::Midpoint && !self.bc.is_rest_to_rest() {
            warn!(
                "Midpoint peak requested for non rest-to-rest boundary conditions {:?}; v(T/2) may not be the maximum",
                self.bc
            );
        }
        peak_velocity(&self.coeffs, self.bc.duration, method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_profile_endpoints() {
        let traj = Trajectory::new(BoundaryConditions::rest_to_rest(0.0, 10.0, 1.0)).unwrap();
        let start = traj.sample(0.0);
        let end = traj.sample(1.0);
        assert!(start.x.abs() < 1e-12);
        assert!((end.x - 10.0).abs() < 1e-9);
        assert!(start.v.abs() < 1e-12 && end.v.abs() < 1e-9);
        assert!(start.a.abs() < 1e-12 && end.a.abs() < 1e-9);
    }

    #[test]
    fn series_spans_the_duration() {
        let traj = Trajectory::new(BoundaryConditions::rest_to_rest(0.0, 5.0, 2.0)).unwrap();
        let s = traj.sample_series(100).unwrap();
        assert_eq!(s.len(), 100);
        assert_eq!(s.t[0], 0.0);
        assert_eq!(s.t[99], 2.0);
        assert!((s.x[99] - 5.0).abs() < 1e-9);
        // Monotone rise for a rest-to-rest move.
        assert!(s.x.windows(2).all(|w| w[1] >= w[0] - 1e-12));
    }

    #[test]
    fn evaluate_agrees_with_named_derivatives() {
        let traj = Trajectory::new(BoundaryConditions::new(1.0, 4.0, 0.5, -0.5, 1.0, 0.0, 3.0)).unwrap();
        let c = traj.coefficients();
        for &t in &[0.0, 0.4, 1.7, 3.0] {
            let s = c.evaluate(t);
            assert!((s.v - c.velocity(t)).abs() < 1e-12);
            assert!((s.a - c.acceleration(t)).abs() < 1e-12);
        }
    }

    #[test]
    fn jerk_of_unit_profile() {
        // x = 10(6t⁵ − 15t⁴ + 10t³) → j(0) = 600, j(0.5) = −300.
        let traj = Trajectory::new(BoundaryConditions::rest_to_rest(0.0, 10.0, 1.0)).unwrap();
        assert!((traj.sample(0.0).j - 600.0).abs() < 1e-9);
        assert!((traj.sample(0.5).j + 300.0).abs() < 1e-9);
    }
}
