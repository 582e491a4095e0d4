//! Nonlinear least squares (Levenberg–Marquardt).
//!
//! Given observations `(x_i, y_i)`, a law `y = f(x; p)` and a starting point `p0`,
//! we minimise `Σ (y_i − f(x_i; p))²`:
//!
//! - each step solves the damped system `(JᵀJ + λ·D²) δ = Jᵀr` as a stacked
//!   least squares problem (see `math::ols`), with `D` the Jacobian column norms
//! - accepted steps shrink `λ` (toward Gauss–Newton), rejected steps grow it
//! - convergence is declared on a small relative SSE reduction or a small step
//!
//! After convergence the parameter covariance is estimated as
//! `(JᵀJ)⁻¹ · SSE / (n − p)`.

use nalgebra::{DMatrix, DVector};

use crate::domain::{FitOptions, FitQuality, LawKind};
use crate::math::{damped_system, solve_least_squares};
use crate::models::{fill_jacobian_row, predict};

const LAMBDA_MIN: f64 = 1e-15;
const LAMBDA_MAX: f64 = 1e16;

/// Why a fit was not accepted.
#[derive(Debug, Clone, PartialEq)]
pub enum FitFailure {
    /// Fewer observations than parameters.
    Underdetermined { n: usize, p: usize },
    /// Mismatched lengths or non-finite observations.
    InvalidData(String),
    /// The model produced a non-finite residual.
    NonFinite,
    /// The damped step could not be solved.
    Singular,
    /// Damping grew without finding a better point.
    Stalled { iterations: usize },
    MaxIterations(usize),
}

impl std::fmt::Display for FitFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitFailure::Underdetermined { n, p } => {
                write!(f, "underdetermined: {n} observations for {p} parameters")
            }
            FitFailure::InvalidData(msg) => write!(f, "invalid data: {msg}"),
            FitFailure::NonFinite => write!(f, "non-finite residuals"),
            FitFailure::Singular => write!(f, "singular step system"),
            FitFailure::Stalled { iterations } => {
                write!(f, "stalled after {iterations} iterations (damping exhausted)")
            }
            FitFailure::MaxIterations(n) => write!(f, "no convergence within {n} iterations"),
        }
    }
}

/// Converged parameters and diagnostics.
#[derive(Debug, Clone)]
pub struct CurveFit {
    pub params: Vec<f64>,
    pub quality: FitQuality,
}

/// Fit `law` to `(x, y)` starting from `p0`.
pub fn curve_fit(law: LawKind, x: &[f64], y: &[f64], p0: &[f64], opts: &FitOptions) -> Result<CurveFit, FitFailure> {
    let n = x.len();
    let p = law.param_len();

    if y.len() != n {
        return Err(FitFailure::InvalidData(format!("x has {n} values but y has {}", y.len())));
    }
    if p0.len() != p {
        return Err(FitFailure::InvalidData(format!(
            "initial guess has {} values, model needs {p}",
            p0.len()
        )));
    }
    if n < p {
        return Err(FitFailure::Underdetermined { n, p });
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(FitFailure::InvalidData("non-finite observation".to_string()));
    }

    let mut params = DVector::from_column_slice(p0);
    let mut sse = sum_squares(law, x, y, params.as_slice());
    if !sse.is_finite() {
        return Err(FitFailure::NonFinite);
    }

    let mut lambda = opts.lambda0;
    let mut converged = sse == 0.0;
    let mut iterations = 0;

    while !converged {
        if iterations >= opts.max_iterations {
            return Err(FitFailure::MaxIterations(opts.max_iterations));
        }
        iterations += 1;

        let (j, r) = jacobian_and_residuals(law, x, y, params.as_slice());
        let scale: Vec<f64> = (0..p)
            .map(|k| {
                let norm = j.column(k).norm();
                if norm > 0.0 && norm.is_finite() { norm } else { 1.0 }
            })
            .collect();

        let (a, b) = damped_system(&j, &r, lambda, &scale);
        let delta = solve_least_squares(&a, &b).ok_or(FitFailure::Singular)?;

        let trial = &params + &delta;
        let trial_sse = sum_squares(law, x, y, trial.as_slice());
        let step_small = delta.norm() <= opts.xtol * (params.norm() + opts.xtol);

        if trial_sse.is_finite() && trial_sse <= sse {
            let reduction = sse - trial_sse;
            converged = step_small || trial_sse == 0.0 || reduction <= opts.ftol * sse;
            params = trial;
            sse = trial_sse;
            lambda = (lambda * 0.1).max(LAMBDA_MIN);
        } else {
            // No better point nearby: a vanishing step means we are at the minimum.
            converged = step_small;
            lambda *= 10.0;
            if !converged && lambda > LAMBDA_MAX {
                return Err(FitFailure::Stalled { iterations });
            }
        }
    }

    let params: Vec<f64> = params.iter().copied().collect();
    let (covariance, std_errors) = covariance(law, x, y, &params, sse);

    Ok(CurveFit {
        quality: FitQuality {
            n,
            sse,
            rmse: (sse / n as f64).sqrt(),
            iterations,
            covariance,
            std_errors,
        },
        params,
    })
}

fn sum_squares(law: LawKind, x: &[f64], y: &[f64], params: &[f64]) -> f64 {
    x.iter()
        .zip(y.iter())
        .map(|(&xi, &yi)| {
            let r = yi - predict(law, xi, params);
            r * r
        })
        .sum()
}

fn jacobian_and_residuals(law: LawKind, x: &[f64], y: &[f64], params: &[f64]) -> (DMatrix<f64>, DVector<f64>) {
    let n = x.len();
    let p = law.param_len();
    let mut j = DMatrix::<f64>::zeros(n, p);
    let mut r = DVector::<f64>::zeros(n);
    let mut row = vec![0.0; p];

    for i in 0..n {
        fill_jacobian_row(law, x[i], params, &mut row);
        for k in 0..p {
            j[(i, k)] = row[k];
        }
        r[i] = y[i] - predict(law, x[i], params);
    }
    (j, r)
}

fn covariance(
    law: LawKind,
    x: &[f64],
    y: &[f64],
    params: &[f64],
    sse: f64,
) -> (Option<Vec<Vec<f64>>>, Option<Vec<f64>>) {
    let p = params.len();
    let dof = x.len().saturating_sub(p);
    if dof == 0 {
        return (None, None);
    }

    let (j, _) = jacobian_and_residuals(law, x, y, params);
    let Some(inv) = (j.transpose() * &j).try_inverse() else {
        return (None, None);
    };
    let cov = inv * (sse / dof as f64);
    if cov.iter().any(|v| !v.is_finite()) {
        return (None, None);
    }

    let rows: Vec<Vec<f64>> = (0..p).map(|r| (0..p).map(|c| cov[(r, c)]).collect()).collect();
    let std_errors = (0..p).map(|k| cov[(k, k)].max(0.0).sqrt()).collect();
    (Some(rows), Some(std_errors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::lin_space;

    #[test]
    fn recovers_inverse_duration_law_exactly() {
        let t = lin_space(0.1, 10.0, 1000).unwrap();
        let v: Vec<f64> = t.iter().map(|t| 5.0 / t).collect();

        let fit = curve_fit(LawKind::InverseDuration, &t, &v, &[1.0], &FitOptions::default()).unwrap();
        assert!((fit.params[0] - 5.0).abs() < 1e-6, "a={}", fit.params[0]);
        assert!(fit.quality.rmse < 1e-9);
        assert_eq!(fit.quality.n, 1000);
    }

    #[test]
    fn recovers_affine_law_with_uncertainty() {
        let x = lin_space(0.0, 4.0, 41).unwrap();
        // Deterministic ±0.01 wiggle around y = 2x − 1.
        let y: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, &x)| 2.0 * x - 1.0 + if i % 2 == 0 { 0.01 } else { -0.01 })
            .collect();

        let fit = curve_fit(LawKind::AffineDisplacement, &x, &y, &[1.0, 1.0], &FitOptions::default()).unwrap();
        assert!((fit.params[0] - 2.0).abs() < 1e-2);
        assert!((fit.params[1] + 1.0).abs() < 1e-2);

        let se = fit.quality.std_errors.unwrap();
        assert_eq!(se.len(), 2);
        assert!(se.iter().all(|s| *s > 0.0 && *s < 0.01));
        let cov = fit.quality.covariance.unwrap();
        assert!((cov[0][1] - cov[1][0]).abs() < 1e-15);
    }

    #[test]
    fn exact_fit_without_spare_observations_has_no_covariance() {
        let fit = curve_fit(
            LawKind::AffineDisplacement,
            &[1.0, 2.0],
            &[3.0, 5.0],
            &[1.0, 1.0],
            &FitOptions::default(),
        )
        .unwrap();
        assert!((fit.params[0] - 2.0).abs() < 1e-9);
        assert!((fit.params[1] - 1.0).abs() < 1e-9);
        assert!(fit.quality.covariance.is_none());
    }

    #[test]
    fn rejects_underdetermined_and_bad_data() {
        let opts = FitOptions::default();
        assert_eq!(
            curve_fit(LawKind::AffineDisplacement, &[1.0], &[1.0], &[1.0, 1.0], &opts).unwrap_err(),
            FitFailure::Underdetermined { n: 1, p: 2 }
        );
        assert!(matches!(
            curve_fit(LawKind::InverseDuration, &[1.0, 2.0], &[1.0], &[1.0], &opts),
            Err(FitFailure::InvalidData(_))
        ));
        assert!(matches!(
            curve_fit(LawKind::InverseDuration, &[1.0, f64::NAN], &[1.0, 2.0], &[1.0], &opts),
            Err(FitFailure::InvalidData(_))
        ));
        assert_eq!(
            curve_fit(LawKind::InverseDuration, &[0.0, 1.0], &[1.0, 2.0], &[1.0], &opts).unwrap_err(),
            FitFailure::NonFinite
        );
    }

    #[test]
    fn iteration_cap_is_reported() {
        let t = lin_space(0.1, 10.0, 50).unwrap();
        let v: Vec<f64> = t.iter().map(|t| 40.0 / t).collect();
        let opts = FitOptions {
            max_iterations: 1,
            ..FitOptions::default()
        };
        assert_eq!(
            curve_fit(LawKind::InverseDuration, &t, &v, &[1.0], &opts).unwrap_err(),
            FitFailure::MaxIterations(1)
        );
    }
}
