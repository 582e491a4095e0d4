//! Model evaluation for the two scaling laws.
//!
//! The fitter relies on two primitive operations:
//! - predict `y(x)` given parameters (for residuals and reports)
//! - fill a Jacobian row `∂y/∂p` at `x` (for Levenberg–Marquardt steps)

use crate::domain::LawKind;

/// Predict `y(x)` for the given law.
///
/// # Panics
/// Panics if `params` is shorter than `law.param_len()`.
pub fn predict(law: LawKind, x: f64, params: &[f64]) -> f64 {
    match law {
        LawKind::InverseDuration => params[0] / x,
        LawKind::AffineDisplacement => params[0] * x + params[1],
    }
}

/// Fill `out` with the partial derivatives of `y(x)` with respect to each parameter.
///
/// # Panics
/// Panics if `out` is shorter than `law.param_len()`.
pub fn fill_jacobian_row(law: LawKind, x: f64, _params: &[f64], out: &mut [f64]) {
    match law {
        LawKind::InverseDuration => {
            out[0] = 1.0 / x;
        }
        LawKind::AffineDisplacement => {
            out[0] = x;
            out[1] = 1.0;
        }
    }
}
