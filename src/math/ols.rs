//! Linear least squares via SVD.
//!
//! Every Levenberg–Marquardt iteration solves a small damped problem of the form
//!
//! ```text
//! minimize ‖J δ − r‖² + λ ‖D δ‖²
//! ```
//!
//! which we express as one tall ordinary least squares system by stacking
//! `√λ·D` under `J` and zeros under `r`.
//!
//! SVD is used rather than QR because the stacked matrix is never square, and
//! because the inner fit's Jacobian column `1/T` spans two orders of magnitude
//! over the default duration range.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Stack `√λ·diag(scale)` below `j` and zeros below `r`.
pub fn damped_system(j: &DMatrix<f64>, r: &DVector<f64>, lambda: f64, scale: &[f64]) -> (DMatrix<f64>, DVector<f64>) {
    let (n, p) = j.shape();
    let mut a = DMatrix::<f64>::zeros(n + p, p);
    a.view_mut((0, 0), (n, p)).copy_from(j);
    let sl = lambda.sqrt();
    for k in 0..p {
        a[(n + k, k)] = sl * scale[k];
    }

    let mut b = DVector::<f64>::zeros(n + p);
    b.rows_mut(0, n).copy_from(r);
    (a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn damping_shrinks_the_step() {
        let j = DMatrix::from_row_slice(2, 1, &[1.0, 1.0]);
        let r = DVector::from_row_slice(&[2.0, 2.0]);

        let (a, b) = damped_system(&j, &r, 0.0, &[1.0]);
        let undamped = solve_least_squares(&a, &b).unwrap();
        assert!((undamped[0] - 2.0).abs() < 1e-12);

        // (JᵀJ + λ) δ = Jᵀr → (2 + 2) δ = 4
        let (a, b) = damped_system(&j, &r, 2.0, &[1.0]);
        let damped = solve_least_squares(&a, &b).unwrap();
        assert!((damped[0] - 1.0).abs() < 1e-12);
    }
}
