//! Closed-form coefficients of the quintic boundary value problem.
//!
//! We look for `x(t) = c0 + c1 t + c2 t² + c3 t³ + c4 t⁴ + c5 t⁵` with
//!
//! ```text
//! x(0)  = x0    x(T)  = xT
//! x'(0) = v0    x'(T) = vT
//! x''(0)= a0    x''(T)= aT
//! ```
//!
//! The three `t = 0` conditions fix the low coefficients directly:
//! `c0 = x0`, `c1 = v0`, `c2 = a0/2`. Moving their contribution to the right
//! hand side leaves a 3×3 system in `c3, c4, c5`:
//!
//! ```text
//! | T³    T⁴    T⁵  | |c3|   | Dx = xT − x0 − v0·T − a0·T²/2 |
//! | 3T²   4T³   5T⁴ | |c4| = | Dv = vT − v0 − a0·T           |
//! | 6T    12T²  20T³| |c5|   | Da = aT − a0                  |
//! ```
//!
//! Its determinant is `2T⁹`. Cramer's rule gives
//!
//! ```text
//! c3 = (20·Dx − 8T·Dv +  T²·Da) / (2T³)
//! c4 = (−30·Dx + 14T·Dv − 2T²·Da) / (2T⁴)
//! c5 = (12·Dx − 6T·Dv +  T²·Da) / (2T⁵)
//! ```
//!
//! and expanding `Dx, Dv, Da` yields the formulas hard-coded in
//! [`solve_coefficients`]. [`solve_coefficients_numeric`] performs the same 3×3
//! solve with an LU factorisation; tests keep the two in agreement.

use nalgebra::{Matrix3, Vector3};

use crate::domain::{BoundaryConditions, Coefficients};
use crate::error::AppError;

/// Solve for `[c0..c5]` using the closed form.
pub fn solve_coefficients(bc: &BoundaryConditions) -> Result<Coefficients, AppError> {
    check_inputs(bc)?;

    let BoundaryConditions {
        x0,
        x_end: xt,
        v0,
        v_end: vt,
        a0,
        a_end: at,
        duration: t,
    } = *bc;
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;
    let t5 = t4 * t;

    let c = [
        x0,
        v0,
        a0 / 2.0,
        (-3.0 * t2 * a0 + t2 * at - 12.0 * t * v0 - 8.0 * t * vt - 20.0 * x0 + 20.0 * xt) / (2.0 * t3),
        (3.0 * t2 * a0 - 2.0 * t2 * at + 16.0 * t * v0 + 14.0 * t * vt + 30.0 * x0 - 30.0 * xt) / (2.0 * t4),
        (-t2 * a0 + t2 * at - 6.0 * t * v0 - 6.0 * t * vt - 12.0 * x0 + 12.0 * xt) / (2.0 * t5),
    ];

    finish(bc, c)
}

/// Solve the `t = T` block numerically with an LU factorisation.
pub fn solve_coefficients_numeric(bc: &BoundaryConditions) -> Result<Coefficients, AppError> {
    check_inputs(bc)?;

    let t = bc.duration;
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;
    let t5 = t4 * t;

    let c0 = bc.x0;
    let c1 = bc.v0;
    let c2 = bc.a0 / 2.0;

    #[rustfmt::skip]
    let m = Matrix3::new(
        t3,        t4,         t5,
        3.0 * t2,  4.0 * t3,   5.0 * t4,
        6.0 * t,   12.0 * t2,  20.0 * t3,
    );
    let rhs = Vector3::new(
        bc.x_end - c0 - c1 * t - c2 * t2,
        bc.v_end - c1 - 2.0 * c2 * t,
        bc.a_end - 2.0 * c2,
    );

    let Some(high) = m.lu().solve(&rhs) else {
        return Err(AppError::domain(format!(
            "Boundary system is singular for duration T={t}."
        )));
    };

    finish(bc, [c0, c1, c2, high[0], high[1], high[2]])
}

fn check_inputs(bc: &BoundaryConditions) -> Result<(), AppError> {
    if bc.values().iter().any(|v| !v.is_finite()) {
        return Err(AppError::domain(format!("Boundary conditions must be finite: {bc:?}")));
    }
    let t = bc.duration;
    if t <= 0.0 {
        return Err(AppError::domain(format!("Duration must be > 0 (got T={t}).")));
    }
    // T⁵ is the largest denominator; it must neither underflow nor overflow.
    if !t.powi(5).is_normal() {
        return Err(AppError::domain(format!(
            "Duration T={t} is out of range: T^5 is not a normal float."
        )));
    }
    Ok(())
}

fn finish(bc: &BoundaryConditions, c: [f64; 6]) -> Result<Coefficients, AppError> {
    if c.iter().any(|v| !v.is_finite()) {
        return Err(AppError::domain(format!(
            "Non-finite coefficients for boundary conditions {bc:?}."
        )));
    }
    Ok(Coefficients::from_array(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::math::quintic_derivatives;

    fn assert_close(got: f64, want: f64, rel: f64) {
        let tol = rel * want.abs().max(1.0);
        assert!((got - want).abs() <= tol, "got {got}, want {want}");
    }

    #[test]
    fn canonical_unit_profile_scaled_by_ten() {
        let bc = BoundaryConditions::rest_to_rest(0.0, 10.0, 1.0);
        let c = solve_coefficients(&bc).unwrap();
        let want = [0.0, 0.0, 0.0, 100.0, -150.0, 60.0];
        for (got, want) in c.as_array().iter().zip(want) {
            assert_close(*got, want, 1e-12);
        }

        let [x0, v0, a0, _] = quintic_derivatives(c.as_array(), 0.0);
        let [x1, v1, a1, _] = quintic_derivatives(c.as_array(), 1.0);
        assert_close(x0, 0.0, 1e-12);
        assert_close(x1, 10.0, 1e-12);
        for v in [v0, v1, a0, a1] {
            assert!(v.abs() < 1e-9, "{v}");
        }
    }

    #[test]
    fn huge_duration_is_reported_as_out_of_range() {
        let err = solve_coefficients(&BoundaryConditions::rest_to_rest(0.0, 1.0, 1e70)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Domain);
        assert!(err.to_string().contains("not a normal float"));
    }

    #[test]
    fn boundary_conditions_are_satisfied() {
        let cases = [
            BoundaryConditions::new(0.0, 10.0, 0.0, 0.0, 0.0, 0.0, 1.0),
            BoundaryConditions::new(1.5, -3.0, 2.0, -1.0, 0.5, 4.0, 2.5),
            BoundaryConditions::new(-7.0, 12.0, 0.3, 0.0, -2.0, 1.0, 0.2),
            BoundaryConditions::new(100.0, 250.0, 5.0, 10.0, 0.0, -1.0, 40.0),
        ];

        for bc in cases {
            let c = solve_coefficients(&bc).unwrap();
            let [x0, v0, a0, _] = quintic_derivatives(c.as_array(), 0.0);
            let [xt, vt, at, _] = quintic_derivatives(c.as_array(), bc.duration);
            assert_close(x0, bc.x0, 1e-9);
            assert_close(v0, bc.v0, 1e-9);
            assert_close(a0, bc.a0, 1e-9);
            assert_close(xt, bc.x_end, 1e-9);
            assert_close(vt, bc.v_end, 1e-9);
            assert_close(at, bc.a_end, 1e-9);
        }
    }

    #[test]
    fn numeric_solve_matches_closed_form() {
        let cases = [
            BoundaryConditions::rest_to_rest(0.0, 1.0, 1.0),
            BoundaryConditions::new(1.5, -3.0, 2.0, -1.0, 0.5, 4.0, 2.5),
            BoundaryConditions::new(0.0, 5.0, 0.0, 0.0, 0.0, 0.0, 2.0),
            BoundaryConditions::new(3.0, 3.0, 1.0, 1.0, 0.0, 0.0, 0.7),
        ];
        for bc in cases {
            let closed = solve_coefficients(&bc).unwrap();
            let numeric = solve_coefficients_numeric(&bc).unwrap();
            for (a, b) in closed.as_array().iter().zip(numeric.as_array()) {
                assert_close(*a, *b, 1e-9);
            }
        }
    }

    #[test]
    fn zero_duration_is_a_domain_error() {
        let bc = BoundaryConditions::rest_to_rest(0.0, 1.0, 0.0);
        assert_eq!(solve_coefficients(&bc).unwrap_err().kind(), ErrorKind::Domain);
        assert_eq!(solve_coefficients_numeric(&bc).unwrap_err().kind(), ErrorKind::Domain);
    }

    #[test]
    fn degenerate_inputs_never_yield_non_finite_coefficients() {
        let cases = [
            BoundaryConditions::rest_to_rest(0.0, 1.0, -1.0),
            BoundaryConditions::rest_to_rest(0.0, 1.0, 1e-70),
            BoundaryConditions::rest_to_rest(0.0, f64::NAN, 1.0),
            BoundaryConditions::rest_to_rest(0.0, 1.0, f64::INFINITY),
            BoundaryConditions::rest_to_rest(0.0, 1e300, 1e-60),
        ];
        for bc in cases {
            let err = solve_coefficients(&bc).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Domain, "{bc:?}");
        }
    }

    #[test]
    fn doubling_displacement_doubles_high_coefficients() {
        let one = solve_coefficients(&BoundaryConditions::rest_to_rest(0.0, 3.0, 2.0)).unwrap();
        let two = solve_coefficients(&BoundaryConditions::rest_to_rest(0.0, 6.0, 2.0)).unwrap();
        for i in 3..6 {
            assert_close(two.as_array()[i], 2.0 * one.as_array()[i], 1e-12);
        }
    }
}
