//! Horner evaluation of the quintic and its first three derivatives.
//!
//! For `x(t) = Σ c_i t^i` the derivatives have coefficients
//!
//! ```text
//! v:  [1·c1, 2·c2, 3·c3, 4·c4,  5·c5]
//! a:  [2·c2, 6·c3, 12·c4, 20·c5]
//! j:  [6·c3, 24·c4, 60·c5]
//! ```
//!
//! Each is evaluated with Horner's scheme, which avoids forming `t^5`
//! explicitly and stays well conditioned for both very short and very long
//! durations.

/// Evaluate `Σ coeffs[i] · t^i`.
pub fn horner(coeffs: &[f64], t: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * t + c)
}

/// Evaluate position, velocity, acceleration and jerk of a quintic at `t`.
pub fn quintic_derivatives(c: &[f64; 6], t: f64) -> [f64; 4] {
    let x = horner(c, t);
    let v = horner(&[c[1], 2.0 * c[2], 3.0 * c[3], 4.0 * c[4], 5.0 * c[5]], t);
    let a = horner(&[2.0 * c[2], 6.0 * c[3], 12.0 * c[4], 20.0 * c[5]], t);
    let j = horner(&[6.0 * c[3], 24.0 * c[4], 60.0 * c[5]], t);
    [x, v, a, j]
}
