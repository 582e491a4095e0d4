//! Shared domain types.
//!
//! Everything here is a plain value: computed on demand, never mutated after
//! construction, and serializable so results can be exported for plotting.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Position, velocity and acceleration at both ends of a move, plus its duration.
///
/// `duration` must be strictly positive; the solver rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryConditions {
    pub x0: f64,
    pub x_end: f64,
    pub v0: f64,
    pub v_end: f64,
    pub a0: f64,
    pub a_end: f64,
    pub duration: f64,
}

impl BoundaryConditions {
    pub fn new(x0: f64, x_end: f64, v0: f64, v_end: f64, a0: f64, a_end: f64, duration: f64) -> Self {
        Self {
            x0,
            x_end,
            v0,
            v_end,
            a0,
            a_end,
            duration,
        }
    }

    /// Start and end at rest (zero velocity and acceleration).
    pub fn rest_to_rest(x0: f64, x_end: f64, duration: f64) -> Self {
        Self::new(x0, x_end, 0.0, 0.0, 0.0, 0.0, duration)
    }

    /// True when all derivative constraints are zero.
    ///
    /// Only in this case is the velocity peak guaranteed to sit at `T/2`.
    pub fn is_rest_to_rest(&self) -> bool {
        self.v0 == 0.0 && self.v_end == 0.0 && self.a0 == 0.0 && self.a_end == 0.0
    }

    pub fn displacement(&self) -> f64 {
        self.x_end - self.x0
    }

    pub(crate) fn values(&self) -> [f64; 7] {
        [
            self.x0,
            self.x_end,
            self.v0,
            self.v_end,
            self.a0,
            self.a_end,
            self.duration,
        ]
    }
}

/// Coefficients `[c0..c5]` of `x(t) = Σ c_i t^i`.
///
/// Only the solver constructs these, so a value in hand always satisfies its
/// boundary conditions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coefficients([f64; 6]);

impl Coefficients {
    pub(crate) fn from_array(c: [f64; 6]) -> Self {
        Self(c)
    }

    pub fn as_array(&self) -> &[f64; 6] {
        &self.0
    }
}

/// Position and its first three derivatives at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    pub t: f64,
    pub x: f64,
    pub v: f64,
    pub a: f64,
    pub j: f64,
}

/// Parallel sample arrays over `[0, T]`, ready for plotting or CSV export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySeries {
    pub t: Vec<f64>,
    pub x: Vec<f64>,
    pub v: Vec<f64>,
    pub a: Vec<f64>,
    pub j: Vec<f64>,
}

impl TrajectorySeries {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            t: Vec::with_capacity(n),
            x: Vec::with_capacity(n),
            v: Vec::with_capacity(n),
            a: Vec::with_capacity(n),
            j: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, s: TrajectorySample) {
        self.t.push(s.t);
        self.x.push(s.x);
        self.v.push(s.v);
        self.a.push(s.a);
        self.j.push(s.j);
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }
}

/// How the peak velocity of a trajectory is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PeakMethod {
    /// Evaluate `v(T/2)`. Exact for rest-to-rest moves only.
    Midpoint,
    /// Locate the extremum through the roots of `a(t)` on `[0, T]`.
    Located,
}

/// Functional form of a fitted scaling law.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LawKind {
    /// `Vmax(T) = a / T`
    InverseDuration,
    /// `a(xT) = b·xT + c`
    AffineDisplacement,
}

impl LawKind {
    pub fn display_name(self) -> &'static str {
        match self {
            LawKind::InverseDuration => "Vmax = a * T^-1",
            LawKind::AffineDisplacement => "a = b * xT + c",
        }
    }

    pub fn param_names(self) -> &'static [&'static str] {
        match self {
            LawKind::InverseDuration => &["a"],
            LawKind::AffineDisplacement => &["b", "c"],
        }
    }

    pub fn param_len(self) -> usize {
        self.param_names().len()
    }
}

/// Residual and uncertainty diagnostics of a least-squares fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitQuality {
    pub n: usize,
    pub sse: f64,
    pub rmse: f64,
    pub iterations: usize,
    /// `(JᵀJ)⁻¹ · SSE / (n − p)`; absent when not estimable.
    pub covariance: Option<Vec<Vec<f64>>>,
    /// Square roots of the covariance diagonal.
    pub std_errors: Option<Vec<f64>>,
}

/// A fitted law: its form, its parameters and how well it fits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingLaw {
    pub model: LawKind,
    pub model_name: String,
    pub parameters: Vec<f64>,
    pub quality: FitQuality,
}

impl ScalingLaw {
    pub fn new(model: LawKind, parameters: Vec<f64>, quality: FitQuality) -> Self {
        Self {
            model,
            model_name: model.display_name().to_string(),
            parameters,
            quality,
        }
    }

    /// Evaluate the law at `x` (duration or displacement, depending on the form).
    pub fn predict(&self, x: f64) -> f64 {
        crate::models::predict(self.model, x, &self.parameters)
    }
}

/// Levenberg–Marquardt settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitOptions {
    pub max_iterations: usize,
    /// Relative SSE reduction below which the fit is converged.
    pub ftol: f64,
    /// Relative step size below which the fit is converged.
    pub xtol: f64,
    /// Initial damping.
    pub lambda0: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            ftol: 1e-12,
            xtol: 1e-10,
            lambda0: 1e-3,
        }
    }
}

/// Duration × displacement sweep configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    pub duration_min: f64,
    pub duration_max: f64,
    pub duration_samples: usize,

    pub displacement_min: f64,
    pub displacement_max: f64,
    pub displacement_samples: usize,

    pub peak: PeakMethod,

    /// Standard deviation of Gaussian noise added to each peak velocity (0 disables).
    pub noise_sigma: f64,
    /// Base seed for the noise generator.
    pub seed: u64,

    /// Inner fits with `rmse / mean|Vmax|` above this are flagged.
    pub flag_rel_rmse: f64,

    pub fit: FitOptions,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            duration_min: 0.1,
            duration_max: 10.0,
            duration_samples: 1000,
            displacement_min: 0.1,
            displacement_max: 10.0,
            displacement_samples: 1000,
            peak: PeakMethod::Midpoint,
            noise_sigma: 0.0,
            seed: 42,
            flag_rel_rmse: 1e-6,
            fit: FitOptions::default(),
        }
    }
}

/// Direction of travel for a step schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepDirection {
    Forward,
    Reverse,
}

/// Time between consecutive unit steps along a trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepSchedule {
    pub step_size: f64,
    pub tick: f64,
    pub direction: StepDirection,
    /// One interval per step, in seconds, each a multiple of `tick`.
    pub intervals: Vec<f64>,
}

impl StepSchedule {
    pub fn steps(&self) -> usize {
        self.intervals.len()
    }

    pub fn total_time(&self) -> f64 {
        self.intervals.iter().sum()
    }
}
