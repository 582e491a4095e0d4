//! Sweep configuration validation.

use crate::domain::{LawKind, SweepConfig};
use crate::error::AppError;

/// Every grid must carry at least its two endpoints.
const MIN_SAMPLES: usize = 2;

impl SweepConfig {
    /// Reject configurations that cannot produce a well-posed pair of fits.
    pub fn validate(&self) -> Result<(), AppError> {
        if !(self.duration_min.is_finite() && self.duration_max.is_finite()) {
            return Err(AppError::config(format!(
                "Invalid duration range: min={}, max={} (must be finite).",
                self.duration_min, self.duration_max
            )));
        }
        if self.duration_min <= 0.0 {
            return Err(AppError::config(format!(
                "Duration range must be positive (min={}).",
                self.duration_min
            )));
        }
        if self.duration_max <= self.duration_min {
            return Err(AppError::config(format!(
                "Invalid duration range: max={} must exceed min={}.",
                self.duration_max, self.duration_min
            )));
        }

        if !(self.displacement_min.is_finite() && self.displacement_max.is_finite()) {
            return Err(AppError::config(format!(
                "Invalid displacement range: min={}, max={} (must be finite).",
                self.displacement_min, self.displacement_max
            )));
        }
        if self.displacement_min <= 0.0 {
            return Err(AppError::config(format!(
                "Displacement range must be positive (min={}).",
                self.displacement_min
            )));
        }
        if self.displacement_max <= self.displacement_min {
            return Err(AppError::config(format!(
                "Invalid displacement range: max={} must exceed min={}.",
                self.displacement_max, self.displacement_min
            )));
        }

        check_samples("duration", self.duration_samples, LawKind::InverseDuration)?;
        check_samples("displacement", self.displacement_samples, LawKind::AffineDisplacement)?;

        if !(self.noise_sigma.is_finite() && self.noise_sigma >= 0.0) {
            return Err(AppError::config(format!(
                "Noise sigma must be finite and >= 0 (got {}).",
                self.noise_sigma
            )));
        }
        if !(self.flag_rel_rmse.is_finite() && self.flag_rel_rmse > 0.0) {
            return Err(AppError::config(format!(
                "Flag threshold must be finite and > 0 (got {}).",
                self.flag_rel_rmse
            )));
        }

        let fit = &self.fit;
        if fit.max_iterations == 0 {
            return Err(AppError::config("Fit max iterations must be >= 1."));
        }
        for (name, v) in [("ftol", fit.ftol), ("xtol", fit.xtol), ("lambda0", fit.lambda0)] {
            if !(v.is_finite() && v > 0.0) {
                return Err(AppError::config(format!("Fit {name} must be finite and > 0 (got {v}).")));
            }
        }

        Ok(())
    }
}

fn check_samples(axis: &str, samples: usize, law: LawKind) -> Result<(), AppError> {
    let min = MIN_SAMPLES.max(law.param_len());
    if samples < min {
        return Err(AppError::config(format!(
            "{axis} samples must be >= {min} to fit `{}` (got {samples}).",
            law.display_name()
        )));
    }
    Ok(())
}
