//! Plain-text formatting of results.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized

use crate::domain::{BoundaryConditions, Coefficients, ScalingLaw, StepSchedule, TrajectorySeries};
use crate::fit::ScalingAnalysis;
use crate::trajectory::PeakVelocity;

/// Format boundary conditions, coefficients and the peak velocity.
pub fn format_coefficients(bc: &BoundaryConditions, coeffs: &Coefficients, peak: &PeakVelocity) -> String {
    let mut out = String::new();

    out.push_str("=== mjt - minimum-jerk coefficients ===\n");
    out.push_str(&format!(
        "x0={} xT={} v0={} vT={} a0={} aT={} T={}\n",
        bc.x0, bc.x_end, bc.v0, bc.v_end, bc.a0, bc.a_end, bc.duration
    ));
    out.push('\n');
    for (i, c) in coeffs.as_array().iter().enumerate() {
        out.push_str(&format!("c{i} = {c:.10}\n"));
    }
    out.push_str(&format!("\nPeak velocity: v={:.6} at t={:.6}\n", peak.v, peak.t));

    out
}

/// Format a sampled trajectory as an aligned table.
pub fn format_series(series: &TrajectorySeries) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>12} {:>14} {:>14} {:>14} {:>14}\n",
        "t", "x", "v", "a", "j"
    ));
    for i in 0..series.len() {
        out.push_str(&format!(
            "{:>12.6} {:>14.6} {:>14.6} {:>14.6} {:>14.6}\n",
            series.t[i], series.x[i], series.v[i], series.a[i], series.j[i]
        ));
    }
    out
}

/// Format the scaling analysis summary.
pub fn format_analysis(analysis: &ScalingAnalysis) -> String {
    let mut out = String::new();
    let c = &analysis.config;

    out.push_str("=== mjt - scaling laws ===\n");
    out.push_str(&format!(
        "Durations: n={} | T=[{:.3}, {:.3}]\n",
        c.duration_samples, c.duration_min, c.duration_max
    ));
    out.push_str(&format!(
        "Displacements: n={} | xT=[{:.3}, {:.3}]\n",
        c.displacement_samples, c.displacement_min, c.displacement_max
    ));
    out.push_str(&format!("Peak: {:?} | noise sigma={}\n", c.peak, c.noise_sigma));

    out.push_str("\nMapping function for T to Vmax: Vmax = a * T^-1\n");
    if let (Some(first), Some(last)) = (analysis.duration_laws.first(), analysis.duration_laws.last()) {
        out.push_str(&format!("  xT={:.4}: {}\n", analysis.surface.displacements[0], fmt_law(first)));
        let n = analysis.duration_laws.len();
        if n > 1 {
            out.push_str(&format!(
                "  xT={:.4}: {}\n",
                analysis.surface.displacements[n - 1],
                fmt_law(last)
            ));
        }
    }

    let b = analysis.displacement_law.parameters[0];
    let cc = analysis.displacement_law.parameters[1];
    out.push_str(&format!(
        "\nMapping function for xT to a: a = {b:.4} * xT + {cc:.4}\n"
    ));
    out.push_str(&format!("  {}\n", fmt_law(&analysis.displacement_law)));

    if analysis.flagged.is_empty() {
        out.push_str("\nAll inner fits within threshold.\n");
    } else {
        out.push_str(&format!(
            "\nFlagged inner fits ({} of {}, rel rmse > {:.1e}): {}\n",
            analysis.flagged.len(),
            analysis.duration_laws.len(),
            c.flag_rel_rmse,
            fmt_indices(&analysis.flagged)
        ));
    }

    out
}

/// Format a step schedule summary plus its first few intervals.
pub fn format_schedule(schedule: &StepSchedule, preview: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Steps: {} ({:?}) | step={} | tick={} | total={:.6}s\n",
        schedule.steps(),
        schedule.direction,
        schedule.step_size,
        schedule.tick,
        schedule.total_time()
    ));
    for (i, dt) in schedule.intervals.iter().take(preview).enumerate() {
        out.push_str(&format!("{i:>6} {dt:.6}\n"));
    }
    if schedule.steps() > preview {
        out.push_str(&format!("   ... {} more\n", schedule.steps() - preview));
    }
    out
}

fn fmt_law(law: &ScalingLaw) -> String {
    let params = law
        .model
        .param_names()
        .iter()
        .zip(&law.parameters)
        .map(|(name, v)| format!("{name}={v:.6}"))
        .collect::<Vec<_>>()
        .join(" ");
    let se = match &law.quality.std_errors {
        Some(se) => format!(" se=[{}]", fmt_vec(se)),
        None => String::new(),
    };
    format!(
        "{params} | SSE={:.3e} RMSE={:.3e} iters={}{se}",
        law.quality.sse, law.quality.rmse, law.quality.iterations
    )
}

fn fmt_vec(v: &[f64]) -> String {
    v.iter().map(|x| format!("{x:.3e}")).collect::<Vec<_>>().join(", ")
}

fn fmt_indices(v: &[usize]) -> String {
    const MAX_SHOWN: usize = 10;
    let mut s = v
        .iter()
        .take(MAX_SHOWN)
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    if v.len() > MAX_SHOWN {
        s.push_str(", ...");
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PeakMethod, SweepConfig};
    use crate::fit::fit_scaling_laws;
    use crate::trajectory::Trajectory;

    #[test]
    fn coefficient_report_lists_all_six() {
        let traj = Trajectory::new(BoundaryConditions::rest_to_rest(0.0, 10.0, 1.0)).unwrap();
        let text = format_coefficients(
            traj.boundary(),
            traj.coefficients(),
            &traj.peak_velocity(PeakMethod::Midpoint),
        );
        assert!(text.contains("c3 = 100.0000000000"));
        assert!(text.contains("c5 = 60.0000000000"));
        assert!(text.contains("v=18.750000"));
    }

    #[test]
    fn analysis_report_prints_mapping() {
        let config = SweepConfig {
            duration_samples: 20,
            displacement_samples: 5,
            ..SweepConfig::default()
        };
        let analysis = fit_scaling_laws(&config).unwrap();
        let text = format_analysis(&analysis);
        assert!(text.contains("a = 1.8750 * xT + "), "{text}");
        assert!(text.contains("All inner fits within threshold."));
    }
}
