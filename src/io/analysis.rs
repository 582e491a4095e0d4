//! Read/write scaling analysis JSON files.
//!
//! The JSON holds the sweep configuration, the raw peak-velocity surface, every
//! inner fit and the outer fit, so plots can be regenerated without re-running
//! the sweep.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::error::AppError;
use crate::fit::ScalingAnalysis;

/// Write a scaling analysis JSON file.
pub fn write_analysis_json(path: &Path, analysis: &ScalingAnalysis) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create analysis JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(BufWriter::new(file), analysis)
        .map_err(|e| AppError::io(format!("Failed to write analysis JSON: {e}")))?;

    Ok(())
}

/// Read a scaling analysis JSON file.
pub fn read_analysis_json(path: &Path) -> Result<ScalingAnalysis, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open analysis JSON '{}': {e}", path.display())))?;
    let analysis: ScalingAnalysis = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::io(format!("Invalid analysis JSON: {e}")))?;
    Ok(analysis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SweepConfig;
    use crate::fit::fit_scaling_laws;

    #[test]
    fn analysis_survives_a_file_round_trip() {
        let config = SweepConfig {
            duration_samples: 10,
            displacement_samples: 4,
            ..SweepConfig::default()
        };
        let analysis = fit_scaling_laws(&config).unwrap();

        let path = std::env::temp_dir().join(format!("mjt_analysis_{}.json", std::process::id()));
        write_analysis_json(&path, &analysis).unwrap();
        let back = read_analysis_json(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(back.config, analysis.config);
        assert_eq!(back.surface.displacements, analysis.surface.displacements);
        assert_eq!(back.displacement_law.model, analysis.displacement_law.model);
        let text = serde_json::to_string(&back.displacement_law).unwrap();
        assert!(text.contains("\"model\":\"affine_displacement\""));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_analysis_json(Path::new("/nonexistent/mjt.json")).unwrap_err();
        assert_eq!(err.exit_code(), 5);
    }
}
