//! Export a sampled trajectory to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or plotting scripts.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::TrajectorySeries;
use crate::error::AppError;

/// Write `t,x,v,a,j` rows to a CSV file.
pub fn write_series_csv(path: &Path, series: &TrajectorySeries) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut file = BufWriter::new(file);

    writeln!(file, "t,x,v,a,j").map_err(|e| AppError::io(format!("Failed to write export CSV header: {e}")))?;

    for i in 0..series.len() {
        writeln!(
            file,
            "{:.10},{:.10},{:.10},{:.10},{:.10}",
            series.t[i], series.x[i], series.v[i], series.a[i], series.j[i]
        )
        .map_err(|e| AppError::io(format!("Failed to write export CSV row: {e}")))?;
    }

    file.flush()
        .map_err(|e| AppError::io(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}
