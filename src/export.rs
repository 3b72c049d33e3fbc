//! Export of derived curves and raw channel tables.

use serde::Serialize;
use std::io::Write;
use std::path::Path;
use strum::{AsRefStr, EnumString, IntoEnumIterator};
use thiserror::Error;

use crate::analysis::TorqueCurve;
use crate::parsers::Run;
use crate::series::Series;
use crate::units::UnitPreferences;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON write failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("nothing to export, the curve is empty")]
    EmptyCurve,
}

/// Output format of an export
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    /// Pick the format from a file extension, `None` if unrecognized
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct ExportColumn {
    series: Series,
    label: String,
    values: Vec<f64>,
}

#[derive(Serialize)]
struct CurveDocument {
    units: UnitPreferences,
    samples: usize,
    peak_rpm_idx: Option<usize>,
    columns: Vec<ExportColumn>,
}

/// Write every series of a curve in the preferred units
pub fn export_curve<W: Write>(
    curve: &TorqueCurve,
    prefs: &UnitPreferences,
    writer: W,
    format: ExportFormat,
) -> Result<(), ExportError> {
    if curve.is_empty() {
        return Err(ExportError::EmptyCurve);
    }

    let columns: Vec<ExportColumn> = Series::iter()
        .map(|series| ExportColumn {
            series,
            label: series.display_label(prefs),
            values: series.values(curve, prefs),
        })
        .collect();

    match format {
        ExportFormat::Csv => {
            let mut csv = csv::Writer::from_writer(writer);
            csv.write_record(columns.iter().map(|c| c.label.as_str()))?;
            for i in 0..curve.len() {
                csv.write_record(columns.iter().map(|c| c.values[i].to_string()))?;
            }
            csv.flush()?;
        }
        ExportFormat::Json => {
            let doc = CurveDocument {
                units: *prefs,
                samples: curve.len(),
                peak_rpm_idx: curve.peak_rpm_idx,
                columns,
            };
            serde_json::to_writer_pretty(writer, &doc)?;
        }
    }

    tracing::info!("Exported {} curve samples as {}", curve.len(), format.as_ref());
    Ok(())
}

/// Write the raw channel table of a run as CSV, one column per slot
pub fn export_run_csv<W: Write>(run: &Run, writer: W) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);

    let channels: Vec<_> = run.channels().collect();
    csv.write_record(channels.iter().map(|(def, _)| {
        if def.unit.is_empty() {
            def.name.to_string()
        } else {
            format!("{} ({})", def.name, def.unit)
        }
    }))?;
    for row in 0..run.num_rows {
        csv.write_record(
            channels
                .iter()
                .map(|(_, values)| values.get(row).copied().unwrap_or(0.0).to_string()),
        )?;
    }
    csv.flush()?;

    tracing::info!(
        "Exported {} rows x {} channels",
        run.num_rows,
        channels.len()
    );
    Ok(())
}
