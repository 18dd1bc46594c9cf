use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::color::{ColorMeasurement, METRIC_NAMES};
use crate::data::model::SpectrumMatrix;

// ---------------------------------------------------------------------------
// Raw spectra table
// ---------------------------------------------------------------------------

/// Write the resampled batch as CSV: first column the wavelength grid,
/// then one column per sample, values to 4 decimal places.
pub fn write_matrix_csv<W: Write>(sink: W, matrix: &SpectrumMatrix) -> Result<()> {
    let mut writer = csv::Writer::from_writer(sink);

    let mut header = vec!["nanometers".to_string()];
    header.extend(matrix.labels.iter().cloned());
    writer.write_record(&header).context("writing CSV header")?;

    for (j, nm) in matrix.grid.iter().enumerate() {
        let mut record = vec![format!("{nm:.4}")];
        record.extend(matrix.rows.iter().map(|row| format!("{:.4}", row[j])));
        writer.write_record(&record).context("writing CSV row")?;
    }

    writer.flush().context("flushing CSV")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Colorimetric summary table
// ---------------------------------------------------------------------------

/// Write one convention's summary as CSV: metric rows down, sample columns
/// across, values to 3 decimal places.
pub fn write_summary_csv<W: Write>(
    sink: W,
    labels: &[String],
    results: &[ColorMeasurement],
) -> Result<()> {
    let mut writer = csv::Writer::from_writer(sink);

    let mut header = vec!["Value".to_string()];
    header.extend(labels.iter().cloned());
    writer.write_record(&header).context("writing summary header")?;

    for (k, name) in METRIC_NAMES.iter().enumerate() {
        let mut record = vec![name.to_string()];
        record.extend(results.iter().map(|r| format!("{:.3}", r.as_row()[k])));
        writer.write_record(&record).context("writing summary row")?;
    }

    writer.flush().context("flushing summary")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON summary
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct SummaryRecord<'a> {
    label: &'a str,
    #[serde(flatten)]
    values: &'a ColorMeasurement,
}

#[derive(Serialize)]
struct Summary<'a> {
    macedonia: Vec<SummaryRecord<'a>>,
    endler: Vec<SummaryRecord<'a>>,
}

/// Records-oriented JSON rendition of both conventions' summaries.
/// Non-finite values (the NaN hue sentinel) serialize as `null`.
pub fn summary_json<'a>(
    labels: &'a [String],
    macedonia: &'a [ColorMeasurement],
    endler: &'a [ColorMeasurement],
) -> Result<String> {
    let records = |results: &'a [ColorMeasurement]| {
        labels
            .iter()
            .zip(results.iter())
            .map(|(label, values)| SummaryRecord {
                label: label.as_str(),
                values,
            })
            .collect::<Vec<_>>()
    };
    let summary = Summary {
        macedonia: records(macedonia),
        endler: records(endler),
    };
    serde_json::to_string_pretty(&summary).context("serializing JSON summary")
}
