//! CSV telemetry backend.
//!
//! Creates two files in the configured output directory:
//! - `telemetry.csv`: `time` then one column per state field
//! - `summary.csv`: one row per finished run

use std::fs::File;
use std::path::Path;

use csv::Writer;
use gs_core::Field;

use crate::writer::TelemetryWriter;
use crate::{OutputError, OutputResult, SampleRow, SummaryRow};

pub const TELEMETRY_FILE: &str = "telemetry.csv";
pub const SUMMARY_FILE: &str = "summary.csv";

/// Writes telemetry to two CSV files.
pub struct CsvWriter {
    samples:   Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut samples = Writer::from_path(dir.join(TELEMETRY_FILE))?;
        samples.write_record(std::iter::once("time").chain(Field::ALL.iter().map(|f| f.name())))?;

        let mut summaries = Writer::from_path(dir.join(SUMMARY_FILE))?;
        summaries.write_record(["reason", "status", "seconds", "max_depth", "surfacings", "groundings"])?;

        Ok(Self {
            samples,
            summaries,
            finished: false,
        })
    }
}

impl TelemetryWriter for CsvWriter {
    fn write_sample(&mut self, row: &SampleRow) -> OutputResult<()> {
        if row.values.len() != Field::COUNT {
            return Err(OutputError::RowWidth { expected: Field::COUNT, got: row.values.len() });
        }
        self.samples.write_record(
            std::iter::once(row.time.to_string()).chain(row.values.iter().map(f64::to_string)),
        )?;
        Ok(())
    }

    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.reason.clone(),
            row.status.to_string(),
            row.seconds.to_string(),
            row.max_depth.to_string(),
            row.surfacings.to_string(),
            row.groundings.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.samples.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
