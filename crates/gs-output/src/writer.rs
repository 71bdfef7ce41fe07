//! The `TelemetryWriter` trait implemented by backend writers.

use crate::{OutputResult, SampleRow, SummaryRow};

/// Destination for telemetry rows.
///
/// Errors never interrupt a run: [`TelemetryRecorder`][crate::TelemetryRecorder]
/// stores the first one for [`take_error`][crate::TelemetryRecorder::take_error].
pub trait TelemetryWriter {
    /// Write one state sample.
    fn write_sample(&mut self, row: &SampleRow) -> OutputResult<()>;

    /// Write the end-of-run summary.
    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
