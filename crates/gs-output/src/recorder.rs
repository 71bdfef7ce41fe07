//! `TelemetryRecorder<W>` — bridges `TelemetrySink` to a `TelemetryWriter`.

use gs_core::{Field, GliderState, MissionStatus};
use gs_sim::{MissionReport, TelemetrySink};
use log::debug;

use crate::row::{SampleRow, SummaryRow};
use crate::writer::TelemetryWriter;
use crate::{OutputError, OutputResult};

/// A [`TelemetrySink`] that samples the mission state every `store_period`
/// seconds of simulated time and writes it to any [`TelemetryWriter`].
///
/// The first sample is taken at the start and a last one at the end of the
/// run.  Errors from the writer are stored internally because sink methods
/// have no return value; check them with [`take_error`][Self::take_error]
/// after `mission.run()` returns.
pub struct TelemetryRecorder<W: TelemetryWriter> {
    writer:       W,
    store_period: f64,
    next_sample:  f64,
    last_sampled: Option<f64>,
    samples:      usize,
    last_error:   Option<OutputError>,
}

impl<W: TelemetryWriter> TelemetryRecorder<W> {
    /// `store_period` in seconds; non-positive values sample every step.
    pub fn new(writer: W, store_period: f64) -> Self {
        Self {
            writer,
            store_period: store_period.max(0.0),
            next_sample:  0.0,
            last_sampled: None,
            samples:      0,
            last_error:   None,
        }
    }

    /// Take the stored write error (if any) after the run.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Number of state samples handed to the writer.
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Unwrap the inner writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn sample(&mut self, state: &GliderState) {
        let secs = state.get(Field::PresentSecsIntoMission);
        let result = self.writer.write_sample(&SampleRow::from_state(state));
        self.store_err(result);
        self.samples += 1;
        self.last_sampled = Some(secs);
        if self.store_period > 0.0 {
            while self.next_sample <= secs {
                self.next_sample += self.store_period;
            }
        } else {
            self.next_sample = secs;
        }
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // first error wins
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: TelemetryWriter> TelemetrySink for TelemetryRecorder<W> {
    fn on_start(&mut self, state: &GliderState) {
        self.next_sample = state.get(Field::PresentSecsIntoMission);
        self.sample(state);
    }

    fn on_step(&mut self, state: &GliderState, _status: MissionStatus) {
        if state.get(Field::PresentSecsIntoMission) >= self.next_sample {
            self.sample(state);
        }
    }

    fn on_end(&mut self, state: &GliderState, report: &MissionReport) {
        if self.last_sampled != Some(state.get(Field::PresentSecsIntoMission)) {
            self.sample(state);
        }
        let result = self.writer.write_summary(&SummaryRow::from(report));
        self.store_err(result);
        let result = self.writer.finish();
        self.store_err(result);
        debug!("telemetry: {} sample(s) written", self.samples);
    }
}
