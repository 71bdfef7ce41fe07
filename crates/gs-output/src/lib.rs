//! `gs-output` — telemetry writers for the glidersim mission loop.
//!
//! | Backend | Files created                      |
//! |---------|------------------------------------|
//! | CSV     | `telemetry.csv`, `summary.csv`     |
//!
//! Backends implement [`TelemetryWriter`] and are driven by
//! [`TelemetryRecorder`], which implements `gs_sim::TelemetrySink`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use gs_output::{CsvWriter, TelemetryRecorder};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut recorder = TelemetryRecorder::new(writer, config.store_period);
//! let report = mission.run(&mut recorder)?;
//! if let Some(e) = recorder.take_error() {
//!     eprintln!("telemetry error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod recorder;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use recorder::TelemetryRecorder;
pub use row::{SampleRow, SummaryRow};
pub use writer::TelemetryWriter;
