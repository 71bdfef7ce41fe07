//! Plain data rows written by telemetry backends.

use gs_core::{Field, GliderState};
use gs_sim::MissionReport;

/// One sample of the full mission state.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRow {
    /// Epoch seconds.
    pub time:   f64,
    /// One value per [`Field`], in [`Field::ALL`] order.
    pub values: Vec<f64>,
}

impl SampleRow {
    pub fn from_state(state: &GliderState) -> Self {
        Self {
            time:   state.time(),
            values: Field::ALL.iter().map(|&f| state.get(f)).collect(),
        }
    }
}

/// The end-of-run summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub reason:     String,
    /// Raw `MissionStatus` bits.
    pub status:     u32,
    pub seconds:    f64,
    pub max_depth:  f64,
    pub surfacings: u32,
    pub groundings: u32,
}

impl From<&MissionReport> for SummaryRow {
    fn from(report: &MissionReport) -> Self {
        Self {
            reason:     report.reason.to_string(),
            status:     report.status.bits(),
            seconds:    report.seconds,
            max_depth:  report.max_depth,
            surfacings: report.surfacings,
            groundings: report.groundings,
        }
    }
}
