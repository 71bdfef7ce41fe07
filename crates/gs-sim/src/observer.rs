//! Telemetry hook for the mission loop.

use gs_core::{GliderState, MissionStatus};

use crate::{MissionReport, Setpoints};

/// Callbacks invoked by [`Mission::run`][crate::Mission::run].
///
/// All methods default to no-ops.  The sink only ever sees the state; how
/// (and whether) it is persisted is up to the implementation.
///
/// ```rust,ignore
/// struct DepthPrinter;
///
/// impl TelemetrySink for DepthPrinter {
///     fn on_step(&mut self, state: &GliderState, _status: MissionStatus) {
///         println!("{:.0} {:.1}", state.time(), state.get(Field::Depth));
///     }
/// }
/// ```
pub trait TelemetrySink {
    /// Once, before the first step.
    fn on_start(&mut self, _state: &GliderState) {}

    /// After every control cycle, with the setpoints it produced.
    fn on_cycle(&mut self, _state: &GliderState, _setpoints: &Setpoints) {}

    /// After every physics step.
    fn on_step(&mut self, _state: &GliderState, _status: MissionStatus) {}

    /// Once, when the loop ends without an error.
    fn on_end(&mut self, _state: &GliderState, _report: &MissionReport) {}
}

/// A [`TelemetrySink`] that records nothing.
pub struct NoopSink;

impl TelemetrySink for NoopSink {}
