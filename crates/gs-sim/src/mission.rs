//! The mission driver loop.

use std::fmt;

use gs_core::{time, Field, GliderState, MissionStatus};
use log::info;

use crate::{Glider, LayeredControl, Setpoints, SimError, SimResult, TelemetrySink};

/// Why a run ended without an error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EndReason {
    /// The mission quit and the vehicle reached the surface.
    Completed,
    /// An abort bit was raised and the vehicle reached the surface.
    Aborted,
    /// The configured maximum duration elapsed.
    MaxDuration,
    /// The configured number of surfacings was reached.
    Surfaced,
    /// The configured number of bottom contacts was reached.
    Grounded,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EndReason::Completed   => "completed",
            EndReason::Aborted     => "aborted",
            EndReason::MaxDuration => "maximum duration reached",
            EndReason::Surfaced    => "surfaced",
            EndReason::Grounded    => "grounded",
        })
    }
}

/// Summary of one run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MissionReport {
    pub reason:     EndReason,
    pub status:     MissionStatus,
    /// Simulated seconds since mission start.
    pub seconds:    f64,
    pub max_depth:  f64,
    pub surfacings: u32,
    pub groundings: u32,
}

impl fmt::Display for MissionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mission {} after {} (status {:?}), max depth {:.1} m, {} surfacing(s), {} grounding(s)",
            self.reason,
            time::format_elapsed(self.seconds),
            self.status,
            self.max_depth,
            self.surfacings,
            self.groundings,
        )
    }
}

/// Loop settings copied out of the mission configuration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RunSettings {
    pub dt:                 f64,
    pub cpu_cycle:          f64,
    pub max_days:           Option<f64>,
    pub end_on_surfacing:   u32,
    pub end_on_grounding:   u32,
    pub crush_depth:        f64,
    pub data_transfer_time: f64,
}

/// Edge-triggered counters kept across loop iterations.
#[derive(Default)]
struct Tally {
    surfacings: u32,
    groundings: u32,
    max_depth:  f64,
    awaiting:   bool,
    grounded:   bool,
}

// ── Mission ───────────────────────────────────────────────────────────────────

/// One mission run: the state, the status bits, the behavior stack and the
/// vehicle.
///
/// Create via [`MissionBuilder`][crate::MissionBuilder].
pub struct Mission {
    pub(crate) settings: RunSettings,
    pub(crate) state:    GliderState,
    pub(crate) status:   MissionStatus,
    pub(crate) control:  LayeredControl,
    pub(crate) glider:   Glider,
}

impl Mission {
    #[inline]
    pub fn state(&self) -> &GliderState {
        &self.state
    }

    #[inline]
    pub fn state_mut(&mut self) -> &mut GliderState {
        &mut self.state
    }

    #[inline]
    pub fn status(&self) -> MissionStatus {
        self.status
    }

    #[inline]
    pub fn control(&self) -> &LayeredControl {
        &self.control
    }

    #[inline]
    pub fn glider(&self) -> &Glider {
        &self.glider
    }

    #[inline]
    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    /// Preset a state field by its flight-computer name.
    pub fn sensor(&mut self, name: &str, value: f64) -> SimResult<()> {
        self.state.set_by_name(name, value)?;
        info!("sensor preset {name} = {value}");
        Ok(())
    }

    /// Run to the end.
    ///
    /// Per physics step: a control cycle when one is due, surface and quit
    /// overrides, actuator commands, termination checks, then the vehicle
    /// update.  Exceeding the crush depth or a repeated environment anomaly
    /// aborts the run with an error.
    pub fn run<S: TelemetrySink>(&mut self, sink: &mut S) -> SimResult<MissionReport> {
        let s = self.settings;
        if self.state.flag(Field::Pickup) {
            self.state.set(Field::TimeSinceCycleStart, s.data_transfer_time);
        }
        self.status = MissionStatus::start();
        self.glider.command(&mut self.state, Setpoints::AT_SURFACE);
        info!(
            "mission started at {} with {} behavior(s), water from `{}`",
            self.state.position(),
            self.control.len(),
            self.glider.environment_name(),
        );
        sink.on_start(&self.state);

        let mut setpoints = Setpoints::default();
        let mut since_cycle = f64::INFINITY;
        let mut tally = Tally::default();

        let reason = loop {
            if since_cycle >= s.cpu_cycle {
                setpoints = self.control.cycle(&mut self.state, &mut self.status, &mut self.glider.hardware)?;
                sink.on_cycle(&self.state, &setpoints);
                since_cycle = 0.0;
            }

            let depth = self.state.get(Field::Depth);
            let at_surface = depth < self.glider.surface_depth();
            if at_surface {
                setpoints.fin = Some(0.0);
                self.glider.hardware.fin_pid.reset();
            }
            if self.status.contains(MissionStatus::TO_QUIT) {
                setpoints = Setpoints::QUIT_ASCENT;
                if at_surface {
                    self.status.raise(MissionStatus::COMPLETED);
                }
            }
            self.glider.command(&mut self.state, setpoints);

            if self.status.contains(MissionStatus::COMPLETED) {
                break EndReason::Completed;
            }
            if self.status.is_aborting() && at_surface {
                break EndReason::Aborted;
            }
            if depth > s.crush_depth {
                return Err(SimError::DepthExceeded { depth, limit: s.crush_depth });
            }
            if let Some(days) = s.max_days {
                if self.state.get(Field::PresentSecsIntoMission) > days * 86_400.0 {
                    info!("maximum mission duration of {days} day(s) reached");
                    break EndReason::MaxDuration;
                }
            }

            let awaiting = self.control.awaiting_operator();
            if awaiting && !tally.awaiting {
                tally.surfacings += 1;
                info!("surfaced for the operator ({} time(s))", tally.surfacings);
                if s.end_on_surfacing > 0 && tally.surfacings >= s.end_on_surfacing {
                    break EndReason::Surfaced;
                }
            }
            tally.awaiting = awaiting;

            let grounded = !at_surface && self.state.get(Field::Altitude) <= 0.0;
            if grounded && !tally.grounded {
                tally.groundings += 1;
                info!("bottom contact at {depth:.1} m ({} time(s))", tally.groundings);
                if s.end_on_grounding > 0 && tally.groundings >= s.end_on_grounding {
                    break EndReason::Grounded;
                }
            }
            tally.grounded = grounded;

            self.glider.update(&mut self.state)?;
            tally.max_depth = tally.max_depth.max(self.state.get(Field::Depth));
            sink.on_step(&self.state, self.status);
            since_cycle += s.dt;
        };

        let report = MissionReport {
            reason,
            status:     self.status,
            seconds:    self.state.get(Field::PresentSecsIntoMission),
            max_depth:  tally.max_depth,
            surfacings: tally.surfacings,
            groundings: tally.groundings,
        };
        info!("{report}");
        sink.on_end(&self.state, &report);
        Ok(report)
    }
}
