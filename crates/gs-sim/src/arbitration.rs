//! `LayeredControl` — the behavior stack and actuator arbitration.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use gs_control::{Channel, ControlBehavior, ControlResult, Directive};
use gs_core::{Field, GliderState, MissionStatus};
use gs_hardware::Hardware;
use log::trace;

/// Floor on the speed used to estimate time to a waypoint, m/s.
const MIN_AIM_SPEED: f64 = 0.1;

/// Concrete actuator setpoints for one control cycle.  `None` leaves the
/// actuator's current target alone.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Setpoints {
    /// Battery position, inch.
    pub battpos: Option<f64>,
    /// Pumped volume, cc.
    pub pump:    Option<f64>,
    /// Fin angle, rad.
    pub fin:     Option<f64>,
}

impl Setpoints {
    /// Forced while aborting or completed: nose up, full buoyancy, fin
    /// centred.  Out-of-range values clip at the actuator limits.
    pub const SAFE_ASCENT: Setpoints = Setpoints {
        battpos: Some(-100.0),
        pump:    Some(1000.0),
        fin:     Some(0.0),
    };

    /// Forced once the mission has been told to quit.
    pub const QUIT_ASCENT: Setpoints = Setpoints {
        battpos: Some(-10.0),
        pump:    Some(1000.0),
        fin:     Some(0.0),
    };

    /// Before the first cycle: at the surface, pump full, battery aft.
    pub const AT_SURFACE: Setpoints = Setpoints {
        battpos: Some(100.0),
        pump:    Some(1000.0),
        fin:     Some(0.0),
    };
}

// ── LayeredControl ────────────────────────────────────────────────────────────

/// Priority stack of behaviors.
///
/// Index 0 has the lowest priority, the last index the highest: every cycle
/// processes the stack from the bottom up and a later directive for a
/// channel replaces an earlier one.
pub struct LayeredControl {
    stack:     Vec<Box<dyn ControlBehavior>>,
    commanded: [Option<Directive>; 3],
}

impl Default for LayeredControl {
    fn default() -> Self {
        Self::new()
    }
}

impl LayeredControl {
    pub fn new() -> Self {
        Self { stack: Vec::new(), commanded: [None; 3] }
    }

    /// Initialise `behavior` and put it on top of the stack.
    pub fn push(&mut self, mut behavior: Box<dyn ControlBehavior>) -> ControlResult<()> {
        behavior.init()?;
        self.stack.push(behavior);
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Behaviors in push order: bottom of the stack (lowest priority) first,
    /// the behavior that wins every channel last.
    pub fn behaviors(&self) -> impl Iterator<Item = &dyn ControlBehavior> {
        self.stack.iter().map(|b| b.as_ref())
    }

    /// Any behavior is holding the vehicle at the surface for the operator.
    pub fn awaiting_operator(&self) -> bool {
        self.stack.iter().any(|b| b.awaiting_operator())
    }

    /// Directive currently registered for `channel` (only non-empty during a
    /// cycle).
    pub fn commanded(&self, channel: Channel) -> Option<Directive> {
        self.commanded[channel.index()]
    }

    /// One control cycle: run every behavior, then resolve the registered
    /// directives into setpoints.
    ///
    /// While the mission is aborting or already completed the behaviors are
    /// skipped and [`Setpoints::SAFE_ASCENT`] is returned.
    pub fn cycle(
        &mut self,
        state:    &mut GliderState,
        status:   &mut MissionStatus,
        hardware: &mut Hardware,
    ) -> ControlResult<Setpoints> {
        if status.overrides_behaviors() {
            return Ok(Setpoints::SAFE_ASCENT);
        }

        for i in 0..self.stack.len() {
            let behavior = &mut self.stack[i];
            behavior.process(state, status)?;
            trace!("{} -> {:?} {:?}", behavior.name(), behavior.phase(), behavior.directives());
            for &directive in behavior.directives() {
                self.commanded[directive.channel().index()] = Some(directive);
            }
            self.update_stack_counters(state);
        }

        let setpoints = self.resolve(state, hardware);
        self.commanded = [None; 3];
        Ok(setpoints)
    }

    /// Per-channel busy flags and the total over pump and pitch.
    ///
    /// A channel is busy while it holds a directive this cycle or while
    /// `keep_stack_busy` is set.  Registers only fill up during a cycle, so
    /// later behaviors see every channel claimed below them.
    fn update_stack_counters(&self, state: &mut GliderState) {
        let busy = state.flag(Field::KeepStackBusy);
        let count = |ch: Channel| if busy || self.commanded[ch.index()].is_some() { 1.0 } else { 0.0 };
        let pump = count(Channel::Pump);
        let pitch = count(Channel::PitchMotor);
        state.set(Field::BpumpStack, pump);
        state.set(Field::PitchStack, pitch);
        state.set(Field::FinStack, count(Channel::Fin));
        state.set(Field::Stack, pump + pitch);
    }

    /// Turn the registered directives into setpoints, writing the resolved
    /// `c_*` fields back into the state.
    pub fn resolve(&self, state: &mut GliderState, hardware: &mut Hardware) -> Setpoints {
        let t = state.time();
        let mut out = Setpoints::default();

        match self.commanded[Channel::PitchMotor.index()] {
            Some(Directive::Pitch(pitch)) => {
                let measured = state.get(Field::Pitch).tan();
                let delta = -hardware.pitch_pid.output(t, measured, pitch.tan());
                let battpos = state.get(Field::CBattPos) + delta;
                state.set(Field::CBattPos, battpos);
                state.set(Field::CPitch, pitch);
                out.battpos = Some(battpos);
            }
            Some(Directive::BattPos(battpos)) => {
                state.set(Field::CBattPos, battpos);
                out.battpos = Some(battpos);
            }
            _ => {}
        }

        if let Some(Directive::BallastPumped(volume)) = self.commanded[Channel::Pump.index()] {
            state.set(Field::CBallastPumped, volume);
            out.pump = Some(volume);
        }

        let fin = match self.commanded[Channel::Fin.index()] {
            Some(Directive::Fin(fin)) => Some(fin),
            Some(Directive::Heading(heading)) => Some(heading_to_fin(state, hardware, heading)),
            Some(Directive::Waypoint { x, y }) => {
                let heading = aim_at(state, x, y);
                state.set(Field::CHeading, heading);
                Some(heading_to_fin(state, hardware, heading))
            }
            _ => None,
        };
        if let Some(fin) = fin {
            state.set(Field::CFin, fin);
            out.fin = Some(fin);
        }
        out
    }
}

/// `angle` wrapped into `(-π, π]`.
pub fn wrap_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    if a > PI { a - TAU } else { a }
}

/// Fin command from the heading PID, acting on the shortest-way heading
/// error.
fn heading_to_fin(state: &GliderState, hardware: &mut Hardware, heading: f64) -> f64 {
    let error = wrap_angle(heading - state.get(Field::Heading));
    hardware.fin_pid.output(state.time(), heading - error, heading)
}

/// Heading (rad, clockwise from north, `[0, 2π)`) from the dead-reckoned
/// position towards LMC `(x, y)`.
///
/// With current correction enabled and a drift estimate available, the aim
/// point is moved against the drift expected over the remaining transit.
pub fn aim_at(state: &GliderState, x: f64, y: f64) -> f64 {
    let dx = x - state.get(Field::LmcX);
    let dy = y - state.get(Field::LmcY);
    let (vx, vy) = (state.get(Field::WaterVx), state.get(Field::WaterVy));
    let have_drift = vx != 0.0 && vy != 0.0 && !(vx == -1.0 && vy == -1.0);
    let (cdx, cdy) = if state.flag(Field::UseCurrentCorrection) && have_drift {
        let transit = dx.hypot(dy) / state.get(Field::Speed).max(MIN_AIM_SPEED);
        (transit * vx, transit * vy)
    } else {
        (0.0, 0.0)
    };
    let phi = (dy - cdy).atan2(dx - cdx);
    (FRAC_PI_2 - phi).rem_euclid(TAU)
}
