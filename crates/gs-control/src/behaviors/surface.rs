//! `Surface`: climb to the surface, get a fix, talk to the operator, resume.

use gs_core::{Field, MissionStatus};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::behavior::{ActionContext, BehaviorLogic, StartWhen};
use crate::behaviors::dive_climb::UpDown;
use crate::condition::{CompareOp, Condition, ConditionSet, UtcWindow};
use crate::fsm::{Fsm, Phase, Symbol};
use crate::{ControlResult, Directive};

/// Directive value that drives an actuator to its upper travel limit.
const FULL_TRAVEL: f64 = 1000.0;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceParams {
    pub start_when:          i64,
    pub when_secs:           f64,
    pub when_wpt_dist:       f64,
    pub when_utc:            UtcWindow,
    /// 0 quit, 1 wait for the operator, 2 resume.
    pub end_action:          i64,
    pub c_use_bpump:         i64,
    pub c_bpump_value:       f64,
    pub c_use_pitch:         i64,
    pub c_pitch_value:       f64,
    pub keystroke_wait_time: f64,
    pub gps_wait_time:       f64,
    pub datatransfertime:    f64,
}

impl Default for SurfaceParams {
    fn default() -> Self {
        Self {
            start_when:          0,
            when_secs:           180.0,
            when_wpt_dist:       10.0,
            when_utc:            UtcWindow::default(),
            end_action:          1,
            c_use_bpump:         2,
            c_bpump_value:       200.0,
            c_use_pitch:         3,
            c_pitch_value:       0.4363,
            keystroke_wait_time: 30.0,
            gps_wait_time:       30.0,
            datatransfertime:    0.0,
        }
    }
}

impl SurfaceParams {
    fn start_when(&self) -> StartWhen {
        StartWhen {
            code:          self.start_when,
            when_secs:     self.when_secs,
            when_wpt_dist: self.when_wpt_dist,
            utc:           self.when_utc,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SurfaceAction {
    Activate,
    Complete,
    WaitForGps,
    WaitForUser,
    WaitForFinalGps,
    GetBusy,
    BeBusy,
    Resume,
}

#[derive(Clone, Debug)]
pub struct Surface {
    params:        SurfaceParams,
    climb:         Option<UpDown>,
    surfaced_at:   f64,
    dead_reckoned: (f64, f64),
    busy_since:    f64,
}

impl Surface {
    pub fn new(params: SurfaceParams) -> Self {
        Self {
            params,
            climb:         None,
            surfaced_at:   0.0,
            dead_reckoned: (0.0, 0.0),
            busy_since:    0.0,
        }
    }

    pub fn params(&self) -> &SurfaceParams {
        &self.params
    }

    /// Mission time of the last surfacing.
    pub fn surfaced_at(&self) -> f64 {
        self.surfaced_at
    }

    fn at_surface_housekeeping(cx: &mut ActionContext<'_, SurfaceAction>) {
        cx.conditions.set_false(Symbol::Resume);
        cx.state.set(Field::Nocomms, 0.0);
        cx.state.reset_idle_timers();
    }

    fn has_fix(cx: &ActionContext<'_, SurfaceAction>) -> bool {
        cx.state.get(Field::GpsStatus) == 0.0
    }

    fn wait_for_gps(&mut self, cx: &mut ActionContext<'_, SurfaceAction>) {
        Self::at_surface_housekeeping(cx);
        let waited = cx.time() - self.surfaced_at;
        let fix = Self::has_fix(cx);
        if !fix && waited <= self.params.gps_wait_time {
            return;
        }
        cx.conditions.set_true(Symbol::Resume);

        let dt = self.surfaced_at - cx.state.get(Field::XTimeDive);
        let (vx, vy) = if fix && dt != 0.0 {
            let dx = cx.state.get(Field::LmcX) - self.dead_reckoned.0;
            let dy = cx.state.get(Field::LmcY) - self.dead_reckoned.1;
            (dx / dt, dy / dt)
        } else {
            (-1.0, -1.0)
        };
        cx.state.set(Field::WaterVx, vx);
        cx.state.set(Field::WaterVy, vy);
        info!("Surface: drift estimate ({vx:.3}, {vy:.3}) m/s after {waited:.0} s at the surface");
    }

    fn wait_for_user(&mut self, cx: &mut ActionContext<'_, SurfaceAction>) {
        Self::at_surface_housekeeping(cx);
        let waited = cx.time() - self.surfaced_at;
        let done = match self.params.end_action {
            2 => true,
            1 => waited > self.params.datatransfertime && waited > self.params.keystroke_wait_time,
            _ => true,
        };
        if done {
            cx.conditions.set_true(Symbol::Resume);
            if self.params.end_action == 1 || self.params.end_action == 2 {
                cx.state.set(Field::CGpsOn, 0.0);
            }
        }
    }

    fn wait_for_final_gps(&mut self, cx: &mut ActionContext<'_, SurfaceAction>) {
        Self::at_surface_housekeeping(cx);
        let fix = Self::has_fix(cx);
        if !fix && cx.time() - self.surfaced_at <= self.params.gps_wait_time {
            return;
        }
        if fix {
            let t = cx.time();
            let (x, y) = (cx.state.get(Field::LmcX), cx.state.get(Field::LmcY));
            cx.state.set(Field::XGpsLmcXDive, x);
            cx.state.set(Field::XGpsLmcYDive, y);
            cx.state.set(Field::XLmcXWptCalc, x);
            cx.state.set(Field::XLmcYWptCalc, y);
            cx.state.set(Field::XTimeDive, t);
        }
        cx.conditions.set_true(Symbol::Resume);
    }
}

impl BehaviorLogic for Surface {
    type Action = SurfaceAction;

    fn name(&self) -> &'static str {
        "Surface"
    }

    fn wire(&mut self, fsm: &mut Fsm<Phase, SurfaceAction>, conditions: &mut ConditionSet) -> ControlResult<()> {
        let p = self.params;
        self.climb = Some(UpDown::new(self.name(), p.c_use_bpump, p.c_bpump_value, p.c_use_pitch, p.c_pitch_value)?);
        conditions.insert(Symbol::StartWhen, p.start_when().condition(self.name())?);
        conditions.insert(Symbol::StopWhen, Condition::when(Field::Depth, CompareOp::LessThan, 0.01));

        use SurfaceAction as A;
        fsm.add_transition(Symbol::StartWhen, Phase::UnInited, Some(A::Activate), Some(Phase::Active));
        fsm.add_transition(Symbol::StopWhen, Phase::Active, Some(A::Complete), Some(Phase::Complete));
        fsm.add_transition(Symbol::Resume, Phase::Complete, Some(A::WaitForGps), Some(Phase::WaitForGps));
        fsm.add_transition(Symbol::Resume, Phase::WaitForGps, None, Some(Phase::WaitForUser));
        fsm.add_transition(Symbol::Resume, Phase::WaitForUser, Some(A::WaitForFinalGps), Some(Phase::WaitForFinalGps));
        fsm.add_transition(Symbol::Resume, Phase::WaitForFinalGps, Some(A::GetBusy), Some(Phase::Busy));
        fsm.add_transition(Symbol::Resume, Phase::Busy, Some(A::Resume), Some(Phase::UnInited));

        for phase in [Phase::UnInited, Phase::Active, Phase::Abort, Phase::Complete] {
            fsm.add_wildcard(phase, None, None);
        }
        fsm.add_wildcard(Phase::WaitForGps, Some(A::WaitForGps), None);
        fsm.add_wildcard(Phase::WaitForUser, Some(A::WaitForUser), None);
        fsm.add_wildcard(Phase::WaitForFinalGps, Some(A::WaitForFinalGps), None);
        fsm.add_wildcard(Phase::Busy, Some(A::BeBusy), None);
        Ok(())
    }

    fn act(&mut self, action: SurfaceAction, cx: &mut ActionContext<'_, SurfaceAction>) -> ControlResult<()> {
        match action {
            SurfaceAction::Activate => {
                if let Some(climb) = self.climb {
                    cx.fsm.memory.extend(climb.directives());
                }
                cx.state.set(Field::CGpsOn, 1.0);
                info!("Surface: surfacing from {:.1} m", cx.state.get(Field::Depth));
            }
            SurfaceAction::Complete => {
                cx.fsm.memory.push(Directive::BallastPumped(FULL_TRAVEL));
                cx.fsm.memory.push(Directive::BattPos(FULL_TRAVEL));
                self.surfaced_at = cx.time();
                self.dead_reckoned = (cx.state.get(Field::LmcX), cx.state.get(Field::LmcY));
                if self.params.end_action > 0 {
                    cx.conditions.set_true(Symbol::Resume);
                } else {
                    cx.status.raise(MissionStatus::TO_QUIT);
                }
                if self.params.start_when == 12 {
                    cx.state.set(Field::Nocomms, 0.0);
                }
                cx.state.set(Field::TimeSinceCycleStart, 0.0);
                cx.state.reset_idle_timers();
                cx.state.add(Field::SegmentNumber, 1.0);
                info!("Surface: at the surface, segment {}", cx.state.get(Field::SegmentNumber));
            }
            SurfaceAction::WaitForGps => self.wait_for_gps(cx),
            SurfaceAction::WaitForUser => self.wait_for_user(cx),
            SurfaceAction::WaitForFinalGps => self.wait_for_final_gps(cx),
            SurfaceAction::GetBusy => {
                cx.conditions.set_false(Symbol::Resume);
                self.busy_since = cx.time();
            }
            SurfaceAction::BeBusy => {
                if cx.time() - self.busy_since > cx.state.get(Field::InitDiveTime) {
                    debug!("Surface: initialisation done, resuming");
                    cx.conditions.set_true(Symbol::Resume);
                }
            }
            SurfaceAction::Resume => cx.resume(),
        }
        Ok(())
    }

    fn awaiting_operator(&self, phase: Phase) -> bool {
        phase == Phase::WaitForUser
    }
}
