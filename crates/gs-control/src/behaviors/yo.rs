//! `Yo` (dive/climb cycling) and the Seaglider-style `SGYo`.

use gs_core::MissionStatus;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::behavior::{ActionContext, Behavior, BehaviorLogic, StartWhen};
use crate::behaviors::dive_climb::{DiveClimb, DiveClimbParams};
use crate::condition::{Condition, ConditionSet};
use crate::fsm::{Fsm, Phase, Symbol};
use crate::{ControlError, ControlResult};

// ── Parameters ────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YoParams {
    pub start_when:              i64,
    pub num_half_cycles_to_do:   i64,
    pub d_target_depth:          f64,
    pub d_target_altitude:       f64,
    pub d_use_bpump:             i64,
    pub d_bpump_value:           f64,
    pub d_use_pitch:             i64,
    pub d_pitch_value:           f64,
    pub d_stop_when_hover_for:   f64,
    pub d_stop_when_stalled_for: f64,
    pub c_target_depth:          f64,
    pub c_target_altitude:       f64,
    pub c_use_bpump:             i64,
    pub c_bpump_value:           f64,
    pub c_use_pitch:             i64,
    pub c_pitch_value:           f64,
    pub c_stop_when_hover_for:   f64,
    pub c_stop_when_stalled_for: f64,
    /// 0 quit the mission, 2 resume.
    pub end_action:              i64,
}

impl Default for YoParams {
    fn default() -> Self {
        Self {
            start_when:              0,
            num_half_cycles_to_do:   2,
            d_target_depth:          10.0,
            d_target_altitude:       -1.0,
            d_use_bpump:             2,
            d_bpump_value:           -200.0,
            d_use_pitch:             3,
            d_pitch_value:           -0.4363,
            d_stop_when_hover_for:   180.0,
            d_stop_when_stalled_for: 240.0,
            c_target_depth:          3.0,
            c_target_altitude:       -1.0,
            c_use_bpump:             2,
            c_bpump_value:           200.0,
            c_use_pitch:             3,
            c_pitch_value:           0.4363,
            c_stop_when_hover_for:   180.0,
            c_stop_when_stalled_for: 240.0,
            end_action:              0,
        }
    }
}

impl YoParams {
    fn dive(&self) -> DiveClimbParams {
        DiveClimbParams {
            target_depth:          self.d_target_depth,
            target_altitude:       self.d_target_altitude,
            use_bpump:             self.d_use_bpump,
            bpump_value:           self.d_bpump_value,
            use_pitch:             self.d_use_pitch,
            pitch_value:           self.d_pitch_value,
            start_when:            0,
            stop_when_hover_for:   self.d_stop_when_hover_for,
            stop_when_stalled_for: self.d_stop_when_stalled_for,
        }
    }

    fn climb(&self) -> DiveClimbParams {
        DiveClimbParams {
            target_depth:          self.c_target_depth,
            target_altitude:       self.c_target_altitude,
            use_bpump:             self.c_use_bpump,
            bpump_value:           self.c_bpump_value,
            use_pitch:             self.c_use_pitch,
            pitch_value:           self.c_pitch_value,
            start_when:            0,
            stop_when_hover_for:   self.c_stop_when_hover_for,
            stop_when_stalled_for: self.c_stop_when_stalled_for,
        }
    }
}

/// Seaglider-style yo: ballast is derived from the wanted dive time.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SgYoParams {
    pub d_target_depth:   f64,
    /// s for the dive leg
    pub target_divetime:  f64,
    /// cc added to both legs
    pub bpump_offset:     f64,
    /// rad; the sign is ignored
    pub d_pitch_value:    f64,
    pub drag_coefficient: f64,
}

impl Default for SgYoParams {
    fn default() -> Self {
        Self {
            d_target_depth:   10.0,
            target_divetime:  1200.0,
            bpump_offset:     0.0,
            d_pitch_value:    0.3,
            drag_coefficient: 0.095,
        }
    }
}

/// Reference area for the drag estimate, m².
const SG_AREA: f64 = 0.12;
const GRAVITY: f64 = 9.81;

impl SgYoParams {
    /// Ballast change (cc) that balances drag at the glide speed needed to
    /// cover `2 · depth` in `target_divetime` at `pitch`.
    pub fn buoyancy_change(&self, pitch: f64) -> f64 {
        let s = pitch.sin();
        let speed = 2.0 * self.d_target_depth / self.target_divetime / s;
        0.5 * self.drag_coefficient * SG_AREA * speed * speed / (GRAVITY * s) * 1e6
    }

    /// The equivalent plain `Yo` parameters.
    pub fn to_yo(&self) -> YoParams {
        let pitch = self.d_pitch_value.abs();
        let dv = self.buoyancy_change(pitch);
        YoParams {
            start_when:              2,
            num_half_cycles_to_do:   2,
            d_target_depth:          self.d_target_depth,
            d_target_altitude:       10.0,
            d_use_bpump:             2,
            d_bpump_value:           -dv + self.bpump_offset,
            d_use_pitch:             3,
            d_pitch_value:           -pitch,
            d_stop_when_hover_for:   600.0,
            d_stop_when_stalled_for: 600.0,
            c_target_depth:          3.0,
            c_target_altitude:       -1.0,
            c_use_bpump:             2,
            c_bpump_value:           dv + self.bpump_offset,
            c_use_pitch:             3,
            c_pitch_value:           pitch,
            c_stop_when_hover_for:   600.0,
            c_stop_when_stalled_for: 600.0,
            end_action:              2,
        }
    }
}

// ── Yo ────────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum YoAction {
    Activate,
    SubState,
    Complete,
    Resume,
}

/// Alternates an inner dive and climb for `num_half_cycles_to_do` legs and
/// passes the active leg's directives on.
#[derive(Debug)]
pub struct Yo {
    name:      &'static str,
    params:    YoParams,
    profile:   i64,
    substates: Vec<Behavior<DiveClimb>>,
}

impl Yo {
    pub fn new(params: YoParams) -> Self {
        Self { name: "Yo", params, profile: -1, substates: Vec::new() }
    }

    pub fn seaglider(params: SgYoParams) -> ControlResult<Self> {
        if params.target_divetime <= 0.0 || params.d_pitch_value == 0.0 {
            return Err(ControlError::Config(format!(
                "SGYo needs a positive target_divetime and a non-zero pitch, got {} s and {} rad",
                params.target_divetime, params.d_pitch_value
            )));
        }
        Ok(Self { name: "SGYo", ..Self::new(params.to_yo()) })
    }

    pub fn params(&self) -> &YoParams {
        &self.params
    }

    /// Index of the current half cycle; `-1` before the first.
    pub fn profile(&self) -> i64 {
        self.profile
    }

    pub fn substates(&self) -> &[Behavior<DiveClimb>] {
        &self.substates
    }

    fn initialise(&mut self, conditions: &mut ConditionSet) -> ControlResult<()> {
        self.profile = -1;
        self.substates = vec![
            Behavior::new(DiveClimb::dive(self.params.dive()))?,
            Behavior::new(DiveClimb::climb(self.params.climb()))?,
        ];
        conditions.insert(Symbol::StopWhen, Condition::Flag(false));
        Ok(())
    }

    fn current_leg(&self) -> usize {
        self.profile.rem_euclid(2) as usize
    }

    fn sub_state(&mut self, cx: &mut ActionContext<'_, YoAction>) -> ControlResult<()> {
        let leg = self.current_leg();
        let sub = &mut self.substates[leg];
        sub.process(cx.state, cx.status)?;

        if sub.phase() == Phase::Complete {
            let sc = sub.conditions_mut();
            sc.set_true(Symbol::Resume);
            sc.set_false(Symbol::StopWhen);
            sc.set_false(Symbol::StartWhen);
            sub.process(cx.state, cx.status)?;

            if self.profile == self.params.num_half_cycles_to_do - 1 {
                cx.conditions.set_true(Symbol::StopWhen);
            } else {
                self.profile += 1;
                debug!("{}: half cycle {}", self.name, self.profile);
                let next = self.current_leg();
                self.substates[next].conditions_mut().set_true(Symbol::StartWhen);
            }
        } else {
            let directives = sub.directives().to_vec();
            cx.emit(directives);
        }
        Ok(())
    }
}

impl BehaviorLogic for Yo {
    type Action = YoAction;

    fn name(&self) -> &'static str {
        self.name
    }

    fn wire(&mut self, fsm: &mut Fsm<Phase, YoAction>, conditions: &mut ConditionSet) -> ControlResult<()> {
        if self.params.end_action != 0 && self.params.end_action != 2 {
            return Err(ControlError::UnsupportedMode {
                behavior:  self.name,
                parameter: "end_action",
                value:     self.params.end_action as f64,
            });
        }
        conditions.insert(Symbol::StartWhen, StartWhen::code(self.params.start_when).condition(self.name)?);

        fsm.add_transition(Symbol::StartWhen, Phase::UnInited, Some(YoAction::Activate), Some(Phase::Active));
        fsm.add_transition(Symbol::StopWhen, Phase::Active, Some(YoAction::Complete), Some(Phase::Complete));
        fsm.add_transition(Symbol::StartWhen, Phase::Active, Some(YoAction::SubState), Some(Phase::Active));
        fsm.add_transition(Symbol::Resume, Phase::Complete, Some(YoAction::Resume), Some(Phase::UnInited));
        fsm.add_wildcard(Phase::UnInited, None, None);
        fsm.add_wildcard(Phase::Complete, None, None);
        fsm.add_wildcard(Phase::Active, Some(YoAction::SubState), Some(Phase::Active));

        self.initialise(conditions)
    }

    fn act(&mut self, action: YoAction, cx: &mut ActionContext<'_, YoAction>) -> ControlResult<()> {
        match action {
            YoAction::Activate => {
                self.profile += 1;
                info!("{}: starting, half cycle {}", self.name, self.profile);
                self.sub_state(cx)?;
            }
            YoAction::SubState => self.sub_state(cx)?,
            YoAction::Complete => {
                cx.fsm.memory.clear();
                match self.params.end_action {
                    2 => cx.conditions.set_true(Symbol::Resume),
                    _ => cx.status.raise(MissionStatus::TO_QUIT),
                }
                cx.state.reset_idle_timers();
            }
            YoAction::Resume => {
                cx.resume();
                self.initialise(cx.conditions)?;
            }
        }
        Ok(())
    }
}
