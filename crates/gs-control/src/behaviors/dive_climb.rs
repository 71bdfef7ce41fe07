//! `Dive_to` and `Climb_to`.

use gs_core::Field;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::behavior::{ActionContext, BehaviorLogic, StartWhen};
use crate::condition::{Clause, CompareOp, Comparison, Condition, ConditionSet};
use crate::fsm::{Fsm, Phase, Symbol};
use crate::{ControlError, ControlResult, Directive};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vertical {
    Dive,
    Climb,
}

/// Parameters of one vertical leg.  `-1` disables `target_altitude`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiveClimbParams {
    pub target_depth:          f64,
    pub target_altitude:       f64,
    pub use_bpump:             i64,
    pub bpump_value:           f64,
    pub use_pitch:             i64,
    pub pitch_value:           f64,
    pub start_when:            i64,
    pub stop_when_hover_for:   f64,
    pub stop_when_stalled_for: f64,
}

impl Default for DiveClimbParams {
    fn default() -> Self {
        Self {
            target_depth:          10.0,
            target_altitude:       -1.0,
            use_bpump:             2,
            bpump_value:           -233.0,
            use_pitch:             1,
            pitch_value:           0.0,
            start_when:            0,
            stop_when_hover_for:   180.0,
            stop_when_stalled_for: 240.0,
        }
    }
}

/// Ballast and pitch settings for one direction of travel.
///
/// Only `use_bpump = 2` (absolute ballast) is supported; `use_pitch` 1 is a
/// battery position and 3 a pitch angle for the servo.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UpDown {
    pub bpump_value: f64,
    pub pitch:       Directive,
}

impl UpDown {
    pub fn new(
        behavior:    &'static str,
        use_bpump:   i64,
        bpump_value: f64,
        use_pitch:   i64,
        pitch_value: f64,
    ) -> ControlResult<Self> {
        if use_bpump != 2 {
            return Err(ControlError::UnsupportedMode {
                behavior,
                parameter: "use_bpump",
                value:     use_bpump as f64,
            });
        }
        let pitch = match use_pitch {
            1 => Directive::BattPos(pitch_value),
            3 => Directive::Pitch(pitch_value),
            other => {
                return Err(ControlError::UnsupportedMode {
                    behavior,
                    parameter: "use_pitch",
                    value:     other as f64,
                })
            }
        };
        Ok(Self { bpump_value, pitch })
    }

    pub fn directives(&self) -> [Directive; 2] {
        [Directive::BallastPumped(self.bpump_value), self.pitch]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiveClimbAction {
    Activate,
    Complete,
    Resume,
}

/// Go down (or up) until a target depth or altitude is reached, or the
/// vehicle hovers or stalls for too long.
#[derive(Clone, Debug)]
pub struct DiveClimb {
    vertical: Vertical,
    params:   DiveClimbParams,
    settings: Option<UpDown>,
}

impl DiveClimb {
    pub fn new(vertical: Vertical, params: DiveClimbParams) -> Self {
        Self { vertical, params, settings: None }
    }

    pub fn dive(params: DiveClimbParams) -> Self {
        Self::new(Vertical::Dive, params)
    }

    pub fn climb(params: DiveClimbParams) -> Self {
        Self::new(Vertical::Climb, params)
    }

    pub fn vertical(&self) -> Vertical {
        self.vertical
    }

    pub fn params(&self) -> &DiveClimbParams {
        &self.params
    }

    fn stop_condition(&self) -> Condition {
        let p = &self.params;
        let depth_op = match self.vertical {
            Vertical::Dive  => CompareOp::GreaterThan,
            Vertical::Climb => CompareOp::LessThan,
        };
        Condition::Compare(
            Comparison::any(Clause::new(Field::Altitude, CompareOp::LessThan, p.target_altitude).non_negative())
                .with_clause(Clause::new(Field::HoverFor, CompareOp::GreaterThan, p.stop_when_hover_for).non_negative())
                .with_clause(Clause::new(Field::StalledFor, CompareOp::GreaterThan, p.stop_when_stalled_for).non_negative())
                .with_clause(Clause::new(Field::Depth, depth_op, p.target_depth).non_negative()),
        )
    }
}

impl BehaviorLogic for DiveClimb {
    type Action = DiveClimbAction;

    fn name(&self) -> &'static str {
        match self.vertical {
            Vertical::Dive  => "Dive_to",
            Vertical::Climb => "Climb_to",
        }
    }

    fn wire(&mut self, fsm: &mut Fsm<Phase, DiveClimbAction>, conditions: &mut ConditionSet) -> ControlResult<()> {
        let p = self.params;
        self.settings = Some(UpDown::new(self.name(), p.use_bpump, p.bpump_value, p.use_pitch, p.pitch_value)?);

        conditions.insert(Symbol::StartWhen, StartWhen::code(p.start_when).condition(self.name())?);
        conditions.insert(Symbol::StopWhen, self.stop_condition());

        fsm.add_transition(Symbol::StartWhen, Phase::UnInited, Some(DiveClimbAction::Activate), Some(Phase::Active));
        fsm.add_transition(Symbol::StopWhen, Phase::Active, Some(DiveClimbAction::Complete), Some(Phase::Complete));
        fsm.add_transition(Symbol::Resume, Phase::Complete, Some(DiveClimbAction::Resume), Some(Phase::UnInited));
        for phase in [Phase::UnInited, Phase::Active, Phase::Complete, Phase::Abort] {
            fsm.add_wildcard(phase, None, None);
        }
        Ok(())
    }

    fn act(&mut self, action: DiveClimbAction, cx: &mut ActionContext<'_, DiveClimbAction>) -> ControlResult<()> {
        match action {
            DiveClimbAction::Activate => {
                cx.conditions.set_false(Symbol::StartWhen);
                if let Some(settings) = self.settings {
                    cx.fsm.memory.extend(settings.directives());
                }
                debug!("{}: heading for {:.1} m", self.name(), self.params.target_depth);
            }
            DiveClimbAction::Complete => {
                // armed again for the next activation
                cx.conditions.set_true(Symbol::StartWhen);
                cx.fsm.memory.clear();
                cx.state.reset_idle_timers();
            }
            DiveClimbAction::Resume => cx.resume(),
        }
        Ok(())
    }
}
