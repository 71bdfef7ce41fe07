//! `Set_heading`: hold a heading or a fixed fin angle.

use serde::{Deserialize, Serialize};

use crate::behavior::{ActionContext, BehaviorLogic, StartWhen};
use crate::condition::{Condition, ConditionSet};
use crate::fsm::{Fsm, Phase, Symbol};
use crate::{ControlError, ControlResult, Directive};

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetHeadingParams {
    pub start_when:    i64,
    /// 0 or 5; both mean "never" here.
    pub stop_when:     i64,
    pub when_secs:     f64,
    /// rad for `use_heading = 2`, fin angle for `use_heading = 4`.
    pub heading_value: f64,
    pub use_heading:   i64,
}

impl Default for SetHeadingParams {
    fn default() -> Self {
        Self {
            start_when:    0,
            stop_when:     0,
            when_secs:     1200.0,
            heading_value: 1000.0,
            use_heading:   2,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SetHeadingAction {
    Activate,
    Complete,
}

#[derive(Clone, Debug)]
pub struct SetHeading {
    params: SetHeadingParams,
}

impl SetHeading {
    pub fn new(params: SetHeadingParams) -> Self {
        Self { params }
    }

    fn directive(&self) -> ControlResult<Directive> {
        match self.params.use_heading {
            2 => Ok(Directive::Heading(self.params.heading_value)),
            4 => Ok(Directive::Fin(self.params.heading_value)),
            other => Err(ControlError::UnsupportedMode {
                behavior:  "Set_heading",
                parameter: "use_heading",
                value:     other as f64,
            }),
        }
    }
}

impl BehaviorLogic for SetHeading {
    type Action = SetHeadingAction;

    fn name(&self) -> &'static str {
        "Set_heading"
    }

    fn wire(&mut self, fsm: &mut Fsm<Phase, SetHeadingAction>, conditions: &mut ConditionSet) -> ControlResult<()> {
        let p = self.params;
        if p.stop_when != 0 && p.stop_when != 5 {
            return Err(ControlError::UnsupportedMode {
                behavior:  self.name(),
                parameter: "stop_when",
                value:     p.stop_when as f64,
            });
        }
        self.directive()?;

        let start = StartWhen { when_secs: p.when_secs, ..StartWhen::code(p.start_when) };
        conditions.insert(Symbol::StartWhen, start.condition(self.name())?);
        conditions.insert(Symbol::StopWhen, Condition::Flag(false));

        fsm.add_transition(Symbol::StartWhen, Phase::UnInited, Some(SetHeadingAction::Activate), Some(Phase::Active));
        fsm.add_transition(Symbol::StopWhen, Phase::Active, Some(SetHeadingAction::Complete), Some(Phase::Complete));
        for phase in [Phase::UnInited, Phase::Active, Phase::Complete] {
            fsm.add_wildcard(phase, None, None);
        }
        Ok(())
    }

    fn act(&mut self, action: SetHeadingAction, cx: &mut ActionContext<'_, SetHeadingAction>) -> ControlResult<()> {
        match action {
            SetHeadingAction::Activate => {
                cx.state.reset_origin();
                cx.fsm.memory.push(self.directive()?);
            }
            SetHeadingAction::Complete => {
                cx.fsm.memory.clear();
                cx.conditions.insert(Symbol::StopWhen, Condition::Flag(true));
            }
        }
        Ok(())
    }
}
