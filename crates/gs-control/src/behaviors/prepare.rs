//! `Prepare_to_dive`: wait at the surface for a fix before the first dive.

use gs_core::Field;
use log::info;
use serde::{Deserialize, Serialize};

use crate::behavior::{ActionContext, BehaviorLogic, StartWhen};
use crate::condition::{Condition, ConditionSet};
use crate::fsm::{Fsm, Phase, Symbol};
use crate::ControlResult;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepareToDiveParams {
    pub start_when: i64,
    /// s to wait for a fix
    pub wait_time:  f64,
}

impl Default for PrepareToDiveParams {
    fn default() -> Self {
        Self { start_when: 0, wait_time: 720.0 }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PrepareAction {
    Activate,
    CollectGps,
    Complete,
}

/// Keeps the stack busy (so stack-idle triggers hold off) until a GPS fix
/// arrives or `wait_time` elapses, then records the dive start position.
#[derive(Clone, Debug)]
pub struct PrepareToDive {
    params:     PrepareToDiveParams,
    started_at: f64,
}

impl PrepareToDive {
    pub fn new(params: PrepareToDiveParams) -> Self {
        Self { params, started_at: 0.0 }
    }
}

impl BehaviorLogic for PrepareToDive {
    type Action = PrepareAction;

    fn name(&self) -> &'static str {
        "Prepare_to_dive"
    }

    fn wire(&mut self, fsm: &mut Fsm<Phase, PrepareAction>, conditions: &mut ConditionSet) -> ControlResult<()> {
        conditions.insert(Symbol::StartWhen, StartWhen::code(self.params.start_when).condition(self.name())?);
        conditions.insert(Symbol::StopWhen, Condition::Flag(false));

        fsm.add_transition(Symbol::StartWhen, Phase::UnInited, Some(PrepareAction::Activate), Some(Phase::Active));
        fsm.add_wildcard(Phase::Active, Some(PrepareAction::CollectGps), None);
        fsm.add_transition(Symbol::StopWhen, Phase::Active, Some(PrepareAction::Complete), Some(Phase::Complete));
        fsm.add_wildcard(Phase::Complete, None, None);
        fsm.add_wildcard(Phase::UnInited, None, None);
        Ok(())
    }

    fn act(&mut self, action: PrepareAction, cx: &mut ActionContext<'_, PrepareAction>) -> ControlResult<()> {
        match action {
            PrepareAction::Activate => {
                cx.state.set(Field::CGpsOn, 1.0);
                cx.state.set(Field::KeepStackBusy, 1.0);
                self.started_at = cx.time();
            }
            PrepareAction::CollectGps => {
                if cx.time() - self.started_at >= self.params.wait_time || cx.state.get(Field::GpsStatus) == 0.0 {
                    cx.conditions.set_true(Symbol::StopWhen);
                }
                cx.state.reset_idle_timers();
            }
            PrepareAction::Complete => {
                let t = cx.time();
                let (x, y) = (cx.state.get(Field::LmcX), cx.state.get(Field::LmcY));
                cx.state.set(Field::KeepStackBusy, 0.0);
                cx.state.set(Field::XGpsLmcXDive, x);
                cx.state.set(Field::XGpsLmcYDive, y);
                cx.state.set(Field::XLmcXWptCalc, x);
                cx.state.set(Field::XLmcYWptCalc, y);
                cx.state.set(Field::XTimeDive, t);
                info!("Prepare_to_dive: ready after {:.0} s", t - self.started_at);
            }
        }
        Ok(())
    }
}
