//! `Sample` and `Sensors_in`: inert behaviors that only carry parameters.

use serde::{Deserialize, Serialize};

use crate::behavior::{ActionContext, BehaviorLogic, StartWhen};
use crate::condition::ConditionSet;
use crate::fsm::{Fsm, Phase, Symbol};
use crate::ControlResult;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleParams {
    pub start_when:                     i64,
    pub sensor_type:                    i64,
    pub state_to_sample:                i64,
    pub sample_time_after_state_change: f64,
    pub intersample_time:               f64,
    pub nth_yo_to_sample:               i64,
    pub intersample_depth:              f64,
    pub min_depth:                      f64,
    pub max_depth:                      f64,
}

impl Default for SampleParams {
    fn default() -> Self {
        Self {
            start_when:                     0,
            sensor_type:                    0,
            state_to_sample:                1,
            sample_time_after_state_change: 15.0,
            intersample_time:               0.0,
            nth_yo_to_sample:               1,
            intersample_depth:              -1.0,
            min_depth:                      -5.0,
            max_depth:                      2000.0,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorsInParams {
    pub start_when: i64,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PassiveKind {
    Sample(SampleParams),
    SensorsIn(SensorsInParams),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PassiveAction {
    Activate,
}

/// Becomes `Active` on the first cycle and stays there without emitting
/// anything.
#[derive(Clone, Debug)]
pub struct Passive {
    kind: PassiveKind,
}

impl Passive {
    pub fn sample(params: SampleParams) -> Self {
        Self { kind: PassiveKind::Sample(params) }
    }

    pub fn sensors_in(params: SensorsInParams) -> Self {
        Self { kind: PassiveKind::SensorsIn(params) }
    }

    pub fn kind(&self) -> &PassiveKind {
        &self.kind
    }

    fn start_when(&self) -> i64 {
        match self.kind {
            PassiveKind::Sample(p) => p.start_when,
            PassiveKind::SensorsIn(p) => p.start_when,
        }
    }
}

impl BehaviorLogic for Passive {
    type Action = PassiveAction;

    fn name(&self) -> &'static str {
        match self.kind {
            PassiveKind::Sample(_) => "Sample",
            PassiveKind::SensorsIn(_) => "Sensors_in",
        }
    }

    fn wire(&mut self, fsm: &mut Fsm<Phase, PassiveAction>, conditions: &mut ConditionSet) -> ControlResult<()> {
        conditions.insert(Symbol::StartWhen, StartWhen::code(self.start_when()).condition(self.name())?);
        fsm.add_wildcard(Phase::UnInited, Some(PassiveAction::Activate), Some(Phase::Active));
        fsm.add_wildcard(Phase::Active, None, None);
        Ok(())
    }

    fn act(&mut self, _action: PassiveAction, _cx: &mut ActionContext<'_, PassiveAction>) -> ControlResult<()> {
        Ok(())
    }
}
