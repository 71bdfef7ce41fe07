//! Abort watchdog.

use gs_core::{Field, MissionStatus};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::behavior::{ActionContext, BehaviorLogic};
use crate::condition::{Clause, CompareOp, Comparison, Condition, ConditionSet};
use crate::fsm::{Fsm, Phase, Symbol};
use crate::ControlResult;

/// Thresholds of the watchdog; a negative value disables that check.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbendParams {
    /// m
    pub overdepth:     f64,
    /// s into the mission
    pub overtime:      f64,
    /// s at the same depth
    pub samedepth_for: f64,
}

impl Default for AbendParams {
    fn default() -> Self {
        Self { overdepth: -1.0, overtime: -1.0, samedepth_for: -1.0 }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AbendAction {
    Activate,
    Abort,
    Complete,
}

/// Watches depth, mission time and same-depth time.  Any breach moves the
/// watchdog to `Abort` and raises the matching abort bit; once the vehicle
/// is back at the surface it moves on to `Complete`.
#[derive(Clone, Debug)]
pub struct Abend {
    params: AbendParams,
}

impl Abend {
    pub fn new(params: AbendParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &AbendParams {
        &self.params
    }
}

/// The abort bit raised when `symbol` trips the watchdog.
pub fn abort_bits(symbol: Symbol) -> Option<MissionStatus> {
    match symbol {
        Symbol::Overtime     => Some(MissionStatus::ABORT_OVERTIME),
        Symbol::Overdepth    => Some(MissionStatus::ABORT_OVERDEPTH),
        Symbol::SamedepthFor => Some(MissionStatus::ABORT_SAMEDEPTH),
        _ => None,
    }
}

impl BehaviorLogic for Abend {
    type Action = AbendAction;

    fn name(&self) -> &'static str {
        "Abend"
    }

    fn wire(&mut self, fsm: &mut Fsm<Phase, AbendAction>, conditions: &mut ConditionSet) -> ControlResult<()> {
        let over = |field, threshold| {
            Condition::Compare(Comparison::any(
                Clause::new(field, CompareOp::GreaterThan, threshold).non_negative(),
            ))
        };
        conditions.insert(Symbol::Overdepth, over(Field::Depth, self.params.overdepth));
        conditions.insert(Symbol::Overtime, over(Field::PresentSecsIntoMission, self.params.overtime));
        conditions.insert(Symbol::SamedepthFor, over(Field::SamedepthFor, self.params.samedepth_for));
        conditions.insert(Symbol::AtSurface, Condition::when(Field::Depth, CompareOp::LessThan, 0.1));

        fsm.add_wildcard(Phase::UnInited, Some(AbendAction::Activate), Some(Phase::Active));
        for symbol in [
            Symbol::Resume,
            Symbol::Timeout,
            Symbol::Overdepth,
            Symbol::Overtime,
            Symbol::SamedepthFor,
        ] {
            fsm.add_transition(symbol, Phase::Active, Some(AbendAction::Abort), Some(Phase::Abort));
        }
        fsm.add_transition(Symbol::AtSurface, Phase::Abort, Some(AbendAction::Complete), Some(Phase::Complete));
        fsm.add_wildcard(Phase::Active, None, None);
        fsm.add_wildcard(Phase::Abort, None, None);
        fsm.add_wildcard(Phase::Complete, None, None);
        Ok(())
    }

    fn act(&mut self, action: AbendAction, cx: &mut ActionContext<'_, AbendAction>) -> ControlResult<()> {
        match action {
            AbendAction::Activate => {}
            AbendAction::Abort => {
                let symbol = cx.fsm.input_symbol();
                match symbol.and_then(abort_bits) {
                    Some(bits) => {
                        if let Some(symbol) = symbol {
                            warn!("Abend: {symbol} tripped at depth {:.1} m", cx.state.get(Field::Depth));
                        }
                        cx.status.raise(bits);
                    }
                    None => warn!("Abend: abort on {symbol:?} raises no status bit"),
                }
            }
            AbendAction::Complete => info!("Abend: back at the surface after abort"),
        }
        Ok(())
    }
}
