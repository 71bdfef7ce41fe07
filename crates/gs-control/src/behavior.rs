//! The behavior engine: an [`Fsm`] driven by a [`ConditionSet`].
//!
//! Concrete behaviors implement [`BehaviorLogic`] (transition wiring plus
//! action bodies).  [`Behavior<L>`] owns the machine and the conditions and
//! runs the per-cycle loop; [`ControlBehavior`] is the object-safe face the
//! arbitration stack holds as `Box<dyn ControlBehavior>`.

use std::fmt::Debug;

use gs_core::{Field, GliderState, MissionStatus};
use log::debug;

use crate::condition::{Clause, CompareOp, Comparison, Condition, ConditionSet, UtcWindow};
use crate::fsm::{Fsm, Phase, Symbol};
use crate::{ControlError, ControlResult, Directive};

// ── BehaviorLogic ─────────────────────────────────────────────────────────────

/// What a concrete behavior supplies: its transition table and what each of
/// its actions does.
///
/// `wire` is called from [`Behavior::init`] on a fresh machine (in
/// `UnInited`) and a fresh [`ConditionSet::base`]; it validates parameters and
/// adds the behavior-specific conditions and transitions.  Illegal parameter
/// combinations are reported here, before the mission starts.
pub trait BehaviorLogic: Send + 'static {
    type Action: Copy + Debug + Send + 'static;

    fn name(&self) -> &'static str;

    fn wire(
        &mut self,
        fsm:        &mut Fsm<Phase, Self::Action>,
        conditions: &mut ConditionSet,
    ) -> ControlResult<()>;

    fn act(
        &mut self,
        action: Self::Action,
        cx:     &mut ActionContext<'_, Self::Action>,
    ) -> ControlResult<()>;

    /// `true` while the vehicle sits at the surface waiting for an operator.
    /// Default: never.
    fn awaiting_operator(&self, _phase: Phase) -> bool {
        false
    }
}

// ── ActionContext ─────────────────────────────────────────────────────────────

/// Everything an action may touch.
pub struct ActionContext<'a, A> {
    pub fsm:        &'a mut Fsm<Phase, A>,
    pub conditions: &'a mut ConditionSet,
    pub state:      &'a mut GliderState,
    pub status:     &'a mut MissionStatus,
}

impl<A> ActionContext<'_, A>
where
    A: Copy,
{
    /// Clear the resume flag and the emitted directives.
    pub fn resume(&mut self) {
        self.conditions.set_false(Symbol::Resume);
        self.fsm.memory.clear();
    }

    /// Replace the emitted directives.
    pub fn emit(&mut self, directives: impl IntoIterator<Item = Directive>) {
        self.fsm.memory.clear();
        self.fsm.memory.extend(directives);
    }

    #[inline]
    pub fn time(&self) -> f64 {
        self.state.time()
    }
}

// ── Behavior ──────────────────────────────────────────────────────────────────

/// A behavior instance: its logic, machine and conditions.
#[derive(Debug)]
pub struct Behavior<L: BehaviorLogic> {
    logic:      L,
    fsm:        Fsm<Phase, L::Action>,
    conditions: ConditionSet,
}

impl<L: BehaviorLogic> Behavior<L> {
    /// Wrap `logic`; the behavior is wired immediately so it can be
    /// processed without a separate `init()` call.
    pub fn new(logic: L) -> ControlResult<Self> {
        let mut behavior = Self {
            logic,
            fsm:        Fsm::new(Phase::UnInited),
            conditions: ConditionSet::base(),
        };
        behavior.init()?;
        Ok(behavior)
    }

    /// Rebuild the machine and the conditions from the current parameters.
    pub fn init(&mut self) -> ControlResult<()> {
        self.fsm = Fsm::new(Phase::UnInited);
        self.conditions = ConditionSet::base();
        self.logic.wire(&mut self.fsm, &mut self.conditions)
    }

    /// Evaluate every condition in insertion order; each one that holds
    /// feeds its symbol to the machine.  A transition is visible to the
    /// conditions evaluated after it.
    pub fn process(&mut self, state: &mut GliderState, status: &mut MissionStatus) -> ControlResult<()> {
        let Self { logic, fsm, conditions } = self;
        let mut i = 0;
        while let Some((symbol, holds)) = conditions.evaluate(i, state) {
            if holds {
                fsm.process(symbol, |fsm, action| {
                    debug!("{}: {action:?} on {symbol} in {}", logic.name(), fsm.current_state());
                    let mut cx = ActionContext {
                        fsm,
                        conditions: &mut *conditions,
                        state:      &mut *state,
                        status:     &mut *status,
                    };
                    logic.act(action, &mut cx)
                })?;
            }
            i += 1;
        }
        Ok(())
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.fsm.current_state()
    }

    pub fn directives(&self) -> &[Directive] {
        &self.fsm.memory
    }

    pub fn conditions(&self) -> &ConditionSet {
        &self.conditions
    }

    pub fn conditions_mut(&mut self) -> &mut ConditionSet {
        &mut self.conditions
    }

    pub fn logic(&self) -> &L {
        &self.logic
    }
}

// ── ControlBehavior ───────────────────────────────────────────────────────────

/// Object-safe interface the layered control stack drives.
pub trait ControlBehavior: Send {
    fn name(&self) -> &'static str;

    fn init(&mut self) -> ControlResult<()>;

    fn process(&mut self, state: &mut GliderState, status: &mut MissionStatus) -> ControlResult<()>;

    /// Directives held after the last `process` call.
    fn directives(&self) -> &[Directive];

    fn phase(&self) -> Phase;

    fn awaiting_operator(&self) -> bool;
}

impl<L: BehaviorLogic> ControlBehavior for Behavior<L> {
    fn name(&self) -> &'static str {
        self.logic.name()
    }

    fn init(&mut self) -> ControlResult<()> {
        Behavior::init(self)
    }

    fn process(&mut self, state: &mut GliderState, status: &mut MissionStatus) -> ControlResult<()> {
        Behavior::process(self, state, status)
    }

    fn directives(&self) -> &[Directive] {
        &self.fsm.memory
    }

    fn phase(&self) -> Phase {
        self.fsm.current_state()
    }

    fn awaiting_operator(&self) -> bool {
        self.logic.awaiting_operator(self.fsm.current_state())
    }
}

// ── StartWhen ─────────────────────────────────────────────────────────────────

/// The `start_when` trigger shared by most behaviors.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StartWhen {
    pub code:          i64,
    pub when_secs:     f64,
    pub when_wpt_dist: f64,
    pub utc:           UtcWindow,
}

impl StartWhen {
    pub fn code(code: i64) -> Self {
        Self {
            code,
            when_secs:     -1.0,
            when_wpt_dist: -1.0,
            utc:           UtcWindow::default(),
        }
    }

    pub fn immediately() -> Self {
        Self::code(0)
    }

    /// The condition for this trigger.
    ///
    /// | code | starts when                                   |
    /// |------|-----------------------------------------------|
    /// | 0    | immediately                                   |
    /// | 1    | all actuator stacks idle                      |
    /// | 2    | pitch stack idle                              |
    /// | 3    | fin stack idle                                |
    /// | 4    | pump stack idle                               |
    /// | 7    | `m_dist_to_wpt < when_wpt_dist`               |
    /// | 9    | `time_since_cycle_start > when_secs`          |
    /// | 12   | `nocomms > when_secs`                         |
    /// | 13   | the UTC window minute                         |
    pub fn condition(&self, behavior: &'static str) -> ControlResult<Condition> {
        let idle = |field| Condition::when(field, CompareOp::Equal, 0.0);
        let positive = |field, op, threshold| {
            Condition::Compare(Comparison::any(Clause::new(field, op, threshold).non_negative()))
        };
        Ok(match self.code {
            0  => Condition::Flag(true),
            1  => idle(Field::Stack),
            2  => idle(Field::PitchStack),
            3  => idle(Field::FinStack),
            4  => idle(Field::BpumpStack),
            7  => positive(Field::DistToWpt, CompareOp::LessThan, self.when_wpt_dist),
            9  => positive(Field::TimeSinceCycleStart, CompareOp::GreaterThan, self.when_secs),
            12 => positive(Field::Nocomms, CompareOp::GreaterThan, self.when_secs),
            13 => Condition::Utc(self.utc),
            other => {
                return Err(ControlError::UnsupportedMode {
                    behavior,
                    parameter: "start_when",
                    value:     other as f64,
                })
            }
        })
    }
}
