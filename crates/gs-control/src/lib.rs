//! `gs-control` — the behavior layer of the glider control executive.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                          |
//! |---------------|-------------------------------------------------------------------|
//! | [`condition`] | `Clause`, `Comparison`, `UtcWindow`, `Condition`, `ConditionSet`   |
//! | [`fsm`]       | `Fsm<S, A>`, input `Symbol`s, behavior `Phase`s                   |
//! | [`directive`] | `Directive` (actuator requests) and the `Channel` each one drives |
//! | [`behavior`]  | `BehaviorLogic`, `Behavior<L>`, object-safe `ControlBehavior`     |
//! | [`behaviors`] | Abend, Dive_to/Climb_to, Yo/SGYo, Goto_list, Surface, …           |
//! | [`catalog`]   | `BehaviorConfig` — serde-tagged behavior specs and `build()`       |
//! | [`error`]     | `ControlError`, `ControlResult<T>`                                |
//!
//! # Design notes
//!
//! A behavior is a state machine plus an ordered set of named conditions.
//! Once per control cycle every condition that holds feeds its name to the
//! machine, in insertion order, so one cycle may fire several transitions
//! and each sees the effect of the previous one.  Transition actions leave
//! their actuator directives in the machine's memory; the arbitration layer
//! in `gs-sim` collects them.
//!
//! Actions never reach for global state.  They get an [`ActionContext`]
//! holding the machine, the behavior's own conditions, the glider state and
//! the mission status for the duration of the call.

pub mod behavior;
pub mod behaviors;
pub mod catalog;
pub mod condition;
pub mod directive;
pub mod error;
pub mod fsm;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use behavior::{ActionContext, Behavior, BehaviorLogic, ControlBehavior, StartWhen};
pub use catalog::BehaviorConfig;
pub use condition::{Clause, Combine, CompareOp, Comparison, Condition, ConditionSet, UtcWindow};
pub use directive::{Channel, Directive};
pub use error::{ControlError, ControlResult};
pub use fsm::{Fsm, Phase, Symbol, Transition};
