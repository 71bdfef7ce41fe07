//! A small deterministic finite-state machine.
//!
//! States and actions are plain `Copy` enums supplied by the owner; the
//! machine only stores the transition table.  Actions run through a caller
//! supplied closure so they can borrow the owner's other fields alongside the
//! machine itself.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use log::{debug, warn};

use crate::{ControlResult, Directive};

// ── Symbol ────────────────────────────────────────────────────────────────────

/// Input symbols: the names of the conditions that fire transitions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    StartWhen,
    StopWhen,
    Resume,
    Running,
    Timeout,
    Overdepth,
    Overtime,
    SamedepthFor,
    AtSurface,
}

impl Symbol {
    pub fn name(self) -> &'static str {
        match self {
            Symbol::StartWhen    => "start_when",
            Symbol::StopWhen     => "stop_when",
            Symbol::Resume       => "resume",
            Symbol::Running      => "running",
            Symbol::Timeout      => "timeout",
            Symbol::Overdepth    => "overdepth",
            Symbol::Overtime     => "overtime",
            Symbol::SamedepthFor => "samedepth_for",
            Symbol::AtSurface    => "at_surface",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Phase ─────────────────────────────────────────────────────────────────────

/// The states a behavior can be in.  Most behaviors use the first four; the
/// surfacing dialog adds its wait states.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    UnInited,
    Active,
    Complete,
    Abort,
    WaitForGps,
    WaitForUser,
    WaitForFinalGps,
    Busy,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::UnInited        => "UnInited",
            Phase::Active          => "Active",
            Phase::Complete        => "Complete",
            Phase::Abort           => "Abort",
            Phase::WaitForGps      => "WaitForGPS",
            Phase::WaitForUser     => "WaitForUser",
            Phase::WaitForFinalGps => "WaitForFinalGPS",
            Phase::Busy            => "Busy",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Fsm ───────────────────────────────────────────────────────────────────────

/// What happens on a matched input: an optional action, then an optional
/// next state (`None` = stay).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Transition<S, A> {
    pub action:     Option<A>,
    pub next_state: Option<S>,
}

/// Deterministic automaton with a per-state wildcard fallback.
///
/// Lookup precedence on `process(symbol)`:
///
/// 1. the exact `(current_state, symbol)` entry;
/// 2. the wildcard entry of `current_state`;
/// 3. otherwise the machine stays put and its memory is emptied.
///
/// A wildcard registered with no action and no next state is an explicit
/// "stay, do nothing" and leaves memory untouched.
#[derive(Clone, Debug)]
pub struct Fsm<S, A> {
    current:     S,
    transitions: HashMap<(S, Symbol), Transition<S, A>>,
    wildcards:   HashMap<S, Transition<S, A>>,
    /// Directives emitted by the most recent action; kept until an action
    /// replaces or clears them.
    pub memory:  Vec<Directive>,
    input:       Option<Symbol>,
    next:        Option<S>,
}

impl<S, A> Fsm<S, A>
where
    S: Copy + Eq + Hash + fmt::Debug,
    A: Copy,
{
    pub fn new(initial: S) -> Self {
        Self {
            current:     initial,
            transitions: HashMap::new(),
            wildcards:   HashMap::new(),
            memory:      Vec::new(),
            input:       None,
            next:        None,
        }
    }

    pub fn add_transition(&mut self, symbol: Symbol, state: S, action: Option<A>, next_state: Option<S>) {
        self.transitions.insert((state, symbol), Transition { action, next_state });
    }

    pub fn add_wildcard(&mut self, state: S, action: Option<A>, next_state: Option<S>) {
        self.wildcards.insert(state, Transition { action, next_state });
    }

    #[inline]
    pub fn current_state(&self) -> S {
        self.current
    }

    /// The symbol being processed; only meaningful inside an action.
    #[inline]
    pub fn input_symbol(&self) -> Option<Symbol> {
        self.input
    }

    /// The resolved next state; only meaningful inside an action.
    #[inline]
    pub fn next_state(&self) -> Option<S> {
        self.next
    }

    /// The transition `process(symbol)` would take, without taking it.
    pub fn lookup(&self, symbol: Symbol) -> Option<Transition<S, A>> {
        self.transitions
            .get(&(self.current, symbol))
            .or_else(|| self.wildcards.get(&self.current))
            .copied()
    }

    /// Feed one symbol.  `run` executes the matched action, if any, with the
    /// machine borrowed mutably so it can push to `memory`.
    pub fn process<F>(&mut self, symbol: Symbol, mut run: F) -> ControlResult<()>
    where
        F: FnMut(&mut Self, A) -> ControlResult<()>,
    {
        let Some(transition) = self.lookup(symbol) else {
            warn!("no transition for {symbol} in state {:?}; staying", self.current);
            self.memory.clear();
            return Ok(());
        };

        let next = transition.next_state.unwrap_or(self.current);
        self.input = Some(symbol);
        self.next = Some(next);
        if let Some(action) = transition.action {
            run(self, action)?;
        }
        if next != self.current {
            debug!("{:?} --{symbol}--> {next:?}", self.current);
        }
        self.current = next;
        self.input = None;
        self.next = None;
        Ok(())
    }
}
