//! Predicates over the mission state that drive behavior transitions.

use std::str::FromStr;

use gs_core::time::{calendar, minute_start};
use gs_core::{Field, GliderState};
use serde::{Deserialize, Serialize};

use crate::{ControlError, ControlResult, Symbol};

// ── CompareOp ─────────────────────────────────────────────────────────────────

/// The four comparisons a clause may apply.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CompareOp {
    GreaterThan,
    LessThan,
    Equal,
    NotEqual,
}

impl CompareOp {
    #[inline]
    pub fn apply(self, lhs: f64, rhs: f64) -> bool {
        match self {
            CompareOp::GreaterThan => lhs > rhs,
            CompareOp::LessThan    => lhs < rhs,
            CompareOp::Equal       => lhs == rhs,
            CompareOp::NotEqual    => lhs != rhs,
        }
    }
}

impl FromStr for CompareOp {
    type Err = ControlError;

    fn from_str(s: &str) -> ControlResult<Self> {
        match s {
            ">"  => Ok(CompareOp::GreaterThan),
            "<"  => Ok(CompareOp::LessThan),
            "==" => Ok(CompareOp::Equal),
            "!=" => Ok(CompareOp::NotEqual),
            other => Err(ControlError::UnknownOperator(other.to_owned())),
        }
    }
}

// ── Clause ────────────────────────────────────────────────────────────────────

/// `field op threshold`, considered only while `threshold` lies inside the
/// clause's valid range.
///
/// The range lets a parameter such as `target_altitude = -1` switch a clause
/// off without removing it: the threshold is out of range, so the clause is
/// simply `false`.
#[derive(Clone, Debug, PartialEq)]
pub struct Clause {
    pub field:     Field,
    pub op:        CompareOp,
    pub threshold: f64,
    pub range:     (f64, f64),
}

impl Clause {
    /// A clause with an unbounded valid range.
    pub fn new(field: Field, op: CompareOp, threshold: f64) -> Self {
        Self {
            field,
            op,
            threshold,
            range: (f64::NEG_INFINITY, f64::INFINITY),
        }
    }

    /// Restrict the valid range; `None` leaves that side open.
    pub fn within(mut self, lo: Option<f64>, hi: Option<f64>) -> Self {
        self.range = (lo.unwrap_or(f64::NEG_INFINITY), hi.unwrap_or(f64::INFINITY));
        self
    }

    /// Only thresholds `>= 0` are live.
    pub fn non_negative(self) -> Self {
        self.within(Some(0.0), None)
    }

    #[inline]
    pub fn in_range(&self) -> bool {
        self.threshold >= self.range.0 && self.threshold <= self.range.1
    }

    pub fn check(&self, state: &GliderState) -> bool {
        self.in_range() && self.op.apply(state.get(self.field), self.threshold)
    }
}

// ── Comparison ────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Combine {
    /// True when any clause is true.
    Any,
    /// True when every clause is true.
    All,
}

/// One or more clauses joined by OR or AND.
#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    clauses: Vec<Clause>,
    combine: Combine,
}

impl Comparison {
    pub fn any(first: Clause) -> Self {
        Self { clauses: vec![first], combine: Combine::Any }
    }

    pub fn all(first: Clause) -> Self {
        Self { clauses: vec![first], combine: Combine::All }
    }

    /// Builder form of [`add_clause`][Self::add_clause].
    pub fn with_clause(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn add_clause(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Parse a flat list of 4-token clauses `field op threshold range`.
    ///
    /// `range` is `lo:hi` with either side optionally empty (`0:` means
    /// "non-negative thresholds only", `:` means unbounded).
    pub fn from_tokens(tokens: &[&str], combine: Combine) -> ControlResult<Self> {
        if tokens.is_empty() || tokens.len() % 4 != 0 {
            return Err(ControlError::MalformedCondition(format!(
                "expected groups of 4 tokens (field op threshold range), got {}",
                tokens.len()
            )));
        }
        let clauses = tokens
            .chunks_exact(4)
            .map(|chunk| {
                let field: Field = chunk[0].parse()?;
                let op: CompareOp = chunk[1].parse()?;
                let threshold = parse_number(chunk[2])?;
                let (lo, hi) = parse_range(chunk[3])?;
                Ok(Clause::new(field, op, threshold).within(lo, hi))
            })
            .collect::<ControlResult<Vec<_>>>()?;
        Ok(Self { clauses, combine })
    }

    pub fn check(&self, state: &GliderState) -> bool {
        match self.combine {
            Combine::Any => self.clauses.iter().any(|c| c.check(state)),
            Combine::All => self.clauses.iter().all(|c| c.check(state)),
        }
    }
}

fn parse_number(token: &str) -> ControlResult<f64> {
    token
        .parse()
        .map_err(|_| ControlError::MalformedCondition(format!("`{token}` is not a number")))
}

fn parse_range(token: &str) -> ControlResult<(Option<f64>, Option<f64>)> {
    let (lo, hi) = token
        .split_once(':')
        .ok_or_else(|| ControlError::MalformedCondition(format!("range `{token}` is not lo:hi")))?;
    let side = |s: &str| -> ControlResult<Option<f64>> {
        if s.is_empty() { Ok(None) } else { parse_number(s).map(Some) }
    };
    Ok((side(lo)?, side(hi)?))
}

// ── UtcWindow ─────────────────────────────────────────────────────────────────

/// A one-minute wall-clock window; `-1` in any component is a wildcard that
/// takes the current value of that component.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UtcWindow {
    pub minute: i32,
    pub hour:   i32,
    pub day:    i32,
    pub month:  i32,
}

impl Default for UtcWindow {
    fn default() -> Self {
        Self { minute: -1, hour: -1, day: -1, month: -1 }
    }
}

impl UtcWindow {
    /// `true` while `m_present_time` lies within the window minute.
    pub fn check(&self, state: &GliderState) -> bool {
        let t = state.time();
        let Ok((year, month, day, hour, minute)) = calendar(t) else {
            return false;
        };
        let pick = |wanted: i32, now: u32| if wanted < 0 { now } else { wanted as u32 };
        let start = minute_start(
            year,
            pick(self.month, month),
            pick(self.day, day),
            pick(self.hour, hour),
            pick(self.minute, minute),
        );
        matches!(start, Some(tc) if t >= tc && t <= tc + 60.0)
    }
}

// ── Condition ─────────────────────────────────────────────────────────────────

/// A transition predicate.
#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    Compare(Comparison),
    /// A fixed boolean that behaviors toggle from their actions.
    Flag(bool),
    Utc(UtcWindow),
}

impl Condition {
    /// Single-clause OR comparison.
    pub fn when(field: Field, op: CompareOp, threshold: f64) -> Self {
        Condition::Compare(Comparison::any(Clause::new(field, op, threshold)))
    }

    pub fn check(&self, state: &GliderState) -> bool {
        match self {
            Condition::Compare(c) => c.check(state),
            Condition::Flag(b)    => *b,
            Condition::Utc(w)     => w.check(state),
        }
    }

    /// Only flags change; on other variants this is a no-op.
    pub fn set_true(&mut self) {
        if let Condition::Flag(b) = self {
            *b = true;
        }
    }

    /// Only flags change; on other variants this is a no-op.
    pub fn set_false(&mut self) {
        if let Condition::Flag(b) = self {
            *b = false;
        }
    }
}

// ── ConditionSet ──────────────────────────────────────────────────────────────

/// The ordered `symbol → condition` map of one behavior.
///
/// Iteration order is insertion order, and re-inserting an existing symbol
/// replaces its condition in place without moving it.
#[derive(Clone, Debug, Default)]
pub struct ConditionSet {
    entries: Vec<(Symbol, Condition)>,
}

impl ConditionSet {
    /// The three conditions every behavior starts with:
    /// `resume = false`, `running = true`, `timeout = false`.
    pub fn base() -> Self {
        let mut set = Self::default();
        set.insert(Symbol::Resume, Condition::Flag(false));
        set.insert(Symbol::Running, Condition::Flag(true));
        set.insert(Symbol::Timeout, Condition::Flag(false));
        set
    }

    pub fn insert(&mut self, symbol: Symbol, condition: Condition) {
        match self.entries.iter_mut().find(|(s, _)| *s == symbol) {
            Some(slot) => slot.1 = condition,
            None => self.entries.push((symbol, condition)),
        }
    }

    pub fn get(&self, symbol: Symbol) -> Option<&Condition> {
        self.entries.iter().find(|(s, _)| *s == symbol).map(|(_, c)| c)
    }

    pub fn get_mut(&mut self, symbol: Symbol) -> Option<&mut Condition> {
        self.entries.iter_mut().find(|(s, _)| *s == symbol).map(|(_, c)| c)
    }

    pub fn set_true(&mut self, symbol: Symbol) {
        if let Some(c) = self.get_mut(symbol) {
            c.set_true();
        }
    }

    pub fn set_false(&mut self, symbol: Symbol) {
        if let Some(c) = self.get_mut(symbol) {
            c.set_false();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Symbol at position `i` and whether its condition holds now.
    pub fn evaluate(&self, i: usize, state: &GliderState) -> Option<(Symbol, bool)> {
        self.entries.get(i).map(|(s, c)| (*s, c.check(state)))
    }

    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.entries.iter().map(|(s, _)| *s)
    }
}
