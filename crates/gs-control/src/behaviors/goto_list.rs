//! `Goto_list`: waypoint following.

use gs_core::{Field, GeoPoint, GliderState, MissionStatus};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::behavior::{ActionContext, BehaviorLogic, StartWhen};
use crate::condition::{Condition, ConditionSet};
use crate::fsm::{Fsm, Phase, Symbol};
use crate::{ControlError, ControlResult, Directive};

/// Tolerance when matching a stored NMEA position against the list.
const NMEA_MATCH: f64 = 1e-4;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GotoListParams {
    pub start_when:         i64,
    /// Number of list entries in use; all of them when absent.
    pub num_waypoints:      Option<usize>,
    /// `> 0` legs, `-1` forever, `-2` every waypoint once.
    pub num_legs_to_run:    i64,
    /// Index, `-1` after the last achieved waypoint, `-2` closest.
    pub initial_wpt:        i64,
    pub list_stop_when:     i64,
    pub list_when_wpt_dist: f64,
    /// `[lon, lat]` pairs in NMEA `DDMM.mmmm`.
    pub waypoints:          Vec<[f64; 2]>,
}

impl Default for GotoListParams {
    fn default() -> Self {
        Self {
            start_when:         0,
            num_waypoints:      None,
            num_legs_to_run:    -1,
            initial_wpt:        0,
            list_stop_when:     7,
            list_when_wpt_dist: 10.0,
            waypoints:          Vec::new(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GotoListAction {
    Activate,
    Steer,
    Complete,
    Resume,
}

/// A waypoint in local mission coordinates, with its distance from the
/// position where the list was activated.
#[derive(Copy, Clone, Debug, PartialEq)]
struct LocalWaypoint {
    x:    f64,
    y:    f64,
    dist: f64,
}

#[derive(Clone, Debug)]
pub struct GotoList {
    params:     GotoListParams,
    count:      usize,
    local:      Vec<LocalWaypoint>,
    active:     usize,
    achieved:   i64,
    activated:  Vec<(f64, [f64; 2])>,
    steered_at: Option<f64>,
}

impl GotoList {
    pub fn new(params: GotoListParams) -> Self {
        let count = params.num_waypoints.unwrap_or(params.waypoints.len());
        Self {
            params,
            count,
            local:      Vec::new(),
            active:     0,
            achieved:   0,
            activated:  Vec::new(),
            steered_at: None,
        }
    }

    pub fn params(&self) -> &GotoListParams {
        &self.params
    }

    pub fn achieved_waypoints(&self) -> i64 {
        self.achieved
    }

    pub fn active_waypoint(&self) -> usize {
        self.active
    }

    /// `(activation time, [lon, lat])` for every waypoint made active.
    pub fn activated_waypoints(&self) -> &[(f64, [f64; 2])] {
        &self.activated
    }

    fn validate(&self) -> ControlResult<()> {
        let p = &self.params;
        let invalid = |parameter, value: f64| ControlError::UnsupportedMode {
            behavior: "Goto_list",
            parameter,
            value,
        };
        if p.waypoints.is_empty() {
            return Err(ControlError::Config("Goto_list needs at least one waypoint".into()));
        }
        if self.count == 0 || self.count > p.waypoints.len() {
            return Err(ControlError::Config(format!(
                "Goto_list: num_waypoints = {} but the list holds {}",
                self.count,
                p.waypoints.len()
            )));
        }
        if p.list_stop_when != 7 {
            return Err(invalid("list_stop_when", p.list_stop_when as f64));
        }
        if !(p.num_legs_to_run > 0 || p.num_legs_to_run == -1 || p.num_legs_to_run == -2) {
            return Err(invalid("num_legs_to_run", p.num_legs_to_run as f64));
        }
        if p.initial_wpt < -2 || p.initial_wpt >= self.count as i64 {
            return Err(invalid("initial_wpt", p.initial_wpt as f64));
        }
        Ok(())
    }

    fn to_local(&mut self, state: &GliderState) {
        let origin = state.origin();
        let frame = state.frame();
        self.local = self.params.waypoints[..self.count]
            .iter()
            .enumerate()
            .map(|(i, &[lon, lat])| {
                let p = GeoPoint::from_nmea(lat, lon);
                let (x, y) = frame.to_local(p);
                let dist = origin.distance_m(p);
                debug!("Goto_list: waypoint {i} at ({x:.1}, {y:.1}), {dist:.0} m away");
                LocalWaypoint { x, y, dist }
            })
            .collect();
    }

    fn find(&self, lat: f64, lon: f64) -> Option<usize> {
        self.params.waypoints[..self.count]
            .iter()
            .position(|&[wlon, wlat]| (wlon - lon).abs() < NMEA_MATCH && (wlat - lat).abs() < NMEA_MATCH)
    }

    fn closest(&self) -> usize {
        self.local
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.dist.total_cmp(&b.dist))
            .map_or(0, |(i, _)| i)
    }

    fn initial_waypoint(&self, state: &mut GliderState) -> usize {
        if state.flag(Field::Pickup) {
            state.set(Field::Pickup, 0.0);
            let (lat, lon) = (state.get(Field::CWptLat), state.get(Field::CWptLon));
            return self.find(lat, lon).unwrap_or_else(|| {
                warn!("Goto_list: commanded waypoint ({lat:.3}, {lon:.3}) is not in the list, starting at 0");
                0
            });
        }
        match self.params.initial_wpt {
            -1 => {
                let (lat, lon) = (state.get(Field::XLastWptLat), state.get(Field::XLastWptLon));
                self.find(lat, lon).map_or(0, |i| (i + 1) % self.count)
            }
            -2 => self.closest(),
            i => i as usize,
        }
    }

    fn set_waypoint(&mut self, r: usize, state: &mut GliderState) -> Directive {
        let [lon, lat] = self.params.waypoints[r];
        let LocalWaypoint { x, y, .. } = self.local[r];
        state.set(Field::CWptLat, lat);
        state.set(Field::CWptLon, lon);
        state.set(Field::CWptLmcX, x);
        state.set(Field::CWptLmcY, y);
        self.active = r;
        self.activated.push((state.time(), [lon, lat]));
        info!(
            "Goto_list: new waypoint {r} ({lat:.4}, {lon:.4}) at {:.2} h into the mission",
            state.get(Field::PresentSecsIntoMission) / 3600.0
        );
        Directive::Waypoint { x, y }
    }

    fn steer(&mut self, cx: &mut ActionContext<'_, GotoListAction>) {
        let t = cx.time();
        if self.steered_at == Some(t) {
            return;
        }
        self.steered_at = Some(t);

        let target = self.local[self.active];
        let dx = cx.state.get(Field::LmcX) - target.x;
        let dy = cx.state.get(Field::LmcY) - target.y;
        let dist = dx.hypot(dy);
        cx.state.set(Field::DistToWpt, dist);
        if dist > self.params.list_when_wpt_dist {
            return;
        }

        self.achieved += 1;
        let [lon, lat] = self.params.waypoints[self.active];
        cx.state.set(Field::XLastWptLat, lat);
        cx.state.set(Field::XLastWptLon, lon);
        cx.state.set(Field::XLmcXWptCalc, cx.state.get(Field::LmcX));
        cx.state.set(Field::XLmcYWptCalc, cx.state.get(Field::LmcY));

        let legs = self.params.num_legs_to_run;
        if legs == self.achieved || (legs == -2 && self.achieved == self.count as i64) {
            info!("Goto_list: {} waypoint(s) achieved, done", self.achieved);
            cx.conditions.set_true(Symbol::StopWhen);
        } else {
            let next = (self.active + 1) % self.count;
            let directive = self.set_waypoint(next, cx.state);
            cx.emit([directive]);
        }
    }
}

impl BehaviorLogic for GotoList {
    type Action = GotoListAction;

    fn name(&self) -> &'static str {
        "Goto_list"
    }

    fn wire(&mut self, fsm: &mut Fsm<Phase, GotoListAction>, conditions: &mut ConditionSet) -> ControlResult<()> {
        self.validate()?;
        conditions.insert(Symbol::StartWhen, StartWhen::code(self.params.start_when).condition(self.name())?);
        conditions.insert(Symbol::StopWhen, Condition::Flag(false));

        fsm.add_transition(Symbol::StartWhen, Phase::UnInited, Some(GotoListAction::Activate), Some(Phase::Active));
        fsm.add_transition(Symbol::StopWhen, Phase::Active, Some(GotoListAction::Complete), Some(Phase::Complete));
        fsm.add_transition(Symbol::Resume, Phase::Complete, Some(GotoListAction::Resume), Some(Phase::UnInited));
        fsm.add_wildcard(Phase::UnInited, None, None);
        fsm.add_wildcard(Phase::Complete, None, None);
        fsm.add_wildcard(Phase::Active, Some(GotoListAction::Steer), Some(Phase::Active));
        Ok(())
    }

    fn act(&mut self, action: GotoListAction, cx: &mut ActionContext<'_, GotoListAction>) -> ControlResult<()> {
        match action {
            GotoListAction::Activate => {
                cx.state.reset_origin();
                self.to_local(cx.state);
                self.achieved = 0;
                self.steered_at = None;
                let r = self.initial_waypoint(cx.state);
                let directive = self.set_waypoint(r, cx.state);
                cx.emit([directive]);
            }
            GotoListAction::Steer => self.steer(cx),
            GotoListAction::Complete => {
                cx.fsm.memory.clear();
                cx.status.raise(MissionStatus::TO_QUIT);
            }
            GotoListAction::Resume => cx.resume(),
        }
        Ok(())
    }
}
