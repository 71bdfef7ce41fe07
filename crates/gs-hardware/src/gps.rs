//! GPS fix-status model.

/// Default depth (m) below which the antenna is underwater.
const SURFACE_DEPTH: f64 = 0.1;

/// Fix status as the flight computer reports it in `m_gps_status`:
///
/// | value | meaning                                         |
/// |-------|-------------------------------------------------|
/// | 2     | underwater, no signal                           |
/// | 1     | at the surface, acquiring                       |
/// | 0     | fix, after `acquire_time` seconds at the surface |
///
/// Non-zero values are negated while the receiver is switched off.
#[derive(Clone, Debug)]
pub struct Gps {
    acquire_time:  f64,
    surface_depth: f64,
    surfaced_at:   Option<f64>,
    enabled:       bool,
}

impl Gps {
    pub fn new(acquire_time: f64) -> Self {
        Self { acquire_time, surface_depth: SURFACE_DEPTH, surfaced_at: None, enabled: false }
    }

    /// The antenna counts as underwater deeper than `depth` metres.
    pub fn with_surface_depth(mut self, depth: f64) -> Self {
        self.surface_depth = depth;
        self
    }

    #[inline]
    pub fn surface_depth(&self) -> f64 {
        self.surface_depth
    }

    #[inline]
    pub fn acquire_time(&self) -> f64 {
        self.acquire_time
    }

    #[inline]
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Status at time `t` with the antenna at height `z` (m, positive up).
    pub fn status(&mut self, t: f64, z: f64) -> f64 {
        let status = if z < -self.surface_depth {
            self.surfaced_at = Some(t);
            2.0
        } else {
            let since = *self.surfaced_at.get_or_insert(t);
            if t - since > self.acquire_time { 0.0 } else { 1.0 }
        };
        if self.enabled || status == 0.0 { status } else { -status }
    }
}

impl Default for Gps {
    fn default() -> Self {
        Gps::new(30.0)
    }
}
