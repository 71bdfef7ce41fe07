//! Ambient water properties.

use gs_core::GeoPoint;
use serde::{Deserialize, Serialize};

use crate::FlightResult;

/// One sample of the water around the vehicle.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterSample {
    /// Current, m s⁻¹ (east, north, up).
    pub u:           f64,
    pub v:           f64,
    pub w:           f64,
    /// Depth of the sea floor below mean sea level, m.
    pub water_depth: f64,
    /// Surface elevation, m.
    pub eta:         f64,
    pub salinity:    f64,
    pub temperature: f64,
    /// kg m⁻³
    pub density:     f64,
}

impl Default for WaterSample {
    fn default() -> Self {
        Self {
            u:           0.0,
            v:           0.0,
            w:           0.0,
            water_depth: 40.0,
            eta:         0.0,
            salinity:    35.0,
            temperature: 15.0,
            density:     1025.0,
        }
    }
}

impl WaterSample {
    /// Densities outside this range are not sea water.
    pub const DENSITY_RANGE: (f64, f64) = (990.0, 1080.0);
    /// Faster currents are treated as a broken lookup.
    pub const MAX_CURRENT: f64 = 5.0;

    /// `false` for values no real ocean produces.
    pub fn is_plausible(&self) -> bool {
        let (lo, hi) = Self::DENSITY_RANGE;
        let finite = [self.u, self.v, self.w, self.water_depth, self.eta, self.density]
            .iter()
            .all(|x| x.is_finite());
        finite
            && (lo..=hi).contains(&self.density)
            && self.u.abs() <= Self::MAX_CURRENT
            && self.v.abs() <= Self::MAX_CURRENT
            && self.w.abs() <= Self::MAX_CURRENT
    }
}

/// Source of [`WaterSample`]s along the track.
///
/// Implementations backed by model output or observations live outside this
/// workspace; they report lookup failures as errors and the caller falls
/// back to defaults.
pub trait EnvironmentProvider: Send {
    /// Water at epoch time `t`, position `at`, height `z` (m, negative
    /// below the surface).
    fn sample(&mut self, t: f64, at: GeoPoint, z: f64) -> FlightResult<WaterSample>;

    fn name(&self) -> &str {
        "unnamed"
    }
}

/// The same water everywhere, always.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstantWater(pub WaterSample);

impl EnvironmentProvider for ConstantWater {
    fn sample(&mut self, _t: f64, _at: GeoPoint, _z: f64) -> FlightResult<WaterSample> {
        Ok(self.0)
    }

    fn name(&self) -> &str {
        "constant"
    }
}
