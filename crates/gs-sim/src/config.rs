//! Serializable mission configuration.

use gs_control::BehaviorConfig;
use gs_core::{time, Field, GeoPoint};
use gs_flight::{FlightParams, WaterSample};
use gs_hardware::HardwarePreset;
use serde::{Deserialize, Serialize};

use crate::{SimError, SimResult};

/// How the mission begins.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionStart {
    /// A fresh deployment.
    #[default]
    Initial,
    /// Continue an interrupted mission: the commanded waypoint comes from
    /// the `c_wpt_lat/lon` presets and the cycle timer starts at the data
    /// transfer time.
    Pickup,
}

/// One `(field, value)` sensor preset applied before the run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensorPreset {
    pub field: String,
    pub value: f64,
}

/// Everything needed to build a [`Mission`][crate::Mission].
///
/// ```json
/// {
///   "start_date": "20100519", "start_time": "00:30",
///   "lat_ini": 5413.0, "lon_ini": 740.5,
///   "hardware": "shallow100",
///   "sensors": [ { "field": "u_use_current_correction", "value": 0 } ],
///   "behaviors": [
///     { "behavior": "abend", "overdepth": 90 },
///     { "behavior": "yo", "num_half_cycles_to_do": 6 }
///   ]
/// }
/// ```
///
/// `behaviors` is listed highest priority first, the way mission files are
/// written; the first entry ends up on top of the control stack.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionConfig {
    pub name:               String,
    /// `YYYYMMDD`.
    pub start_date:         String,
    /// `HH:MM`, UTC; midnight when absent.
    pub start_time:         Option<String>,
    /// Start position, NMEA `DDMM.mmmm`.
    pub lat_ini:            f64,
    pub lon_ini:            f64,
    /// Physics step, s.
    pub dt:                 f64,
    /// Control cycle, s.
    pub cpu_cycle:          f64,
    /// Stop after this many simulated days.
    pub max_days:           Option<f64>,
    /// Stop at the n-th surfacing for the operator; 0 never.
    pub end_on_surfacing:   u32,
    /// Stop at the n-th bottom contact; 0 never.
    pub end_on_grounding:   u32,
    /// Depth, m, at which the run fails.
    pub crush_depth:        f64,
    pub seed:               u64,
    /// Telemetry sampling period, s of simulated time.
    pub store_period:       f64,
    pub hardware:           HardwarePreset,
    pub flight:             FlightParams,
    pub gps_acquire_time:   f64,
    /// Time the flight computer needs before the first dive, s.
    pub init_dive_time:     f64,
    /// Time spent transferring data at each surfacing, s.
    pub data_transfer_time: f64,
    pub mission_start:      MissionStart,
    /// Water used when no other environment provider is supplied.
    pub environment:        WaterSample,
    pub sensors:            Vec<SensorPreset>,
    pub behaviors:          Vec<BehaviorConfig>,
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            name:               "mission".to_owned(),
            start_date:         "20100519".to_owned(),
            start_time:         Some("00:30".to_owned()),
            lat_ini:            5413.0,
            lon_ini:            740.5,
            dt:                 1.0,
            cpu_cycle:          4.0,
            max_days:           None,
            end_on_surfacing:   0,
            end_on_grounding:   0,
            crush_depth:        1300.0,
            seed:               0,
            store_period:       10.0,
            hardware:           HardwarePreset::default(),
            flight:             FlightParams::default(),
            gps_acquire_time:   30.0,
            init_dive_time:     80.0,
            data_transfer_time: 0.0,
            mission_start:      MissionStart::default(),
            environment:        WaterSample::default(),
            sensors:            Vec::new(),
            behaviors:          Vec::new(),
        }
    }
}

impl MissionConfig {
    /// Parse a JSON mission configuration.
    pub fn from_json(text: &str) -> SimResult<Self> {
        serde_json::from_str(text).map_err(|e| SimError::Config(e.to_string()))
    }

    /// Start time, epoch seconds.
    pub fn start_epoch(&self) -> SimResult<f64> {
        Ok(time::epoch_from_strings(&self.start_date, self.start_time.as_deref())?)
    }

    pub fn start_position(&self) -> GeoPoint {
        GeoPoint::from_nmea(self.lat_ini, self.lon_ini)
    }

    /// Check the numeric settings and every sensor preset name.
    pub fn validate(&self) -> SimResult<()> {
        let positive = [
            ("dt", self.dt),
            ("cpu_cycle", self.cpu_cycle),
            ("crush_depth", self.crush_depth),
            ("store_period", self.store_period),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(SimError::Config(format!("`{name}` must be positive, got {value}")));
            }
        }
        if let Some(days) = self.max_days {
            if !(days > 0.0) {
                return Err(SimError::Config(format!("`max_days` must be positive, got {days}")));
            }
        }
        for preset in &self.sensors {
            preset.field.parse::<Field>()?;
        }
        Ok(())
    }
}
