//! Slocum hardware sets.

use std::fmt;

use gs_core::{RngStream, StreamRng};
use log::info;
use serde::{Deserialize, Serialize};

use crate::{ActuatorSpec, LinearActuator, Pid, PidGains};

/// Named hardware configuration, selectable from a mission config as
/// `"shallow100"`, `"deep"` or `"deep_extended"`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HardwarePreset {
    /// 100 m Slocum with the fast shallow buoyancy pump.
    #[default]
    Shallow100,
    /// 1000 m Slocum.
    Deep,
    /// 1000 m Slocum with the extended-volume buoyancy pump.
    DeepExtended,
}

impl HardwarePreset {
    pub fn spec(self) -> HardwareSpec {
        // Shared between all three sets.
        let fin = ActuatorSpec::new(0.0, 0.02, -0.45, 0.45, 0.035);
        let fin_pid = PidGains::new(0.8, 0.001, 0.0);

        match self {
            HardwarePreset::Shallow100 => HardwareSpec {
                pump:        ActuatorSpec::new(200.0, 32.0, -233.0, 233.0, 10.0),
                pitch_motor: ActuatorSpec::new(0.9, 0.10, -1.0, 1.0, 0.05),
                fin,
                fin_pid,
                pitch_pid:   PidGains::new(0.4, 0.0, 0.0),
            },
            HardwarePreset::Deep => HardwareSpec {
                pump:        ActuatorSpec::new(200.0, 4.0, -263.0, 263.0, 30.0),
                pitch_motor: ActuatorSpec::new(0.9, 0.10, -1.4, 1.4, 0.02),
                fin,
                fin_pid,
                pitch_pid:   PidGains::new(0.4, 0.001, 0.0),
            },
            HardwarePreset::DeepExtended => HardwareSpec {
                pump:        ActuatorSpec::new(200.0, 4.0, -400.0, 400.0, 30.0),
                pitch_motor: ActuatorSpec::new(0.9, 0.10, -1.4, 1.4, 0.02),
                fin,
                fin_pid,
                pitch_pid:   PidGains::new(0.4, 0.001, 0.0),
            },
        }
    }
}

impl fmt::Display for HardwarePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HardwarePreset::Shallow100   => "Slocum 100 m",
            HardwarePreset::Deep         => "Slocum 1000 m",
            HardwarePreset::DeepExtended => "Slocum 1000 m, extended pump",
        })
    }
}

/// Actuator limits and controller gains of one hardware set.
///
/// Units: pump cc, pitch motor (battery position) inch, fin rad.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HardwareSpec {
    pub pump:        ActuatorSpec,
    pub pitch_motor: ActuatorSpec,
    pub fin:         ActuatorSpec,
    pub fin_pid:     PidGains,
    pub pitch_pid:   PidGains,
}

impl Default for HardwareSpec {
    fn default() -> Self {
        HardwarePreset::default().spec()
    }
}

// ── Hardware ──────────────────────────────────────────────────────────────────

/// The three actuators and the two PID loops that drive them.
#[derive(Clone, Debug)]
pub struct Hardware {
    pub pump:        LinearActuator,
    pub pitch_motor: LinearActuator,
    pub fin:         LinearActuator,
    pub fin_pid:     Pid,
    pub pitch_pid:   Pid,
}

impl Hardware {
    /// Build from `spec`; every actuator gets its own jitter stream derived
    /// from `seed`.
    pub fn new(spec: HardwareSpec, seed: u64) -> Self {
        Self {
            pump:        LinearActuator::new(spec.pump, StreamRng::new(seed, RngStream::PumpJitter)),
            pitch_motor: LinearActuator::new(spec.pitch_motor, StreamRng::new(seed, RngStream::PitchMotorJitter)),
            fin:         LinearActuator::new(spec.fin, StreamRng::new(seed, RngStream::FinJitter)),
            fin_pid:     Pid::new(spec.fin_pid),
            pitch_pid:   Pid::new(spec.pitch_pid),
        }
    }

    pub fn preset(preset: HardwarePreset, seed: u64) -> Self {
        info!("initialising {preset} hardware");
        Hardware::new(preset.spec(), seed)
    }

    /// Move all three actuators by `dt` seconds.
    pub fn actuate(&mut self, dt: f64) {
        self.pitch_motor.actuate(dt);
        self.pump.actuate(dt);
        self.fin.actuate(dt);
    }
}
