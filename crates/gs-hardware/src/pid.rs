//! Single-axis PID controller.

use serde::{Deserialize, Serialize};

/// Tunable gains.  `deadband` suppresses any correction while
/// `|error| < deadband`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PidGains {
    pub kp:       f64,
    pub ki:       f64,
    pub kd:       f64,
    #[serde(default)]
    pub deadband: f64,
}

impl PidGains {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd, deadband: 0.0 }
    }

    pub fn with_deadband(mut self, deadband: f64) -> Self {
        self.deadband = deadband;
        self
    }
}

/// PID on an explicit clock: the caller passes the sample time, so the
/// integral and derivative use the real spacing between calls.
///
/// No anti-windup.
#[derive(Clone, Debug)]
pub struct Pid {
    gains:      PidGains,
    integral:   f64,
    last_error: f64,
    last_time:  Option<f64>,
}

impl Pid {
    pub fn new(gains: PidGains) -> Self {
        Self { gains, integral: 0.0, last_error: 0.0, last_time: None }
    }

    #[inline]
    pub fn gains(&self) -> PidGains {
        self.gains
    }

    /// Accumulated `∫ e dt`.
    #[inline]
    pub fn integral(&self) -> f64 {
        self.integral
    }

    /// Correction for `measured` towards `setpoint` at time `t`.
    ///
    /// Inside the dead-band the result is exactly 0 and no state changes, so
    /// the next live call differentiates against the last live sample.  The
    /// first live call after construction or [`reset`][Pid::reset] has zero
    /// derivative and adds nothing to the integral.  Two calls at the same
    /// `t` divide by zero; the caller never does that.
    pub fn output(&mut self, t: f64, measured: f64, setpoint: f64) -> f64 {
        let error = setpoint - measured;
        if error.abs() < self.gains.deadband {
            return 0.0;
        }
        let derivative = match self.last_time {
            Some(t0) => {
                let dt = t - t0;
                self.integral += error * dt;
                (error - self.last_error) / dt
            }
            None => 0.0,
        };
        self.last_error = error;
        self.last_time = Some(t);
        self.gains.kp * error + self.gains.ki * self.integral + self.gains.kd * derivative
    }

    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.last_error = 0.0;
        self.last_time = None;
    }
}
