//! Rate-limited linear actuator (buoyancy pump, pitch battery, fin).

use gs_core::StreamRng;
use serde::{Deserialize, Serialize};

/// Full width of the multiplicative rate jitter: each step runs at
/// `rate * (1 ± JITTER_WIDTH / 2)`.
const JITTER_WIDTH: f64 = 0.05;

/// Static description of one actuator.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActuatorSpec {
    pub initial:  f64,
    /// Travel per second, in the actuator's own unit.
    pub rate:     f64,
    pub min:      f64,
    pub max:      f64,
    /// Motion only starts when `|target - position|` exceeds this.
    pub deadband: f64,
}

impl ActuatorSpec {
    pub fn new(initial: f64, rate: f64, min: f64, max: f64, deadband: f64) -> Self {
        Self { initial, rate, min, max, deadband }
    }
}

/// An actuator that moves at a bounded rate towards its commanded target.
///
/// Two states: idle and moving.  An idle actuator starts moving when the
/// target is further away than the dead-band; a moving one keeps going until
/// it reaches the target, even if the remaining distance drops inside the
/// dead-band.  The last step is shortened so the position never passes the
/// target, and the position never leaves `[min, max]`.
#[derive(Clone, Debug)]
pub struct LinearActuator {
    spec:     ActuatorSpec,
    position: f64,
    target:   f64,
    moving:   bool,
    rng:      StreamRng,
}

impl LinearActuator {
    pub fn new(spec: ActuatorSpec, rng: StreamRng) -> Self {
        let position = spec.initial.clamp(spec.min, spec.max);
        Self { spec, position, target: position, moving: false, rng }
    }

    #[inline]
    pub fn spec(&self) -> &ActuatorSpec {
        &self.spec
    }

    /// Clamp `value` to the travel range and make it the new target.
    /// Returns the clamped target.
    pub fn set_commanded(&mut self, value: f64) -> f64 {
        self.target = value.clamp(self.spec.min, self.spec.max);
        self.target
    }

    #[inline]
    pub fn measured(&self) -> f64 {
        self.position
    }

    #[inline]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Advance the motor by `dt` seconds.
    pub fn actuate(&mut self, dt: f64) {
        let delta = self.target - self.position;
        if !self.moving && delta.abs() > self.spec.deadband {
            self.moving = true;
        }
        if !self.moving {
            return;
        }

        let full_step = self.spec.rate * dt;
        if delta.abs() <= full_step {
            self.finish();
            return;
        }

        let jitter = 1.0 + (self.rng.gen_range(0.0..1.0) - 0.5) * JITTER_WIDTH;
        let step = full_step.copysign(delta) * jitter;
        let next = (self.position + step).clamp(self.spec.min, self.spec.max);
        if (self.target - next) * delta <= 0.0 {
            self.finish();
        } else {
            self.position = next;
        }
    }

    fn finish(&mut self) {
        self.position = self.target;
        self.moving = false;
    }
}
