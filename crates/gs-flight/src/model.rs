//! The RK4 flight integrator.

use std::f64::consts::{FRAC_PI_2, TAU};

use gs_core::{RngStream, StreamRng};
use nalgebra::{Matrix2, Vector2};

use crate::fin::FinModel;
use crate::pitch::PitchModel;
use crate::{FlightParams, FlightResult};

/// Gravitational acceleration, m s⁻².
pub const GRAVITY: f64 = 9.81;

/// Position (m, LMC east/north/up) and velocity (m s⁻¹) of the vehicle
/// through the water.  `z` is 0 at the surface and negative below it.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Kinematics {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub u: f64,
    pub v: f64,
    pub w: f64,
}

impl Kinematics {
    /// Horizontal speed.
    #[inline]
    pub fn speed(&self) -> f64 {
        self.u.hypot(self.v)
    }
}

/// Control inputs held constant over one step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StepInput {
    /// Pitch, rad, nose up positive.
    pub pitch:   f64,
    /// In-situ density, kg m⁻³.
    pub rho:     f64,
    /// Buoyancy change from the pump, cc.
    pub ballast: f64,
    /// Heading, rad, clockwise from north.
    pub heading: f64,
}

/// Steady-flight dynamics in the vertical plane along the heading, with
/// the pitch and fin sub-models that feed it.
#[derive(Clone, Debug)]
pub struct FlightModel {
    params: FlightParams,
    dt:     f64,
    pitch:  PitchModel,
    fin:    FinModel,
}

impl FlightModel {
    /// A model stepping `dt` seconds at a time.  Fin noise draws from its own
    /// stream of `seed`.
    pub fn new(params: FlightParams, dt: f64, seed: u64) -> FlightResult<Self> {
        params.validate()?;
        if !(dt > 0.0) {
            return Err(crate::FlightError::InvalidParameter { name: "dt", value: dt });
        }
        let pitch = PitchModel::from_params(&params);
        let fin = FinModel::new(
            params.fin_c0,
            params.fin_c1,
            params.fin_noise,
            StreamRng::new(seed, RngStream::FinNoise),
        )?;
        Ok(Self { params, dt, pitch, fin })
    }

    #[inline]
    pub fn params(&self) -> &FlightParams {
        &self.params
    }

    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    // ── Forces ────────────────────────────────────────────────────────────

    /// Buoyancy minus weight, N, at height `z` with `ballast` cc pumped.
    /// The hull shrinks with pressure.
    pub fn net_buoyancy(&self, z: f64, rho: f64, ballast: f64) -> f64 {
        let pressure = (-z).max(0.0) * 1e4; // Pa, 1 dbar per metre
        let hull = self.params.vg * (1.0 - self.params.epsilon * pressure);
        let buoyancy = GRAVITY * rho * (hull + ballast * 1e-6);
        buoyancy - self.params.mg * GRAVITY
    }

    /// Inverse of the mass matrix including added mass, in the
    /// (horizontal, vertical) frame for a hull pitched at `pitch`.
    pub fn inverse_mass_matrix(&self, pitch: f64) -> Matrix2<f64> {
        let (s, c) = pitch.sin_cos();
        let rotation = Matrix2::new(c, -s, s, c);
        let body = Matrix2::new(
            1.0 / ((1.0 + self.params.k1) * self.params.mg),
            0.0,
            0.0,
            1.0 / ((1.0 + self.params.k2) * self.params.mg),
        );
        rotation * body * rotation.transpose()
    }

    /// Velocity increment over `h` seconds for flow velocity `vel`
    /// (horizontal, vertical) with lift and quadratic drag.
    fn increment(&self, vel: Vector2<f64>, pitch: f64, rho: f64, fbg: f64, minv: &Matrix2<f64>, h: f64) -> Vector2<f64> {
        let speed = vel.norm();
        let force = if speed > 0.0 {
            let glide = vel.y.atan2(vel.x);
            let alpha = pitch - glide;
            let q = 0.5 * rho * self.params.area * speed * speed;
            let lift = q * (self.params.aw + self.params.ah) * alpha;
            let drag = q * (self.params.cd0 + self.params.cd1 * alpha * alpha);
            let (sn, cs) = (vel.y / speed, vel.x / speed);
            Vector2::new(-drag * cs - lift * sn, fbg - drag * sn + lift * cs)
        } else {
            Vector2::new(0.0, fbg)
        };
        minv * force * h
    }

    // ── Integration ───────────────────────────────────────────────────────

    /// Advance `state` by one step with classical fourth-order Runge-Kutta
    /// on horizontal and vertical speed; displacement uses the same stage
    /// weights.
    ///
    /// A step that would lift the vehicle out of the water instead ends
    /// exactly at `z = 0` with all velocities zero.
    pub fn step_integrate(&self, state: Kinematics, input: StepInput) -> Kinematics {
        let h = self.dt;
        let fbg = self.net_buoyancy(state.z, input.rho, input.ballast);
        let minv = self.inverse_mass_matrix(input.pitch);
        let k = |vel: Vector2<f64>| self.increment(vel, input.pitch, input.rho, fbg, &minv, h);

        let v0 = Vector2::new(state.speed(), state.w);
        let k1 = k(v0);
        let v1 = v0 + k1 * 0.5;
        let k2 = k(v1);
        let v2 = v0 + k2 * 0.5;
        let k3 = k(v2);
        let v3 = v0 + k3;
        let k4 = k(v3);

        let mut vel = v0 + (k1 + k2 * 2.0 + k3 * 2.0 + k4) / 6.0;
        let mut disp = (v0 + v1 * 2.0 + v2 * 2.0 + v3) * (h / 6.0);

        if state.z + disp.y > 0.0 {
            vel = Vector2::zeros();
            disp = Vector2::new(0.0, -state.z);
        }

        // Heading is clockwise from north; the math angle is from east.
        let (sin_h, cos_h) = (FRAC_PI_2 - input.heading).sin_cos();
        Kinematics {
            x: state.x + disp.x * cos_h,
            y: state.y + disp.x * sin_h,
            z: state.z + disp.y,
            u: vel.x * cos_h,
            v: vel.x * sin_h,
            w: vel.y,
        }
    }

    // ── Sub-models ────────────────────────────────────────────────────────

    /// New `(heading, heading_rate)` after one step with the fin at `fin`
    /// rad and horizontal speed `speed`.  Heading is kept in `[0, 2π)`.
    pub fn heading_from_fin(&mut self, heading: f64, heading_rate: f64, fin: f64, speed: f64) -> (f64, f64) {
        let rate = self.fin.heading_rate(self.dt, fin, speed, heading_rate);
        ((heading + rate * self.dt).rem_euclid(TAU), rate)
    }

    /// Pitch, rad, for battery position (inch), pumped volume (cc) and
    /// pressure (bar).
    pub fn pitch_from_drives(&self, battpos: f64, ballast: f64, pressure: f64) -> f64 {
        self.pitch.pitch(battpos, ballast, pressure)
    }
}
