//! The `Glider` aggregate: hardware, flight model, GPS and water.

use std::collections::VecDeque;

use gs_core::{Field, GeoPoint, GliderState, LocalFrame};
use gs_flight::{EnvironmentProvider, FlightModel, Kinematics, StepInput, WaterSample, GRAVITY};
use gs_hardware::{Gps, Hardware};
use log::warn;

use crate::{Setpoints, SimError, SimResult};

/// Samples in the running mean of `m_speed`.
const SPEED_WINDOW: usize = 15;

/// Vertical speed below which the vehicle counts as holding depth, m/s.
const SAMEDEPTH_RATE: f64 = 1e-4;

/// Second environment query after an implausible sample is made this much
/// shallower, m.
const ANOMALY_RETRY_DZ: f64 = 1.0;

/// One simulated vehicle.
///
/// Keeps the true position (LMC metres, `z` up) separately from the
/// dead-reckoned estimate the flight computer sees in `m_lmc_x/y`.
pub struct Glider {
    pub hardware:   Hardware,
    pub flight:     FlightModel,
    pub gps:        Gps,
    environment:    Box<dyn EnvironmentProvider>,
    kinematics:     Kinematics,
    /// Origin `kinematics.x/y` are relative to.
    frame_origin:   GeoPoint,
    speeds:         VecDeque<f64>,
}

impl Glider {
    pub fn new(
        hardware:    Hardware,
        flight:      FlightModel,
        gps:         Gps,
        environment: Box<dyn EnvironmentProvider>,
        origin:      GeoPoint,
    ) -> Self {
        Self {
            hardware,
            flight,
            gps,
            environment,
            kinematics: Kinematics::default(),
            frame_origin: origin,
            speeds: VecDeque::with_capacity(SPEED_WINDOW),
        }
    }

    /// True position and velocity relative to the current LMC origin.
    #[inline]
    pub fn kinematics(&self) -> Kinematics {
        self.kinematics
    }

    /// Shallower than this the vehicle counts as surfaced, m.
    #[inline]
    pub fn surface_depth(&self) -> f64 {
        self.flight.params().surface_depth
    }

    pub fn environment_name(&self) -> &str {
        self.environment.name()
    }

    /// Hand setpoints to the actuators; the clamped targets go into the
    /// `c_*` fields.
    pub fn command(&mut self, state: &mut GliderState, setpoints: Setpoints) {
        if let Some(v) = setpoints.pump {
            state.set(Field::CBallastPumped, self.hardware.pump.set_commanded(v));
        }
        if let Some(v) = setpoints.battpos {
            state.set(Field::CBattPos, self.hardware.pitch_motor.set_commanded(v));
        }
        if let Some(v) = setpoints.fin {
            state.set(Field::CFin, self.hardware.fin.set_commanded(v));
        }
    }

    /// Advance the vehicle by one physics step.
    pub fn update(&mut self, state: &mut GliderState) -> SimResult<()> {
        let dt = self.flight.dt();
        self.follow_origin(state);

        // Status is read with the receiver state of the previous step.
        let gps_status = self.gps.status(state.time(), self.kinematics.z);
        state.set(Field::GpsStatus, gps_status);
        self.gps.set_enabled(state.flag(Field::CGpsOn));

        self.hardware.actuate(dt);
        state.set(Field::BallastPumped, self.hardware.pump.measured());
        state.set(Field::Fin, self.hardware.fin.measured());
        state.set(Field::BattPos, self.hardware.pitch_motor.measured());

        let frame = state.frame();
        let here = frame.to_geo(self.kinematics.x, self.kinematics.y);
        let water = self.sample_environment(state.time(), here, self.kinematics.z)?;
        state.set(Field::Temp, water.temperature);
        state.set(Field::Salt, water.salinity);
        state.set(Field::WaterDepth, water.water_depth);
        state.set(Field::Rho, water.density);
        state.set(Field::XU, water.u);
        state.set(Field::XV, water.v);
        state.set(Field::XW, water.w);
        state.set(Field::XWaterDepth, water.water_depth + water.eta);

        let (heading, heading_rate) = self.flight.heading_from_fin(
            state.get(Field::Heading),
            state.get(Field::HeadingRate),
            state.get(Field::Fin),
            state.get(Field::Speed),
        );
        let pitch = self.flight.pitch_from_drives(
            state.get(Field::BattPos),
            state.get(Field::BallastPumped),
            state.get(Field::Pressure),
        );
        state.set(Field::Heading, heading);
        state.set(Field::HeadingRate, heading_rate);
        state.set(Field::Pitch, pitch);

        let input = StepInput { pitch, rho: water.density, ballast: state.get(Field::BallastPumped), heading };
        let mut k = self.flight.step_integrate(self.kinematics, input);
        state.set(Field::XEastwardVelocity, k.u);
        state.set(Field::XNorthwardVelocity, k.v);
        state.set(Field::XUpwardVelocity, k.w);

        let speed = k.speed();
        state.set(Field::XSpeed, speed);
        if speed > 0.0 {
            if self.speeds.len() == SPEED_WINDOW {
                self.speeds.pop_front();
            }
            self.speeds.push_back(speed);
            let mean = self.speeds.iter().sum::<f64>() / self.speeds.len() as f64;
            state.set(Field::Speed, mean);
        }

        // Advection by the ambient current.
        k.x += water.u * dt;
        k.y += water.v * dt;
        k.z += water.w * dt;
        self.kinematics = k;

        let depth = -k.z;
        state.set(Field::Depth, depth);
        state.set(Field::Pressure, (depth * water.density * GRAVITY * 1e-5).max(0.0));

        self.dead_reckon(state, gps_status, dt);

        if k.w.abs() < SAMEDEPTH_RATE {
            state.add(Field::SamedepthFor, dt);
            if depth > self.surface_depth() {
                state.add(Field::HoverFor, dt);
                state.add(Field::StalledFor, dt);
            }
        } else {
            state.reset_idle_timers();
        }
        state.set(Field::Altitude, water.water_depth - depth);

        state.add(Field::PresentTime, dt);
        state.add(Field::PresentSecsIntoMission, dt);
        state.add(Field::Nocomms, dt);
        state.add(Field::TimeSinceCycleStart, dt);

        state.set(Field::XLmcX, k.x);
        state.set(Field::XLmcY, k.y);
        state.set(Field::XLmcZ, k.z);
        let (lat, lon) = frame.to_geo(k.x, k.y).to_nmea();
        state.set(Field::XLat, lat);
        state.set(Field::XLon, lon);
        Ok(())
    }

    /// Dead-reckoned LMC position: snapped to the true position on a GPS
    /// fix, integrated from the vehicle's own velocity otherwise.
    fn dead_reckon(&mut self, state: &mut GliderState, gps_status: f64, dt: f64) {
        let (mut x, mut y) = if gps_status == 0.0 {
            (self.kinematics.x, self.kinematics.y)
        } else {
            (
                state.get(Field::LmcX) + dt * state.get(Field::XEastwardVelocity),
                state.get(Field::LmcY) + dt * state.get(Field::XNorthwardVelocity),
            )
        };
        if state.flag(Field::UseCurrentCorrection) {
            x += dt * state.get(Field::WaterVx);
            y += dt * state.get(Field::WaterVy);
        }
        state.set(Field::LmcX, x);
        state.set(Field::LmcY, y);
        let (lat, lon) = state.frame().to_geo(x, y).to_nmea();
        state.set(Field::Lat, lat);
        state.set(Field::Lon, lon);
    }

    /// Re-express the true position when a behavior has moved the LMC
    /// origin since the last step.
    fn follow_origin(&mut self, state: &GliderState) {
        let origin = state.origin();
        if origin == self.frame_origin {
            return;
        }
        let old = LocalFrame::new(self.frame_origin);
        let here = old.to_geo(self.kinematics.x, self.kinematics.y);
        let (x, y) = state.frame().to_local(here);
        self.kinematics.x = x;
        self.kinematics.y = y;
        self.frame_origin = origin;
    }

    /// Water at the vehicle.  Provider errors fall back to defaults; an
    /// implausible sample is retried once slightly shallower, and a second
    /// implausible sample is fatal.
    fn sample_environment(&mut self, t: f64, at: GeoPoint, z: f64) -> SimResult<WaterSample> {
        let first = self.query(t, at, z);
        if first.is_plausible() {
            return Ok(first);
        }
        let retry_z = (z + ANOMALY_RETRY_DZ).min(0.0);
        warn!("implausible water sample at z = {z:.1} m ({first:?}); retrying at z = {retry_z:.1} m");
        let second = self.query(t, at, retry_z);
        if second.is_plausible() {
            Ok(second)
        } else {
            Err(SimError::EnvironmentAnomaly { t, z })
        }
    }

    fn query(&mut self, t: f64, at: GeoPoint, z: f64) -> WaterSample {
        match self.environment.sample(t, at, z) {
            Ok(sample) => sample,
            Err(e) => {
                warn!("{e}; using default water properties");
                WaterSample::default()
            }
        }
    }
}
