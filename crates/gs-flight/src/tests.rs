//! Unit tests for the flight model.

#[cfg(test)]
mod support {
    use crate::{FlightModel, FlightParams, StepInput};

    pub fn quiet_params() -> FlightParams {
        FlightParams { fin_noise: 0.0, ..FlightParams::default() }
    }

    pub fn model() -> FlightModel {
        FlightModel::new(quiet_params(), 1.0, 1).unwrap()
    }

    pub fn input(pitch: f64, ballast: f64, heading: f64) -> StepInput {
        StepInput { pitch, rho: 1025.0, ballast, heading }
    }
}

#[cfg(test)]
mod integrator {
    use approx::assert_abs_diff_eq;
    use nalgebra::Matrix2;

    use super::support::{input, model};
    use crate::Kinematics;

    #[test]
    fn heavy_glider_dives_along_heading() {
        let m = model();
        let mut k = Kinematics::default();
        for _ in 0..200 {
            k = m.step_integrate(k, input(-0.45, -233.0, 0.0));
        }
        assert!(k.z < -10.0, "z = {}", k.z);
        assert!(k.w < 0.0);
        assert!(k.v > 0.05, "moves north");
        assert_abs_diff_eq!(k.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(k.u, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn heading_east_moves_east() {
        let m = model();
        let mut k = Kinematics::default();
        for _ in 0..100 {
            k = m.step_integrate(k, input(-0.45, -233.0, std::f64::consts::FRAC_PI_2));
        }
        assert!(k.x > 1.0);
        assert_abs_diff_eq!(k.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn step_that_breaks_surface_is_clamped() {
        let m = model();
        let k = Kinematics { x: 5.0, y: 3.0, z: -0.05, u: 0.28, v: 0.0, w: 0.157 };
        let out = m.step_integrate(k, input(0.45, 200.0, 1.0));
        assert_eq!(out.z, 0.0);
        assert_eq!((out.u, out.v, out.w), (0.0, 0.0, 0.0));
        assert_eq!((out.x, out.y), (5.0, 3.0));
    }

    #[test]
    fn buoyant_glider_stays_at_surface() {
        let m = model();
        let mut k = Kinematics::default();
        for _ in 0..50 {
            k = m.step_integrate(k, input(0.45, 200.0, 0.0));
            assert!(k.z <= 0.0);
        }
        assert_eq!(k.z, 0.0);
    }

    #[test]
    fn hull_compression_reduces_buoyancy() {
        let m = model();
        let surface = m.net_buoyancy(0.0, 1025.0, 0.0);
        let deep = m.net_buoyancy(-500.0, 1025.0, 0.0);
        assert!(deep < surface);
        let pumped = m.net_buoyancy(0.0, 1025.0, 100.0);
        assert_abs_diff_eq!(pumped - surface, 9.81 * 1025.0 * 1e-4, epsilon = 1e-9);
    }

    #[test]
    fn inverse_mass_matrix_inverts() {
        let m = model();
        let p = m.params();
        let pitch = -0.4_f64;
        let (s, c) = pitch.sin_cos();
        let r = Matrix2::new(c, -s, s, c);
        let mass = r * Matrix2::new((1.0 + p.k1) * p.mg, 0.0, 0.0, (1.0 + p.k2) * p.mg) * r.transpose();
        let product = m.inverse_mass_matrix(pitch) * mass;
        assert_abs_diff_eq!(product, Matrix2::identity(), epsilon = 1e-12);
    }
}

#[cfg(test)]
mod sub_models {
    use std::f64::consts::TAU;

    use approx::assert_abs_diff_eq;
    use gs_core::{RngStream, StreamRng};

    use super::support::model;
    use crate::{FinModel, FlightParams, PitchModel};

    #[test]
    fn pitch_fit() {
        let pm = PitchModel::from_params(&FlightParams::default());
        assert_abs_diff_eq!(pm.pitch(0.0, 0.0, 0.0), 0.14_f64.atan());
        assert!(pm.pitch(0.0, 200.0, 0.0) > pm.pitch(0.0, 0.0, 0.0), "more oil, nose up");
        assert!(pm.pitch(1.0, 0.0, 0.0) < pm.pitch(0.0, 0.0, 0.0), "battery forward, nose down");
    }

    #[test]
    fn fin_rate_decays_without_fin() {
        let mut fin = FinModel::new(0.5, 15.0, 0.0, StreamRng::new(1, RngStream::FinNoise)).unwrap();
        let r = fin.heading_rate(1.0, 0.0, 0.3, 0.1);
        assert_abs_diff_eq!(r, 0.1 * (1.0 - 1.0 / 30.0) / (1.0 + 1.0 / 30.0));
    }

    #[test]
    fn negative_noise_is_rejected() {
        assert!(FinModel::new(0.5, 15.0, -1.0, StreamRng::new(1, RngStream::FinNoise)).is_err());
    }

    #[test]
    fn heading_wraps_into_one_turn() {
        let mut m = model();
        let (mut heading, mut rate) = (6.0, 0.0);
        for _ in 0..200 {
            (heading, rate) = m.heading_from_fin(heading, rate, 0.45, 0.4);
            assert!((0.0..TAU).contains(&heading));
        }
        assert!(rate > 0.0);
    }

    #[test]
    fn fin_noise_is_seeded() {
        let run = |seed| {
            let mut fin = FinModel::new(0.5, 15.0, 0.01, StreamRng::new(seed, RngStream::FinNoise)).unwrap();
            (0..10).map(|_| fin.heading_rate(1.0, 0.1, 0.3, 0.0)).collect::<Vec<_>>()
        };
        assert_eq!(run(5), run(5));
        assert_ne!(run(5), run(6));
    }
}

#[cfg(test)]
mod params {
    use crate::{FlightError, FlightModel, FlightParams};

    #[test]
    fn literature_names_deserialize() {
        let p: FlightParams = serde_json::from_str(r#"{ "Cd0": 0.2, "mg": 73.3, "Vg": 0.071542, "T1": 2052 }"#).unwrap();
        assert_eq!(p.cd0, 0.2);
        assert_eq!(p.mg, 73.3);
        assert_eq!(p.t1, 2052.0);
        assert_eq!(p.t2, FlightParams::default().t2);
    }

    #[test]
    fn bad_values_are_rejected() {
        let zero_mass = FlightParams { mg: 0.0, ..FlightParams::default() };
        assert!(matches!(
            FlightModel::new(zero_mass, 1.0, 0),
            Err(FlightError::InvalidParameter { name: "mg", .. })
        ));
        assert!(matches!(
            FlightModel::new(FlightParams::default(), 0.0, 0),
            Err(FlightError::InvalidParameter { name: "dt", .. })
        ));
        let no_waterline = FlightParams { surface_depth: 0.0, ..FlightParams::default() };
        assert!(matches!(
            FlightModel::new(no_waterline, 1.0, 0),
            Err(FlightError::InvalidParameter { name: "surface_depth", .. })
        ));
    }
}

#[cfg(test)]
mod environment {
    use gs_core::GeoPoint;

    use crate::{ConstantWater, EnvironmentProvider, WaterSample};

    #[test]
    fn constant_water_is_constant() {
        let mut water = ConstantWater::default();
        let a = water.sample(0.0, GeoPoint::new(54.0, 7.0), -10.0).unwrap();
        let b = water.sample(1e6, GeoPoint::new(10.0, 1.0), -90.0).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.density, 1025.0);
        assert!(a.is_plausible());
    }

    #[test]
    fn implausible_samples() {
        let fresh_air = WaterSample { density: 1.2, ..WaterSample::default() };
        let torrent = WaterSample { u: 12.0, ..WaterSample::default() };
        let nan = WaterSample { w: f64::NAN, ..WaterSample::default() };
        assert!(!fresh_air.is_plausible());
        assert!(!torrent.is_plausible());
        assert!(!nan.is_plausible());
    }
}
