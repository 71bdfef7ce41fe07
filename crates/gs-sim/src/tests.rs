//! Tests for arbitration, the vehicle update and the mission loop.

// ── Helpers ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod support {
    use gs_control::{BehaviorConfig, ControlBehavior};
    use gs_core::{GeoPoint, GliderState};
    use gs_flight::{ConstantWater, EnvironmentProvider, FlightError, FlightModel, FlightParams, FlightResult, WaterSample};
    use gs_hardware::{Gps, Hardware, HardwarePreset};

    use crate::{Glider, LayeredControl};

    /// 2010-05-19 00:30 UTC
    pub const T0: f64 = 1_274_229_000.0;

    pub fn origin() -> GeoPoint {
        GeoPoint::from_nmea(5413.0, 740.5)
    }

    pub fn state() -> GliderState {
        GliderState::new(T0, origin())
    }

    pub fn hardware() -> Hardware {
        Hardware::preset(HardwarePreset::Shallow100, 7)
    }

    pub fn glider(environment: Box<dyn EnvironmentProvider>) -> Glider {
        let flight = FlightModel::new(FlightParams::default(), 1.0, 7).unwrap();
        Glider::new(hardware(), flight, Gps::new(30.0), environment, origin())
    }

    pub fn calm_glider() -> Glider {
        glider(Box::new(ConstantWater(WaterSample::default())))
    }

    pub fn build(config: BehaviorConfig) -> Box<dyn ControlBehavior> {
        config.build().unwrap()
    }

    pub fn stack(configs: Vec<BehaviorConfig>) -> LayeredControl {
        let mut control = LayeredControl::new();
        for config in configs {
            control.push(build(config)).unwrap();
        }
        control
    }

    /// Always reports sea water too light to be real.
    pub struct Freshened;

    impl EnvironmentProvider for Freshened {
        fn sample(&mut self, _t: f64, _at: GeoPoint, _z: f64) -> FlightResult<WaterSample> {
            Ok(WaterSample { density: 500.0, ..WaterSample::default() })
        }
    }

    /// Every lookup falls outside the model domain.
    pub struct OutOfDomain;

    impl EnvironmentProvider for OutOfDomain {
        fn sample(&mut self, t: f64, _at: GeoPoint, _z: f64) -> FlightResult<WaterSample> {
            Err(FlightError::Environment {
                provider: "grid".to_owned(),
                reason:   format!("t = {t} outside the forecast"),
            })
        }

        fn name(&self) -> &str {
            "grid"
        }
    }
}

// ── Arbitration ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod arbitration {
    use std::f64::consts::FRAC_PI_2;

    use approx::assert_relative_eq;
    use gs_control::behaviors::{AbendParams, DiveClimbParams, GotoListParams};
    use gs_control::{BehaviorConfig, Phase};
    use gs_core::{Field, MissionStatus};

    use super::support::{hardware, stack, state};
    use crate::Setpoints;

    fn dive(target_depth: f64, bpump_value: f64) -> BehaviorConfig {
        BehaviorConfig::DiveTo(DiveClimbParams { target_depth, bpump_value, ..DiveClimbParams::default() })
    }

    fn abend(overdepth: f64) -> BehaviorConfig {
        BehaviorConfig::Abend(AbendParams { overdepth, ..AbendParams::default() })
    }

    #[test]
    fn higher_behavior_wins_the_channel() {
        let mut control = stack(vec![dive(50.0, -100.0), dive(50.0, -200.0)]);
        let (mut gs, mut ms, mut hw) = (state(), MissionStatus::start(), hardware());

        let sp = control.cycle(&mut gs, &mut ms, &mut hw).unwrap();
        assert_eq!(sp.pump, Some(-200.0));
        assert_eq!(gs[Field::CBallastPumped], -200.0);
    }

    #[test]
    fn dive_to_activates_then_releases_the_pump() {
        let mut control = stack(vec![dive(10.0, -233.0), abend(100.0)]);
        let (mut gs, mut ms, mut hw) = (state(), MissionStatus::start(), hardware());

        let sp = control.cycle(&mut gs, &mut ms, &mut hw).unwrap();
        assert_eq!(control.behaviors().next().map(|b| b.phase()), Some(Phase::Active));
        assert_eq!(sp.pump, Some(-233.0));
        assert_eq!(sp.battpos, Some(0.0));
        assert_eq!(sp.fin, None);
        assert_eq!(gs[Field::BpumpStack], 1.0);
        assert_eq!(gs[Field::PitchStack], 1.0);
        assert_eq!(gs[Field::FinStack], 0.0);
        assert_eq!(gs[Field::Stack], 2.0);

        gs.set(Field::Depth, 10.5);
        let sp = control.cycle(&mut gs, &mut ms, &mut hw).unwrap();
        assert_eq!(control.behaviors().next().map(|b| b.phase()), Some(Phase::Complete));
        assert_eq!(sp, Setpoints::default());
        assert_eq!(gs[Field::Stack], 0.0);
        assert!(!ms.is_aborting());
    }

    #[test]
    fn keep_stack_busy_claims_every_channel() {
        let mut control = stack(vec![abend(100.0)]);
        let (mut gs, mut ms, mut hw) = (state(), MissionStatus::start(), hardware());
        gs.set(Field::KeepStackBusy, 1.0);

        control.cycle(&mut gs, &mut ms, &mut hw).unwrap();
        assert_eq!(gs[Field::FinStack], 1.0);
        assert_eq!(gs[Field::Stack], 2.0);
    }

    #[test]
    fn abort_forces_safe_ascent() {
        let mut control = stack(vec![dive(500.0, -233.0), abend(100.0)]);
        let (mut gs, mut ms, mut hw) = (state(), MissionStatus::start(), hardware());

        control.cycle(&mut gs, &mut ms, &mut hw).unwrap();
        gs.set(Field::Depth, 101.0);
        control.cycle(&mut gs, &mut ms, &mut hw).unwrap();
        assert!(ms.contains(MissionStatus::ABORT_OVERDEPTH));

        let sp = control.cycle(&mut gs, &mut ms, &mut hw).unwrap();
        assert_eq!(sp, Setpoints::SAFE_ASCENT);
    }

    #[test]
    fn pitch_directive_moves_the_battery() {
        let params = DiveClimbParams { target_depth: 50.0, use_pitch: 3, pitch_value: -0.4, ..DiveClimbParams::default() };
        let mut control = stack(vec![BehaviorConfig::DiveTo(params)]);
        let (mut gs, mut ms, mut hw) = (state(), MissionStatus::start(), hardware());
        let before = gs[Field::CBattPos];

        let sp = control.cycle(&mut gs, &mut ms, &mut hw).unwrap();
        let expected = before + 0.4 * 0.4_f64.tan();
        assert_relative_eq!(sp.battpos.unwrap(), expected, epsilon = 1e-12);
        assert_relative_eq!(gs[Field::CBattPos], expected, epsilon = 1e-12);
        assert_eq!(gs[Field::CPitch], -0.4);
    }

    #[test]
    fn waypoint_becomes_heading_and_fin() {
        let (lat, lon) = state().frame().to_geo(100.0, 0.0).to_nmea();
        let params = GotoListParams { num_legs_to_run: 1, waypoints: vec![[lon, lat]], ..GotoListParams::default() };
        let mut control = stack(vec![BehaviorConfig::GotoList(params)]);
        let (mut gs, mut ms, mut hw) = (state(), MissionStatus::start(), hardware());

        let sp = control.cycle(&mut gs, &mut ms, &mut hw).unwrap();
        assert_relative_eq!(gs[Field::CHeading], FRAC_PI_2, epsilon = 1e-3);
        let fin = sp.fin.unwrap();
        assert!(fin > 0.0, "turning right towards the east, got {fin}");
        assert_eq!(gs[Field::CFin], fin);
        assert_eq!(gs[Field::FinStack], 1.0);
    }
}

// ── Heading helpers ───────────────────────────────────────────────────────────

#[cfg(test)]
mod heading {
    use std::f64::consts::{FRAC_PI_2, PI};

    use approx::assert_relative_eq;
    use gs_core::Field;

    use super::support::state;
    use crate::{aim_at, wrap_angle};

    #[test]
    fn wrap_angle_takes_the_short_way() {
        assert_relative_eq!(wrap_angle(0.1 - 6.2), 0.1 - 6.2 + 2.0 * PI, epsilon = 1e-12);
        assert_relative_eq!(wrap_angle(3.0 * PI - 0.1), PI - 0.1, epsilon = 1e-12);
        assert_relative_eq!(wrap_angle(-FRAC_PI_2), -FRAC_PI_2, epsilon = 1e-12);
        assert_eq!(wrap_angle(0.0), 0.0);
    }

    #[test]
    fn aim_at_is_clockwise_from_north() {
        let gs = state();
        assert_relative_eq!(aim_at(&gs, 0.0, 100.0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(aim_at(&gs, 100.0, 0.0), FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(aim_at(&gs, 0.0, -100.0), PI, epsilon = 1e-12);
        assert_relative_eq!(aim_at(&gs, -100.0, 0.0), 3.0 * FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn current_correction_aims_upstream() {
        let mut gs = state();
        gs.set(Field::UseCurrentCorrection, 1.0);
        gs.set(Field::Speed, 0.5);
        gs.set(Field::WaterVx, 0.1);
        gs.set(Field::WaterVy, 0.1);
        let heading = aim_at(&gs, 0.0, 100.0);
        assert!(heading > 3.0 * FRAC_PI_2, "should lead west of north, got {heading}");

        // no-fix sentinel
        gs.set(Field::WaterVx, -1.0);
        gs.set(Field::WaterVy, -1.0);
        assert_relative_eq!(aim_at(&gs, 0.0, 100.0), 0.0, epsilon = 1e-12);
    }
}

// ── Glider update ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod glider {
    use gs_core::Field;

    use super::support::{calm_glider, glider, state, Freshened, OutOfDomain, T0};
    use crate::{Setpoints, SimError};

    #[test]
    fn buoyant_vehicle_stays_at_the_surface_and_gets_a_fix() {
        let mut g = calm_glider();
        let mut gs = state();
        gs.set(Field::CGpsOn, 1.0);
        g.command(&mut gs, Setpoints::AT_SURFACE);

        for _ in 0..40 {
            g.update(&mut gs).unwrap();
        }
        assert_eq!(gs[Field::Depth].abs(), 0.0);
        assert_eq!(gs[Field::GpsStatus], 0.0);
        assert_eq!(gs[Field::LmcX], gs[Field::XLmcX]);
        assert_eq!(gs[Field::PresentTime], T0 + 40.0);
        assert_eq!(gs[Field::PresentSecsIntoMission], 40.0);
        assert_eq!(gs[Field::BallastPumped], 233.0);
    }

    #[test]
    fn heavy_vehicle_dives() {
        let mut g = calm_glider();
        let mut gs = state();
        gs.set(Field::CGpsOn, 1.0);
        g.command(&mut gs, Setpoints { battpos: Some(0.9), pump: Some(-233.0), fin: Some(0.0) });

        for _ in 0..200 {
            g.update(&mut gs).unwrap();
        }
        assert!(gs[Field::Depth] > 1.0, "depth {}", gs[Field::Depth]);
        assert!(gs[Field::XUpwardVelocity] < 0.0);
        assert!(gs[Field::Pitch] < 0.0);
        assert!(gs[Field::Speed] > 0.0);
        assert_eq!(gs[Field::GpsStatus], 2.0);
        assert!(gs[Field::Altitude] < 40.0);
        assert_eq!(gs[Field::Depth], -g.kinematics().z);
    }

    #[test]
    fn repeated_implausible_water_is_fatal() {
        let mut g = glider(Box::new(Freshened));
        let mut gs = state();
        let err = g.update(&mut gs).unwrap_err();
        assert!(matches!(err, SimError::EnvironmentAnomaly { .. }), "{err}");
    }

    #[test]
    fn provider_errors_fall_back_to_defaults() {
        let mut g = glider(Box::new(OutOfDomain));
        let mut gs = state();
        g.update(&mut gs).unwrap();
        assert_eq!(gs[Field::Rho], 1025.0);
        assert_eq!(gs[Field::WaterDepth], 40.0);
        assert_eq!(g.environment_name(), "grid");
    }
}

// ── Mission loop ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod mission {
    use gs_control::behaviors::{AbendParams, DiveClimbParams, YoParams};
    use gs_control::BehaviorConfig;
    use gs_core::{Field, GliderState, MissionStatus};
    use gs_flight::WaterSample;

    use crate::{EndReason, MissionBuilder, MissionConfig, MissionReport, MissionStart, NoopSink, Setpoints, SimError, TelemetrySink};

    #[derive(Default)]
    struct Counting {
        starts: usize,
        cycles: usize,
        steps:  usize,
        ends:   usize,
        deepest: f64,
    }

    impl TelemetrySink for Counting {
        fn on_start(&mut self, _state: &GliderState) {
            self.starts += 1;
        }

        fn on_cycle(&mut self, _state: &GliderState, _setpoints: &Setpoints) {
            self.cycles += 1;
        }

        fn on_step(&mut self, state: &GliderState, _status: MissionStatus) {
            self.steps += 1;
            self.deepest = self.deepest.max(state.get(Field::Depth));
        }

        fn on_end(&mut self, _state: &GliderState, _report: &MissionReport) {
            self.ends += 1;
        }
    }

    fn config(behaviors: Vec<BehaviorConfig>) -> MissionConfig {
        MissionConfig { max_days: Some(0.05), behaviors, ..MissionConfig::default() }
    }

    fn dive(target_depth: f64) -> BehaviorConfig {
        BehaviorConfig::DiveTo(DiveClimbParams { target_depth, ..DiveClimbParams::default() })
    }

    #[test]
    fn shallow_yo_quits_at_the_surface() {
        let yo = YoParams { d_target_depth: 5.0, c_target_depth: 2.0, ..YoParams::default() };
        let cfg = config(vec![
            BehaviorConfig::Abend(AbendParams { overdepth: 50.0, ..AbendParams::default() }),
            BehaviorConfig::Yo(yo),
        ]);
        let mut mission = MissionBuilder::new(cfg).build().unwrap();
        let mut sink = Counting::default();

        let report = mission.run(&mut sink).unwrap();
        assert_eq!(report.reason, EndReason::Completed);
        assert!(report.status.contains(MissionStatus::TO_QUIT | MissionStatus::COMPLETED));
        assert!(!report.status.is_aborting());
        assert!(report.max_depth > 5.0, "max depth {}", report.max_depth);
        assert!(mission.state().get(Field::Depth) < 0.1);
        assert_eq!(report.max_depth, sink.deepest);
        assert_eq!((sink.starts, sink.ends), (1, 1));
        assert!(sink.cycles > 0 && sink.cycles < sink.steps);
        assert_eq!(report.seconds, sink.steps as f64);
    }

    #[test]
    fn surface_depth_sets_where_the_run_counts_as_surfaced() {
        let yo = || {
            BehaviorConfig::Yo(YoParams { d_target_depth: 5.0, c_target_depth: 2.0, ..YoParams::default() })
        };
        let mut tight = MissionBuilder::new(config(vec![yo()])).build().unwrap();
        let tight_report = tight.run(&mut NoopSink).unwrap();

        let mut cfg = config(vec![yo()]);
        cfg.flight.surface_depth = 1.5;
        let mut loose = MissionBuilder::new(cfg).build().unwrap();
        assert_eq!(loose.glider().surface_depth(), 1.5);
        assert_eq!(loose.glider().gps.surface_depth(), 1.5);
        let loose_report = loose.run(&mut NoopSink).unwrap();

        assert_eq!(tight_report.reason, EndReason::Completed);
        assert_eq!(loose_report.reason, EndReason::Completed);
        assert!(tight.state().get(Field::Depth) < 0.1);
        let depth = loose.state().get(Field::Depth);
        assert!(depth >= 0.1 && depth < 1.5, "ended at {depth} m");
        assert!(loose_report.seconds < tight_report.seconds);
    }

    #[test]
    fn control_cycles_follow_cpu_cycle() {
        let cfg = MissionConfig { max_days: Some(100.5 / 86_400.0), cpu_cycle: 4.0, ..MissionConfig::default() };
        let mut mission = MissionBuilder::new(cfg).build().unwrap();
        let mut sink = Counting::default();

        let report = mission.run(&mut sink).unwrap();
        assert_eq!(report.reason, EndReason::MaxDuration);
        assert_eq!(sink.steps, 101);
        // steps 0, 4, 8, ..., 100
        assert_eq!(sink.cycles, 26);
    }

    #[test]
    fn crush_depth_is_an_error() {
        let cfg = MissionConfig { crush_depth: 3.0, ..config(vec![dive(100.0)]) };
        let mut mission = MissionBuilder::new(cfg).build().unwrap();
        match mission.run(&mut NoopSink) {
            Err(SimError::DepthExceeded { depth, limit }) => {
                assert_eq!(limit, 3.0);
                assert!(depth > 3.0);
            }
            other => panic!("expected DepthExceeded, got {other:?}"),
        }
    }

    #[test]
    fn grounding_ends_the_run() {
        let cfg = MissionConfig {
            end_on_grounding: 1,
            environment: WaterSample { water_depth: 4.0, ..WaterSample::default() },
            ..config(vec![dive(100.0)])
        };
        let mut mission = MissionBuilder::new(cfg).build().unwrap();
        let report = mission.run(&mut NoopSink).unwrap();
        assert_eq!(report.reason, EndReason::Grounded);
        assert_eq!(report.groundings, 1);
        assert!(mission.state().get(Field::Altitude) <= 0.0);
    }

    #[test]
    fn pickup_starts_the_cycle_timer_at_the_transfer_time() {
        let cfg = MissionConfig {
            mission_start: MissionStart::Pickup,
            data_transfer_time: 120.0,
            max_days: Some(10.0 / 86_400.0),
            ..MissionConfig::default()
        };
        let mut mission = MissionBuilder::new(cfg).build().unwrap();
        assert!(mission.state().flag(Field::Pickup));

        let report = mission.run(&mut NoopSink).unwrap();
        assert_eq!(mission.state().get(Field::TimeSinceCycleStart), 120.0 + report.seconds);
    }

    #[test]
    fn sensor_presets_by_name() {
        let mut mission = MissionBuilder::new(MissionConfig::default()).build().unwrap();
        mission.sensor("u_use_current_correction", 1.0).unwrap();
        assert!(mission.state().flag(Field::UseCurrentCorrection));

        let err = mission.sensor("m_warp_factor", 9.0).unwrap_err();
        assert!(matches!(err, SimError::Core(_)));
    }
}

// ── Configuration and builder ─────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use gs_control::behaviors::SurfaceParams;
    use gs_control::BehaviorConfig;
    use gs_core::Field;

    use super::support::Freshened;
    use crate::{MissionBuilder, MissionConfig, SensorPreset, SimError};

    const MISSION: &str = r#"{
        "name": "yo-test",
        "start_date": "20100519", "start_time": "00:30",
        "lat_ini": 5413.0, "lon_ini": 740.5,
        "hardware": "deep",
        "sensors": [ { "field": "u_use_current_correction", "value": 1 } ],
        "behaviors": [
            { "behavior": "abend", "overdepth": 90 },
            { "behavior": "yo", "num_half_cycles_to_do": 6 }
        ]
    }"#;

    #[test]
    fn json_mission_builds_highest_priority_on_top() {
        let cfg = MissionConfig::from_json(MISSION).unwrap();
        assert_eq!(cfg.name, "yo-test");
        assert_eq!(cfg.dt, 1.0);
        assert_eq!(cfg.store_period, 10.0);

        let mission = MissionBuilder::new(cfg).build().unwrap();
        let names: Vec<_> = mission.control().behaviors().map(|b| b.name()).collect();
        assert_eq!(names, ["Yo", "Abend"]);
        assert!(mission.state().flag(Field::UseCurrentCorrection));
        assert_eq!(mission.state().get(Field::InitDiveTime), 80.0);
        assert_eq!(mission.glider().environment_name(), "constant");
        assert_eq!(mission.glider().hardware.pump.spec().max, 263.0);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = MissionConfig::from_json(r#"{ "behaviors": [ { "behavior": "loiter" } ] }"#).unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn unknown_sensor_field_is_rejected() {
        let cfg = MissionConfig {
            sensors: vec![SensorPreset { field: "m_bogus".to_owned(), value: 1.0 }],
            ..MissionConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(SimError::Core(_))));
        assert!(MissionBuilder::new(cfg).build().is_err());
    }

    #[test]
    fn non_positive_steps_are_rejected() {
        let cfg = MissionConfig { dt: 0.0, ..MissionConfig::default() };
        assert!(matches!(cfg.validate(), Err(SimError::Config(_))));

        let cfg = MissionConfig { max_days: Some(-1.0), ..MissionConfig::default() };
        assert!(matches!(cfg.validate(), Err(SimError::Config(_))));
    }

    #[test]
    fn builder_overrides() {
        let extra = BehaviorConfig::Surface(SurfaceParams::default()).build().unwrap();
        let mission = MissionBuilder::new(MissionConfig::from_json(MISSION).unwrap())
            .environment(Box::new(Freshened))
            .behavior(extra)
            .build()
            .unwrap();
        let names: Vec<_> = mission.control().behaviors().map(|b| b.name()).collect();
        assert_eq!(names, ["Yo", "Abend", "Surface"]);
        assert_eq!(mission.glider().environment_name(), "unnamed");
    }
}
