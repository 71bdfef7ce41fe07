//! Fluent builder for constructing a [`Mission`].

use gs_control::{BehaviorConfig, ControlBehavior};
use gs_core::{Field, GliderState, MissionStatus};
use gs_flight::{ConstantWater, EnvironmentProvider, FlightModel};
use gs_hardware::{Gps, Hardware, HardwareSpec};
use log::info;

use crate::mission::RunSettings;
use crate::{Glider, LayeredControl, Mission, MissionConfig, MissionStart, SimResult};

/// Fluent builder for [`Mission`].
///
/// # Required inputs
///
/// - [`MissionConfig`]: start time and place, step sizes, hardware preset,
///   flight parameters, behavior list.
///
/// # Optional inputs (have defaults)
///
/// | Method               | Default                                    |
/// |----------------------|--------------------------------------------|
/// | `.environment(p)`    | `ConstantWater(config.environment)`        |
/// | `.hardware_spec(s)`  | The spec of `config.hardware`              |
/// | `.behavior(b)`       | None; pushed above the configured behaviors |
///
/// # Example
///
/// ```rust,ignore
/// let config = MissionConfig::from_json(&text)?;
/// let mut mission = MissionBuilder::new(config)
///     .environment(Box::new(my_ocean_model))
///     .build()?;
/// let report = mission.run(&mut NoopSink)?;
/// ```
pub struct MissionBuilder {
    config:      MissionConfig,
    environment: Option<Box<dyn EnvironmentProvider>>,
    hardware:    Option<HardwareSpec>,
    extra:       Vec<Box<dyn ControlBehavior>>,
}

impl MissionBuilder {
    pub fn new(config: MissionConfig) -> Self {
        Self {
            config,
            environment: None,
            hardware:    None,
            extra:       Vec::new(),
        }
    }

    /// Water properties from `provider` instead of the configured constant
    /// sample.
    pub fn environment(mut self, provider: Box<dyn EnvironmentProvider>) -> Self {
        self.environment = Some(provider);
        self
    }

    /// Custom actuator and controller settings instead of the named preset.
    pub fn hardware_spec(mut self, spec: HardwareSpec) -> Self {
        self.hardware = Some(spec);
        self
    }

    /// An already-constructed behavior.  Each call pushes above everything
    /// configured so far.
    pub fn behavior(mut self, behavior: Box<dyn ControlBehavior>) -> Self {
        self.extra.push(behavior);
        self
    }

    /// Validate the configuration, seed the state and assemble a ready-to-run
    /// [`Mission`].
    pub fn build(self) -> SimResult<Mission> {
        let config = self.config;
        config.validate()?;

        // ── State ─────────────────────────────────────────────────────────
        let start = config.start_position();
        let mut state = GliderState::new(config.start_epoch()?, start);
        state.set(Field::InitDiveTime, config.init_dive_time);
        if config.mission_start == MissionStart::Pickup {
            state.set(Field::Pickup, 1.0);
        }
        for preset in &config.sensors {
            state.set_by_name(&preset.field, preset.value)?;
        }

        // ── Vehicle ───────────────────────────────────────────────────────
        let hardware = match self.hardware {
            Some(spec) => Hardware::new(spec, config.seed),
            None => Hardware::preset(config.hardware, config.seed),
        };
        let flight = FlightModel::new(config.flight, config.dt, config.seed)?;
        let environment = self
            .environment
            .unwrap_or_else(|| Box::new(ConstantWater(config.environment)));
        let gps = Gps::new(config.gps_acquire_time).with_surface_depth(config.flight.surface_depth);
        let glider = Glider::new(hardware, flight, gps, environment, start);

        // ── Behavior stack ────────────────────────────────────────────────
        let mut control = LayeredControl::new();
        for spec in config.behaviors.iter().rev() {
            let spec = match spec.clone() {
                BehaviorConfig::Surface(mut p) => {
                    p.datatransfertime = config.data_transfer_time;
                    BehaviorConfig::Surface(p)
                }
                other => other,
            };
            control.push(spec.build()?)?;
        }
        for behavior in self.extra {
            control.push(behavior)?;
        }

        info!(
            "built mission `{}`: {} behavior(s), {} hardware, dt {} s, cycle {} s",
            config.name,
            control.len(),
            config.hardware,
            config.dt,
            config.cpu_cycle,
        );

        Ok(Mission {
            settings: RunSettings {
                dt:                 config.dt,
                cpu_cycle:          config.cpu_cycle,
                max_days:           config.max_days,
                end_on_surfacing:   config.end_on_surfacing,
                end_on_grounding:   config.end_on_grounding,
                crush_depth:        config.crush_depth,
                data_transfer_time: config.data_transfer_time,
            },
            state,
            status: MissionStatus::empty(),
            control,
            glider,
        })
    }
}
