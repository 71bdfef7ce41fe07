//! `gs-sim` — behavior arbitration, the vehicle aggregate and the mission
//! loop of the glider simulator.
//!
//! # Physics step
//!
//! ```text
//! every dt seconds:
//!   ① Cycle     — once cpu_cycle seconds have accumulated: run the behavior
//!                 stack bottom-up, resolve directives into setpoints.
//!   ② Override  — fin centred at the surface; quit ascent once TO_QUIT.
//!   ③ Command   — setpoints become actuator targets.
//!   ④ Terminate — completed, aborted at the surface, crush depth, maximum
//!                 duration, n-th surfacing, n-th grounding.
//!   ⑤ Update    — GPS, actuators, water, heading/pitch, RK4 step, advection,
//!                 dead reckoning, timers and clocks.
//! ```
//!
//! # Modules
//!
//! | Module          | Contents                                                |
//! |-----------------|---------------------------------------------------------|
//! | [`arbitration`] | `LayeredControl`, `Setpoints`, heading helpers          |
//! | [`glider`]      | `Glider`: hardware + flight model + GPS + water         |
//! | [`config`]      | `MissionConfig` (JSON)                                  |
//! | [`builder`]     | `MissionBuilder`                                        |
//! | [`mission`]     | `Mission::run`, `MissionReport`, `EndReason`            |
//! | [`observer`]    | `TelemetrySink`, `NoopSink`                             |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use gs_sim::{MissionBuilder, MissionConfig, NoopSink};
//!
//! let config = MissionConfig::from_json(&std::fs::read_to_string("yo.json")?)?;
//! let mut mission = MissionBuilder::new(config).build()?;
//! let report = mission.run(&mut NoopSink)?;
//! println!("{report}");
//! ```

pub mod arbitration;
pub mod builder;
pub mod config;
pub mod error;
pub mod glider;
pub mod mission;
pub mod observer;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use arbitration::{aim_at, wrap_angle, LayeredControl, Setpoints};
pub use builder::MissionBuilder;
pub use config::{MissionConfig, MissionStart, SensorPreset};
pub use error::{SimError, SimResult};
pub use glider::Glider;
pub use mission::{EndReason, Mission, MissionReport, RunSettings};
pub use observer::{NoopSink, TelemetrySink};
