//! `gs-flight` — physical response of the glider.
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`model`]       | `FlightModel` RK4 integrator, `Kinematics`, `StepInput`   |
//! | [`pitch`]       | `PitchModel` — pitch from battery, pump and pressure      |
//! | [`fin`]         | `FinModel` — heading rate from fin deflection             |
//! | [`environment`] | `EnvironmentProvider` trait, `WaterSample`, `ConstantWater` |
//! | [`params`]      | `FlightParams` with the default vehicle                   |
//! | [`error`]       | `FlightError`, `FlightResult<T>`                          |
//!
//! # Design notes
//!
//! The integrator works in the vertical plane along the current heading:
//! horizontal speed and vertical speed are the state, pitch, density,
//! pumped volume and heading are inputs held constant over the step.  The
//! horizontal displacement is then split into east and north by heading.
//!
//! Coordinates are local mission coordinates with `z` up and `0` at the
//! surface.  `step_integrate` never returns `z > 0`.

pub mod environment;
pub mod error;
pub mod fin;
pub mod model;
pub mod params;
pub mod pitch;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use environment::{ConstantWater, EnvironmentProvider, WaterSample};
pub use error::{FlightError, FlightResult};
pub use fin::FinModel;
pub use model::{FlightModel, Kinematics, StepInput, GRAVITY};
pub use params::FlightParams;
pub use pitch::PitchModel;
