//! `gs-core` — foundational types for the glidersim control simulator.
//!
//! Every other `gs-*` crate depends on this one.  It has no `gs-*`
//! dependencies of its own.
//!
//! # What lives here
//!
//! | Module     | Contents                                                      |
//! |------------|---------------------------------------------------------------|
//! | [`field`]  | `Field` — the closed vocabulary of mission-state variables    |
//! | [`state`]  | `GliderState` — enum-indexed record of every field            |
//! | [`status`] | `MissionStatus` bitmask                                       |
//! | [`geo`]    | `GeoPoint`, NMEA conversion, `LocalFrame` (LMC projection)    |
//! | [`time`]   | Epoch/UTC helpers, elapsed-time formatting                    |
//! | [`rng`]    | `StreamRng` — per-component deterministic RNG                 |
//! | [`error`]  | `CoreError`, `CoreResult`                                     |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to `GeoPoint` and `MissionStatus`. |

pub mod error;
pub mod field;
pub mod geo;
pub mod rng;
pub mod state;
pub mod status;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use field::Field;
pub use geo::{GeoPoint, LocalFrame};
pub use rng::{RngStream, StreamRng};
pub use state::GliderState;
pub use status::MissionStatus;
