//! `gs-hardware` — the glider's physical control hardware.
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`actuator`] | `LinearActuator` — rate-limited, dead-banded, bounded motor |
//! | [`pid`]      | `Pid` feedback controller and its `PidGains`                |
//! | [`gps`]      | `Gps` fix-status model                                      |
//! | [`preset`]   | `HardwarePreset`, `HardwareSpec`, the assembled `Hardware`  |
//!
//! Nothing here reads or writes [`GliderState`][gs_core::GliderState]
//! directly; the `gs-sim` glider aggregate moves values between the state
//! and the hardware once per physics step.

pub mod actuator;
pub mod gps;
pub mod pid;
pub mod preset;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use actuator::{ActuatorSpec, LinearActuator};
pub use gps::Gps;
pub use pid::{Pid, PidGains};
pub use preset::{Hardware, HardwarePreset, HardwareSpec};
