//! Flight-model parameters.

use serde::{Deserialize, Serialize};

use crate::{FlightError, FlightResult};

/// Hydrodynamic and mass properties of the vehicle plus the empirical pitch
/// and fin fits.
///
/// Field names in serialized form follow the glider-flight literature
/// (`Cd0`, `Vg`, `T1`…).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightParams {
    /// Parasitic drag coefficient.
    #[serde(rename = "Cd0")]
    pub cd0:           f64,
    /// Induced drag coefficient (per rad²).
    #[serde(rename = "Cd1")]
    pub cd1:           f64,
    /// Vehicle mass, kg.
    pub mg:            f64,
    /// Hull volume at atmospheric pressure, m³.
    #[serde(rename = "Vg")]
    pub vg:            f64,
    /// Wing lift-curve slope, per rad.
    pub aw:            f64,
    /// Hull lift-curve slope, per rad.
    pub ah:            f64,
    /// Wing reference area, m².
    #[serde(rename = "S")]
    pub area:          f64,
    /// Hull compressibility, per Pa.
    pub epsilon:       f64,
    /// Added-mass factors along and across the hull axis.
    pub k1:            f64,
    pub k2:            f64,
    /// Shallower than this the vehicle counts as surfaced, m.  Drives the
    /// mission's surface checks, the GPS antenna and the hover timers.
    pub surface_depth: f64,
    /// Pitch fit: `tan θ = T1·Vp + T2·battpos + T3 + T4·P`.
    #[serde(rename = "T1")]
    pub t1:            f64,
    #[serde(rename = "T2")]
    pub t2:            f64,
    #[serde(rename = "T3")]
    pub t3:            f64,
    #[serde(rename = "T4")]
    pub t4:            f64,
    /// Fin response gain and time constant (s).
    pub fin_c0:        f64,
    pub fin_c1:        f64,
    /// Standard deviation of the fin-angle noise, rad.
    pub fin_noise:     f64,
}

impl Default for FlightParams {
    fn default() -> Self {
        Self {
            cd0:           0.15,
            cd1:           10.5,
            mg:            60.0,
            vg:            58.54e-3,
            aw:            3.7,
            ah:            2.4,
            area:          0.1,
            epsilon:       5.0e-10,
            k1:            0.20,
            k2:            0.92,
            surface_depth: 0.1,
            t1:            1235.0,
            t2:            -28.8,
            t3:            0.14,
            t4:            0.0,
            fin_c0:        0.5,
            fin_c1:        15.0,
            fin_noise:     0.01,
        }
    }
}

impl FlightParams {
    /// Reject parameters the integrator cannot work with.
    pub fn validate(&self) -> FlightResult<()> {
        let positive = [
            ("mg", self.mg),
            ("Vg", self.vg),
            ("S", self.area),
            ("fin_c1", self.fin_c1),
            ("surface_depth", self.surface_depth),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(FlightError::InvalidParameter { name, value });
            }
        }
        let non_negative = [
            ("Cd0", self.cd0),
            ("Cd1", self.cd1),
            ("k1", self.k1),
            ("k2", self.k2),
            ("fin_noise", self.fin_noise),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) {
                return Err(FlightError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}
