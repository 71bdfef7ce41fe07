//! Empirical pitch response to battery position, pumped volume and pressure.

use crate::FlightParams;

/// Battery travel per inch, m.
const INCH: f64 = 2.56e-2;

/// Linear fit of `tan(pitch)`:
///
/// `tan θ = T1·Vp + T2·battpos + T3 + T4·P`
///
/// with `Vp` in m³, `battpos` in m and `P` in kbar.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PitchModel {
    pub t1: f64,
    pub t2: f64,
    pub t3: f64,
    pub t4: f64,
}

impl PitchModel {
    pub fn from_params(params: &FlightParams) -> Self {
        Self { t1: params.t1, t2: params.t2, t3: params.t3, t4: params.t4 }
    }

    pub fn pitch(&self, battpos_inch: f64, ballast_cc: f64, pressure_bar: f64) -> f64 {
        let battpos = battpos_inch * INCH;
        let vp = ballast_cc * 1e-6;
        let p = pressure_bar * 1e-3;
        (self.t1 * vp + self.t2 * battpos + self.t3 + self.t4 * p).atan()
    }
}
