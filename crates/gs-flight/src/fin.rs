//! Heading-rate response to the fin.

use gs_core::StreamRng;
use rand::Rng;
use rand_distr::Normal;

use crate::{FlightError, FlightResult};

/// First-order heading-rate model driven by fin deflection and speed,
/// stepped with the trapezoidal rule:
///
/// `ṙ = c0/c1 · sin(fin)·speed² − r/c1`
///
/// Each evaluation perturbs the fin angle with Gaussian noise.
#[derive(Clone, Debug)]
pub struct FinModel {
    c0:    f64,
    c1:    f64,
    noise: Normal<f64>,
    rng:   StreamRng,
}

impl FinModel {
    pub fn new(c0: f64, c1: f64, sigma: f64, rng: StreamRng) -> FlightResult<Self> {
        let noise = Normal::new(0.0, sigma)
            .map_err(|_| FlightError::InvalidParameter { name: "fin_noise", value: sigma })?;
        Ok(Self { c0, c1, noise, rng })
    }

    /// Heading rate after `dt` seconds, starting from `rate`.
    pub fn heading_rate(&mut self, dt: f64, fin: f64, speed: f64, rate: f64) -> f64 {
        let fin = fin + self.rng.inner().sample(self.noise);
        let half = dt / 2.0 / self.c1;
        let forced = self.c0 / self.c1 * fin.sin() * speed * speed * dt;
        (forced + rate * (1.0 - half)) / (1.0 + half)
    }
}
