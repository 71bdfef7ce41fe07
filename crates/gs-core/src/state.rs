//! `GliderState` — the shared record every component reads and writes.

use std::ops::{Index, IndexMut};

use crate::geo::{GeoPoint, LocalFrame};
use crate::{CoreResult, Field};

/// Enum-indexed values of every [`Field`], plus the origin of the local
/// mission coordinate frame.
///
/// Exactly one mission run owns a `GliderState`; the driver loop lends it
/// mutably to one component at a time.
#[derive(Clone, Debug)]
pub struct GliderState {
    values: [f64; Field::COUNT],
    origin: GeoPoint,
}

impl GliderState {
    /// Seed every field with its initial value and place the vehicle at
    /// `start` at epoch time `start_time` (seconds).
    ///
    /// The LMC origin starts at `start`.
    pub fn new(start_time: f64, start: GeoPoint) -> Self {
        let mut values = [0.0; Field::COUNT];
        for &field in Field::ALL {
            values[field.index()] = field.initial_value();
        }
        let mut state = Self { values, origin: start };
        let (lat, lon) = start.to_nmea();
        state.set(Field::Lat, lat);
        state.set(Field::Lon, lon);
        state.set(Field::PresentTime, start_time);
        state.set(Field::MissionStartTime, start_time);
        state
    }

    #[inline]
    pub fn get(&self, field: Field) -> f64 {
        self.values[field.index()]
    }

    #[inline]
    pub fn set(&mut self, field: Field, value: f64) {
        self.values[field.index()] = value;
    }

    #[inline]
    pub fn add(&mut self, field: Field, delta: f64) {
        self.values[field.index()] += delta;
    }

    /// `true` when the field holds a non-zero value.
    #[inline]
    pub fn flag(&self, field: Field) -> bool {
        self.get(field) != 0.0
    }

    /// Current mission time, epoch seconds.
    #[inline]
    pub fn time(&self) -> f64 {
        self.get(Field::PresentTime)
    }

    /// Set a field by its flight-computer name (sensor presets).
    pub fn set_by_name(&mut self, name: &str, value: f64) -> CoreResult<()> {
        let field: Field = name.parse()?;
        self.set(field, value);
        Ok(())
    }

    /// Zero the three idle timers.
    pub fn reset_idle_timers(&mut self) {
        self.set(Field::HoverFor, 0.0);
        self.set(Field::StalledFor, 0.0);
        self.set(Field::SamedepthFor, 0.0);
    }

    // ── Local mission coordinates ─────────────────────────────────────────

    #[inline]
    pub fn origin(&self) -> GeoPoint {
        self.origin
    }

    /// The LMC frame centred on the current origin.
    pub fn frame(&self) -> LocalFrame {
        LocalFrame::new(self.origin)
    }

    /// Dead-reckoned position (`m_lat`/`m_lon`).
    pub fn position(&self) -> GeoPoint {
        GeoPoint::from_nmea(self.get(Field::Lat), self.get(Field::Lon))
    }

    /// Move the LMC origin to the current dead-reckoned position; the vehicle
    /// is then at `(0, 0)`.
    pub fn reset_origin(&mut self) {
        self.origin = self.position();
        self.set(Field::LmcX, 0.0);
        self.set(Field::LmcY, 0.0);
    }

    // ── Telemetry ─────────────────────────────────────────────────────────

    /// Raw values in [`Field::ALL`] order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// `(field, value)` pairs for every field.
    pub fn snapshot(&self) -> impl Iterator<Item = (Field, f64)> + '_ {
        Field::ALL.iter().map(move |&f| (f, self.get(f)))
    }
}

impl Index<Field> for GliderState {
    type Output = f64;

    #[inline]
    fn index(&self, field: Field) -> &f64 {
        &self.values[field.index()]
    }
}

impl IndexMut<Field> for GliderState {
    #[inline]
    fn index_mut(&mut self, field: Field) -> &mut f64 {
        &mut self.values[field.index()]
    }
}
