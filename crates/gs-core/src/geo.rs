//! Geographic positions, NMEA conversion and local mission coordinates.
//!
//! Flight computers report positions as NMEA `DDMM.mmmm` numbers; everything
//! geometric in the simulator works in decimal degrees or in a local
//! Cartesian frame (LMC, metres east/north of an origin).

/// Mean Earth radius, metres.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Convert an NMEA `DDMM.mmmm` value to decimal degrees.
pub fn nmea_to_decimal(nmea: f64) -> f64 {
    let magnitude = nmea.abs();
    let degrees = (magnitude / 100.0).trunc();
    let minutes = magnitude - degrees * 100.0;
    (degrees + minutes / 60.0).copysign(nmea)
}

/// Convert decimal degrees to an NMEA `DDMM.mmmm` value.
pub fn decimal_to_nmea(decimal: f64) -> f64 {
    let magnitude = decimal.abs();
    let degrees = magnitude.trunc();
    let minutes = (magnitude - degrees) * 60.0;
    (degrees * 100.0 + minutes).copysign(decimal)
}

// ── GeoPoint ──────────────────────────────────────────────────────────────────

/// A WGS-84 coordinate in decimal degrees.
///
/// Double precision: dead reckoning accumulates sub-metre steps for days.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Build from NMEA latitude/longitude.
    pub fn from_nmea(lat: f64, lon: f64) -> Self {
        Self::new(nmea_to_decimal(lat), nmea_to_decimal(lon))
    }

    /// `(lat, lon)` in NMEA notation.
    pub fn to_nmea(self) -> (f64, f64) {
        (decimal_to_nmea(self.lat), decimal_to_nmea(self.lon))
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

// ── LocalFrame ────────────────────────────────────────────────────────────────

/// Local mission coordinates: an equirectangular tangent plane centred on
/// `origin`, x pointing east and y north, in metres.
///
/// Accurate to well under a metre over the tens of kilometres a glider
/// covers between origin resets.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LocalFrame {
    origin:  GeoPoint,
    cos_lat: f64,
}

impl LocalFrame {
    pub fn new(origin: GeoPoint) -> Self {
        Self {
            origin,
            cos_lat: origin.lat.to_radians().cos(),
        }
    }

    #[inline]
    pub fn origin(&self) -> GeoPoint {
        self.origin
    }

    /// Project a position into the frame: `(east, north)` metres.
    pub fn to_local(&self, p: GeoPoint) -> (f64, f64) {
        let x = (p.lon - self.origin.lon).to_radians() * EARTH_RADIUS_M * self.cos_lat;
        let y = (p.lat - self.origin.lat).to_radians() * EARTH_RADIUS_M;
        (x, y)
    }

    /// Inverse of [`to_local`][Self::to_local].
    pub fn to_geo(&self, x: f64, y: f64) -> GeoPoint {
        let lat = self.origin.lat + (y / EARTH_RADIUS_M).to_degrees();
        let lon = self.origin.lon + (x / (EARTH_RADIUS_M * self.cos_lat)).to_degrees();
        GeoPoint::new(lat, lon)
    }
}
