//! Local planar projection: a constant-scale equirectangular mapping from
//! geographic coordinates to metre offsets around a reference point.
//!
//! Valid for city-scale extents of a few kilometres; the error grows with
//! distance from the reference. This is an accepted approximation, not a
//! geodesic projection.

/// Metres per degree of latitude
pub const METRES_PER_DEGREE: f64 = 111_320.0;

/// A flat (x, y) frame centred on a reference coordinate. Longitude scale
/// shrinks with the cosine of the reference latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFrame {
    lat0: f64,
    lon0: f64,
    k_lat: f64,
    k_lon: f64,
}

impl LocalFrame {
    pub fn new(lat0: f64, lon0: f64) -> LocalFrame {
        LocalFrame {
            lat0,
            lon0,
            k_lat: METRES_PER_DEGREE,
            k_lon: METRES_PER_DEGREE * lat0.to_radians().cos(),
        }
    }

    /// Geographic coordinate to metre offsets from the reference
    pub fn to_local(&self, lat: f64, lon: f64) -> (f64, f64) {
        let x = (lon - self.lon0) * self.k_lon;
        let y = (lat - self.lat0) * self.k_lat;
        (x, y)
    }

    /// Metre offsets back to a geographic coordinate
    pub fn to_geographic(&self, x: f64, y: f64) -> (f64, f64) {
        let lat = y / self.k_lat + self.lat0;
        let lon = x / self.k_lon + self.lon0;
        (lat, lon)
    }
}
