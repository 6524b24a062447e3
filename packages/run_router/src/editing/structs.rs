//! Wire-level point type shared by the editing operations.

use geo::Point;
use serde::{Deserialize, Serialize};

/// One vertex of a user-edited polyline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TracePoint {
    pub lat: f64,
    pub lon: f64,
}

impl From<TracePoint> for Point {
    fn from(point: TracePoint) -> Point {
        Point::new(point.lon, point.lat)
    }
}
