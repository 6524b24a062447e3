//! Defines a struct to represent a bounding box, which is used to bound the
//! area of map data requested from the graph provider around a centre point.

use geo::Point;
use geo::{Destination, Haversine};
use serde::Serialize;

/// A bounding box for geographical data. Contains the minimum and maximum
/// latitudes & longitudes, defining a 'rectangle' on the surface of the Earth
#[derive(Debug, Serialize, PartialEq)]
pub struct BBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BBox {
    /// Create a new bounding box based on the north-east and south-west points
    /// of a 'rectangle'
    pub fn from_points(ne: &Point, sw: &Point) -> Self {
        let max_lat = ne.y();
        let min_lat = sw.y();
        let max_lon = ne.x();
        let min_lon = sw.x();

        BBox {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    /// Generate a bounding box which fully contains a circle of the given
    /// radius around the centre point
    pub fn around(centre: Point, radius_m: f64) -> Self {
        let dist_to_corner = radius_m * 2.0_f64.sqrt();

        let ne = Haversine::destination(centre, 45.0, dist_to_corner);
        let sw = Haversine::destination(centre, 225.0, dist_to_corner);

        BBox::from_points(&ne, &sw)
    }
}
