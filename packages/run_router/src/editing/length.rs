//! Standalone polyline length: great-circle distance summed over the
//! vertices of an edited route. Does not touch the graph.

use geo::{Distance, Haversine, Point};

use crate::common::errors::RouteError;
use crate::editing::structs::TracePoint;

/// Total haversine length of a polyline in kilometres. At least two
/// points are required.
pub fn polyline_length_km(points: &[TracePoint]) -> Result<f64, RouteError> {
    if points.len() < 2 {
        return Err(RouteError::InvalidInput(
            "a polyline needs at least 2 points".to_string(),
        ));
    }

    let total_m: f64 = points
        .windows(2)
        .map(|pair| {
            Haversine::distance(Point::from(pair[0]), Point::from(pair[1]))
        })
        .sum();

    Ok(total_m / 1000.0)
}
