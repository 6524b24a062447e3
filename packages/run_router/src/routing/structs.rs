//! Result container produced by the loop search.

use serde::Serialize;

/// A closed walk over the street graph together with its authoritative
/// aggregates. The node sequence starts and ends on the same id; distance,
/// gain and score are recomputed from the adjacency list rather than taken
/// from the search's internal bookkeeping.
#[derive(Debug, Clone, Serialize)]
pub struct RouteResult {
    pub nodes: Vec<String>,
    pub distance_m: f64,
    pub elevation_gain_m: f64,
    /// Effective score including the distance deviation and reuse
    /// penalties. Lower is better.
    pub score: f64,
}
