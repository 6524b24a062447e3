//! Structs which represent the loop request as selected by the end user,
//! plus the tunable policy constants used by the search and the snapping
//! geometry. The constant values are empirically chosen; they live here as
//! named fields rather than being scattered through the algorithms.

use serde::Deserialize;

use crate::common::errors::RouteError;
use crate::common::graph_data::RoadType;

fn default_min_km() -> f64 {
    7.0
}

fn default_max_km() -> f64 {
    9.0
}

fn default_max_elevation() -> f64 {
    150.0
}

fn default_start_node() -> String {
    "home".to_string()
}

/// Stores the user's requested loop configuration exactly as it is received
/// from the API
#[derive(Deserialize, Debug, PartialEq)]
pub struct UserLoopQuery {
    #[serde(default = "default_min_km")]
    pub distance_min_km: f64,
    #[serde(default = "default_max_km")]
    pub distance_max_km: f64,
    #[serde(default = "default_max_elevation")]
    pub max_elevation_m: f64,
    #[serde(default = "default_start_node")]
    pub start_node_id: String,
    pub start_lat: Option<f64>,
    pub start_lon: Option<f64>,
}

/// Distance and elevation constraints for a single loop search, in metres.
/// Built from a UserLoopQuery via `LoopConstraints::try_from`.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopConstraints {
    pub d_min_m: f64,
    pub d_max_m: f64,
    pub elev_limit_m: f64,
    /// Ideal loop length the scoring steers towards.
    pub target_m: f64,
}

impl TryFrom<&UserLoopQuery> for LoopConstraints {
    type Error = RouteError;

    fn try_from(query: &UserLoopQuery) -> Result<LoopConstraints, RouteError> {
        if query.distance_min_km <= 0.0 || query.distance_max_km <= 0.0 {
            return Err(RouteError::InvalidInput(
                "distances must be positive".to_string(),
            ));
        }
        if query.distance_min_km > query.distance_max_km {
            return Err(RouteError::InvalidInput(
                "distance_min_km must be <= distance_max_km".to_string(),
            ));
        }
        if query.max_elevation_m < 0.0 {
            return Err(RouteError::InvalidInput(
                "max_elevation_m must be >= 0".to_string(),
            ));
        }

        let d_max_m = query.distance_max_km * 1000.0;

        Ok(LoopConstraints {
            d_min_m: query.distance_min_km * 1000.0,
            d_max_m,
            elev_limit_m: query.max_elevation_m,
            target_m: 0.9 * d_max_m,
        })
    }
}

/// Weights used when scoring an edge for route quality. These never feed
/// the shortest-path reachability checks, which run on raw distance.
#[derive(Debug, Clone, PartialEq)]
pub struct CostParams {
    pub main_road_multiplier: f64,
    pub residential_multiplier: f64,
    pub path_multiplier: f64,
    /// Scoring cost per metre of elevation gain.
    pub climb_weight: f64,
}

impl Default for CostParams {
    fn default() -> CostParams {
        CostParams {
            main_road_multiplier: 0.9,
            residential_multiplier: 1.0,
            path_multiplier: 1.05,
            climb_weight: 3.0,
        }
    }
}

impl CostParams {
    pub fn multiplier(&self, road_type: RoadType) -> f64 {
        match road_type {
            RoadType::MainRoad => self.main_road_multiplier,
            RoadType::Residential => self.residential_multiplier,
            RoadType::Path => self.path_multiplier,
        }
    }
}

/// Policy constants for the loop search heuristic. The candidate cap trades
/// solution quality for a bound on worst-case work per request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    /// Maximum number of turnaround candidates tried per search.
    pub max_candidates: usize,
    /// A node qualifies as a candidate once its forward distance reaches
    /// this fraction of the minimum loop distance.
    pub min_turnaround_frac: f64,
    /// Distance multiplier applied on the return leg to edges already used
    /// on the way out.
    pub backtrack_penalty: f64,
    /// Weight on the squared deviation from the target distance.
    pub deviation_weight: f64,
    /// Flat score penalty per repeated traversal of a segment.
    pub reuse_penalty: f64,
}

impl Default for SearchParams {
    fn default() -> SearchParams {
        SearchParams {
            max_candidates: 40,
            min_turnaround_frac: 0.4,
            backtrack_penalty: 4.0,
            deviation_weight: 5.0,
            reuse_penalty: 300.0,
        }
    }
}

/// Thresholds for polyline densification and snapping.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapParams {
    /// Maximum spacing between densified points, metres.
    pub max_step_m: f64,
    /// Points further than this from every segment are left untouched.
    pub max_snap_dist_m: f64,
}

impl Default for SnapParams {
    fn default() -> SnapParams {
        SnapParams {
            max_step_m: 25.0,
            max_snap_dist_m: 60.0,
        }
    }
}

/// Everything the loop search needs beyond the graph itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoopConfig {
    pub constraints: LoopConstraints,
    pub search: SearchParams,
    pub cost: CostParams,
}

impl Default for LoopConstraints {
    fn default() -> LoopConstraints {
        LoopConstraints {
            d_min_m: 7000.0,
            d_max_m: 9000.0,
            elev_limit_m: 150.0,
            target_m: 8100.0,
        }
    }
}

impl LoopConfig {
    pub fn with_constraints(constraints: LoopConstraints) -> LoopConfig {
        LoopConfig {
            constraints,
            search: SearchParams::default(),
            cost: CostParams::default(),
        }
    }
}
