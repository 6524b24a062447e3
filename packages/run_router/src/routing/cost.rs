//! Edge scoring for route quality. This cost only ranks candidate loops;
//! shortest-path reachability always runs on raw distance.

use crate::common::config::CostParams;
use crate::common::graph_data::EdgeData;

/// Scoring weight of a single directed edge: distance adjusted by the road
/// type multiplier, plus a charge per metre climbed.
pub fn edge_cost(edge: &EdgeData, params: &CostParams) -> f64 {
    let base = edge.distance * params.multiplier(edge.road_type);
    base + params.climb_weight * edge.elevation_gain.max(0.0)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::common::graph_data::RoadType;

    fn edge(road_type: RoadType, distance: f64, gain: f64) -> EdgeData {
        EdgeData {
            src: "a".to_string(),
            dst: "b".to_string(),
            distance,
            road_type,
            elevation_gain: gain,
        }
    }

    /// Main roads are slightly preferred, paths slightly discouraged
    #[test]
    fn test_road_type_multipliers() {
        let params = CostParams::default();

        let main = edge_cost(&edge(RoadType::MainRoad, 100.0, 0.0), &params);
        let resi = edge_cost(&edge(RoadType::Residential, 100.0, 0.0), &params);
        let path = edge_cost(&edge(RoadType::Path, 100.0, 0.0), &params);

        assert_abs_diff_eq!(main, 90.0);
        assert_abs_diff_eq!(resi, 100.0);
        assert_abs_diff_eq!(path, 105.0);
    }

    /// Climbing is charged on top of the adjusted distance
    #[test]
    fn test_elevation_charge() {
        let params = CostParams::default();

        let result = edge_cost(&edge(RoadType::Path, 100.0, 10.0), &params);

        assert_abs_diff_eq!(result, 105.0 + 30.0);
    }
}
