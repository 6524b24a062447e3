//! The constrained loop search: pick turnaround candidates from a single
//! forward shortest-path run, route back with the outbound segments
//! penalised, and keep the best-scoring loop that satisfies the distance
//! and climb constraints.
//!
//! This is a two-shortest-path heuristic, not an exact search. It can miss
//! feasible loops outside the candidate cap, and it can reject loops whose
//! only way home reuses early segments.

use petgraph::graph::NodeIndex;
use rustc_hash::FxHashSet;

use crate::common::config::LoopConfig;
use crate::common::errors::RouteError;
use crate::loading::graph::RouteGraph;
use crate::routing::cost::edge_cost;
use crate::routing::dijkstra::{
    EdgePenalties, shortest_paths, undirected_key,
};
use crate::routing::structs::RouteResult;

/// Aggregates recomputed by walking a loop against the adjacency list
struct LoopTotals {
    distance_m: f64,
    elevation_gain_m: f64,
    cost: f64,
}

/// Sum the edges matching each consecutive pair of the walk. This is the
/// authoritative accounting; the penalty-skewed distances inside the two
/// Dijkstra runs never leak into reported totals. A pair without a
/// matching edge is skipped, which cannot occur on a well-formed graph.
fn walk_totals(
    graph: &RouteGraph,
    nodes: &[NodeIndex],
    config: &LoopConfig,
) -> LoopTotals {
    let mut totals = LoopTotals {
        distance_m: 0.0,
        elevation_gain_m: 0.0,
        cost: 0.0,
    };

    for pair in nodes.windows(2) {
        let Some(edge) = graph.edge_between(pair[0], pair[1]) else {
            continue;
        };

        totals.distance_m += edge.distance;
        totals.elevation_gain_m += edge.elevation_gain.max(0.0);
        totals.cost += edge_cost(edge, &config.cost);
    }

    totals
}

/// Count how many times the walk re-traverses a segment it has already
/// used, in either direction. An out-and-back spur counts once per
/// repetition beyond the first.
fn count_edge_reuse(nodes: &[NodeIndex]) -> usize {
    let mut seen = FxHashSet::<(NodeIndex, NodeIndex)>::default();
    let mut reuse = 0;

    for pair in nodes.windows(2) {
        let key = undirected_key(pair[0], pair[1]);
        if !seen.insert(key) {
            reuse += 1;
        }
    }

    reuse
}

/// Search for the best closed walk from `start` subject to the configured
/// distance and elevation constraints. Finding nothing is a normal
/// outcome, reported as Ok(None).
pub fn find_best_loop(
    graph: &RouteGraph,
    start: &str,
    config: &LoopConfig,
) -> Result<Option<RouteResult>, RouteError> {
    let start_inx = graph
        .index_of(start)
        .ok_or_else(|| RouteError::UnknownStart(start.to_string()))?;

    let constraints = &config.constraints;
    let search = &config.search;

    // One forward run supplies distances for every candidate
    let forward = shortest_paths(graph, start_inx, constraints.d_max_m, None);

    let min_turnaround = search.min_turnaround_frac * constraints.d_min_m;
    let mut candidates: Vec<(f64, NodeIndex)> = forward
        .reached()
        .filter(|(_, d)| *d >= min_turnaround && *d <= constraints.target_m)
        .map(|(node, d)| (d, node))
        .collect();

    if candidates.is_empty() {
        return Ok(None);
    }

    // Farthest first: distant turnarounds are likelier to stretch the
    // loop out to the target distance
    candidates.sort_unstable_by(|a, b| {
        b.0.total_cmp(&a.0).then_with(|| b.1.cmp(&a.1))
    });
    candidates.truncate(search.max_candidates);

    let mut best: Option<(f64, Vec<NodeIndex>, LoopTotals)> = None;

    for (dist_to_v, v) in candidates {
        let Some(path_fw) = forward.path_to(v) else {
            continue;
        };
        if path_fw.len() < 2 {
            continue;
        }

        // Discourage the way back from retracing the outbound streets
        let mut penalties = EdgePenalties::default();
        for pair in path_fw.windows(2) {
            penalties.insert(
                undirected_key(pair[0], pair[1]),
                search.backtrack_penalty,
            );
        }

        let remaining_budget = constraints.d_max_m - dist_to_v;
        if remaining_budget <= 0.0 {
            continue;
        }

        let backward =
            shortest_paths(graph, v, remaining_budget, Some(&penalties));
        let Some(path_back) = backward.path_to(start_inx) else {
            continue;
        };
        if path_back.len() < 2 {
            continue;
        }

        // start -> v -> start, without duplicating the turnaround node
        let mut loop_nodes = path_fw;
        loop_nodes.extend_from_slice(&path_back[1..]);

        let totals = walk_totals(graph, &loop_nodes, config);

        if totals.distance_m < constraints.d_min_m
            || totals.distance_m > constraints.d_max_m
        {
            continue;
        }
        if totals.elevation_gain_m > constraints.elev_limit_m {
            continue;
        }

        let reuse = count_edge_reuse(&loop_nodes);
        let deviation = totals.distance_m - constraints.target_m;
        let score = totals.cost
            + search.deviation_weight * deviation.powi(2)
            + search.reuse_penalty * reuse as f64;

        let improves = match &best {
            Some((best_score, _, _)) => score < *best_score,
            None => true,
        };
        if improves {
            best = Some((score, loop_nodes, totals));
        }
    }

    Ok(best.map(|(score, loop_nodes, totals)| RouteResult {
        nodes: loop_nodes
            .iter()
            .map(|inx| {
                graph
                    .node(*inx)
                    .expect("loop nodes come from this graph")
                    .id
                    .clone()
            })
            .collect(),
        distance_m: totals.distance_m,
        elevation_gain_m: totals.elevation_gain_m,
        score,
    }))
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rustc_hash::FxHashSet;

    use super::*;
    use crate::common::config::LoopConstraints;
    use crate::loading::postgres::{EdgeRow, NodeRow};

    fn residential(src: i64, dst: i64, distance: f64) -> EdgeRow {
        EdgeRow {
            src,
            dst,
            distance,
            highway: "residential".to_string(),
        }
    }

    /// Four nodes on a 100m square, home in one corner
    fn square_graph(corner_elevation: f64) -> RouteGraph {
        let nodes = vec![
            NodeRow { id: 1, lat: 0.0, lon: 0.0, elevation: 0.0 },
            NodeRow { id: 2, lat: 0.0009, lon: 0.0, elevation: 0.0 },
            NodeRow {
                id: 3,
                lat: 0.0009,
                lon: 0.0009,
                elevation: corner_elevation,
            },
            NodeRow { id: 4, lat: 0.0, lon: 0.0009, elevation: 0.0 },
        ];
        let edges = vec![
            residential(1, 2, 100.0),
            residential(2, 3, 100.0),
            residential(3, 4, 100.0),
            residential(4, 1, 100.0),
        ];

        RouteGraph::from_rows(nodes, edges, 0.0, 0.0)
            .expect("graph should build")
    }

    fn config(
        d_min_m: f64,
        d_max_m: f64,
        elev_limit_m: f64,
        target_m: f64,
    ) -> LoopConfig {
        LoopConfig::with_constraints(LoopConstraints {
            d_min_m,
            d_max_m,
            elev_limit_m,
            target_m,
        })
    }

    /// The square admits exactly one sensible loop: all four corners,
    /// 400m, no climbing
    #[test]
    fn test_square_loop_found() {
        let graph = square_graph(0.0);
        let config = config(300.0, 500.0, 1000.0, 400.0);

        let result = find_best_loop(&graph, "home", &config)
            .expect("search should run")
            .expect("a loop should be found");

        assert_eq!(result.nodes.len(), 5);
        assert_eq!(result.nodes.first(), result.nodes.last());
        assert_eq!(result.nodes[0], "home");

        let distinct: FxHashSet<&String> = result.nodes.iter().collect();
        assert_eq!(distinct.len(), 4);

        assert_abs_diff_eq!(result.distance_m, 400.0);
        assert_abs_diff_eq!(result.elevation_gain_m, 0.0);
        // 4 residential edges at multiplier 1.0, zero deviation, no reuse
        assert_abs_diff_eq!(result.score, 400.0);
    }

    /// Every consecutive pair of the returned walk is a real edge
    #[test]
    fn test_loop_pairs_are_connected() {
        let graph = square_graph(0.0);
        let config = config(300.0, 500.0, 1000.0, 400.0);

        let result = find_best_loop(&graph, "home", &config)
            .expect("search should run")
            .expect("a loop should be found");

        for pair in result.nodes.windows(2) {
            let u = graph.index_of(&pair[0]).expect("node should exist");
            let v = graph.index_of(&pair[1]).expect("node should exist");
            assert!(graph.edge_between(u, v).is_some());
        }
    }

    /// Walking the result against the cost model reproduces its stored
    /// aggregates exactly
    #[test]
    fn test_rescoring_is_idempotent() {
        let graph = square_graph(0.0);
        let config = config(300.0, 500.0, 1000.0, 400.0);

        let result = find_best_loop(&graph, "home", &config)
            .expect("search should run")
            .expect("a loop should be found");

        let mut distance = 0.0;
        let mut elevation = 0.0;
        let mut cost = 0.0;
        for pair in result.nodes.windows(2) {
            let u = graph.index_of(&pair[0]).expect("node should exist");
            let v = graph.index_of(&pair[1]).expect("node should exist");
            let edge = graph.edge_between(u, v).expect("edge should exist");

            distance += edge.distance;
            elevation += edge.elevation_gain.max(0.0);
            cost += edge_cost(edge, &config.cost);
        }

        assert_abs_diff_eq!(distance, result.distance_m);
        assert_abs_diff_eq!(elevation, result.elevation_gain_m);

        let deviation = distance - config.constraints.target_m;
        let rescored =
            cost + config.search.deviation_weight * deviation.powi(2);
        assert_abs_diff_eq!(rescored, result.score);
    }

    /// A start id that is not in the graph is an error, not a miss
    #[test]
    fn test_unknown_start_err() -> Result<(), String> {
        let graph = square_graph(0.0);
        let config = config(300.0, 500.0, 1000.0, 400.0);

        match find_best_loop(&graph, "nowhere", &config) {
            Err(RouteError::UnknownStart(id)) => {
                assert_eq!(id, "nowhere");
                Ok(())
            }
            _ => Err("expected an UnknownStart error".to_string()),
        }
    }

    /// No node far enough away to qualify as a turnaround means no result
    #[test]
    fn test_no_candidates_is_none() {
        let graph = square_graph(0.0);
        // Lower candidate bound is 0.4 * 10000 = 4000m, far beyond the
        // square
        let config = config(10_000.0, 12_000.0, 1000.0, 11_000.0);

        let result = find_best_loop(&graph, "home", &config)
            .expect("search should run");

        assert!(result.is_none());
    }

    /// A loop shorter than the minimum distance is rejected
    #[test]
    fn test_short_loop_rejected() {
        let graph = square_graph(0.0);
        // The only loop is 400m, below the 450m floor
        let config = config(450.0, 500.0, 1000.0, 450.0);

        let result = find_best_loop(&graph, "home", &config)
            .expect("search should run");

        assert!(result.is_none());
    }

    /// A loop that climbs more than the limit is rejected
    #[test]
    fn test_elevation_limit_rejected() {
        let graph = square_graph(50.0);
        let config = config(300.0, 500.0, 10.0, 400.0);

        let result = find_best_loop(&graph, "home", &config)
            .expect("search should run");

        assert!(result.is_none());
    }

    /// The same square within the climb limit reports its gain
    #[test]
    fn test_elevation_gain_reported() {
        let graph = square_graph(50.0);
        let config = config(300.0, 500.0, 100.0, 400.0);

        let result = find_best_loop(&graph, "home", &config)
            .expect("search should run")
            .expect("a loop should be found");

        // One climb up to the high corner, whichever way round
        assert_abs_diff_eq!(result.elevation_gain_m, 50.0);
    }

    /// Repeated traversals of the same segment are counted per repetition
    #[test]
    fn test_count_edge_reuse() {
        let a = NodeIndex::new(0);
        let b = NodeIndex::new(1);
        let c = NodeIndex::new(2);

        // Out-and-back spur: a-b-c-b-a reuses both segments once each
        let walk = vec![a, b, c, b, a];
        assert_eq!(count_edge_reuse(&walk), 2);

        let simple = vec![a, b, c];
        assert_eq!(count_edge_reuse(&simple), 0);
    }
}
