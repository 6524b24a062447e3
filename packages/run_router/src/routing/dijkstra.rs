//! Single-source shortest paths with a hard distance cutoff and optional
//! per-segment penalty multipliers.
//!
//! Weights are raw edge distances, never the scoring cost. Penalty
//! multipliers are always >= 1, so weights stay non-negative and the
//! classic priority-queue relaxation applies. Nodes whose best distance
//! would exceed the cutoff are never recorded; reachability is exposed
//! through the Option-returning accessors on [`PathTree`] rather than by
//! probing raw maps.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashMap;

use crate::loading::graph::RouteGraph;

/// Distance multipliers keyed by unordered node pair; pairs not present
/// default to 1.0.
pub type EdgePenalties = FxHashMap<(NodeIndex, NodeIndex), f64>;

/// Canonical key for an undirected segment between two nodes
pub fn undirected_key(
    a: NodeIndex,
    b: NodeIndex,
) -> (NodeIndex, NodeIndex) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Min-heap entry. BinaryHeap is a max-heap, so the comparison is
/// reversed; the node index acts as a deterministic tie-breaker.
#[derive(Debug, Clone, Copy, PartialEq)]
struct QueueEntry {
    dist: f64,
    node: NodeIndex,
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Shortest-path tree produced by [`shortest_paths`]. Nodes unreachable
/// within the distance budget are simply absent.
pub struct PathTree {
    dist: FxHashMap<NodeIndex, f64>,
    prev: FxHashMap<NodeIndex, Option<NodeIndex>>,
}

impl PathTree {
    /// Best known distance from the source, if the node was reached
    pub fn distance_to(&self, node: NodeIndex) -> Option<f64> {
        self.dist.get(&node).copied()
    }

    /// All nodes reached within the budget, with their distances
    pub fn reached(&self) -> impl Iterator<Item = (NodeIndex, f64)> + '_ {
        self.dist.iter().map(|(node, dist)| (*node, *dist))
    }

    /// Walk the predecessor chain back from a target. Returns None if the
    /// target was never reached; the source yields a single-node path.
    pub fn path_to(&self, target: NodeIndex) -> Option<Vec<NodeIndex>> {
        if !self.prev.contains_key(&target) {
            return None;
        }

        let mut path = vec![target];
        let mut cur = target;
        while let Some(Some(pred)) = self.prev.get(&cur) {
            path.push(*pred);
            cur = *pred;
        }
        path.reverse();

        Some(path)
    }
}

/// Dijkstra over raw edge distances, bounded by `max_distance`. Stale heap
/// entries are skipped, and any tentative distance over the budget is
/// discarded rather than relaxed further.
pub fn shortest_paths(
    graph: &RouteGraph,
    source: NodeIndex,
    max_distance: f64,
    penalties: Option<&EdgePenalties>,
) -> PathTree {
    let mut dist = FxHashMap::<NodeIndex, f64>::default();
    let mut prev = FxHashMap::<NodeIndex, Option<NodeIndex>>::default();

    dist.insert(source, 0.0);
    prev.insert(source, None);

    let mut heap = BinaryHeap::new();
    heap.push(QueueEntry { dist: 0.0, node: source });

    while let Some(QueueEntry { dist: d, node: u }) = heap.pop() {
        match dist.get(&u) {
            Some(best) if d > *best => continue,
            _ => (),
        }
        if d > max_distance {
            continue;
        }

        for eref in graph.graph.edges(u) {
            let v = eref.target();
            let base_w = eref.weight().distance;
            if base_w <= 0.0 {
                continue;
            }

            let key = undirected_key(u, v);
            let factor = penalties
                .and_then(|p| p.get(&key))
                .copied()
                .unwrap_or(1.0);
            let nd = d + base_w * factor;

            let improves = match dist.get(&v) {
                Some(cur) => nd < *cur,
                None => true,
            };
            if improves && nd <= max_distance {
                dist.insert(v, nd);
                prev.insert(v, Some(u));
                heap.push(QueueEntry { dist: nd, node: v });
            }
        }
    }

    PathTree { dist, prev }
}
