//! Construction of the street graph from raw provider rows, plus the read
//! side queries the rest of the package needs: id and nearest-node lookup,
//! directed edge access and the de-duplicated segment listing.

use petgraph::Directed;
use petgraph::graph::{Graph, NodeIndex};
use petgraph::visit::{EdgeRef, IntoNodeReferences};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use crate::common::errors::RouteError;
use crate::common::graph_data::{EdgeData, NodeData, RoadType};
use crate::loading::postgres::{EdgeRow, NodeRow};

/// One de-duplicated undirected street segment, in a form which can be
/// rendered directly or projected into a local frame for snapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphSegment {
    pub lat1: f64,
    pub lon1: f64,
    pub lat2: f64,
    pub lon2: f64,
    pub road_type: RoadType,
}

/// The street network: nodes plus directed weighted edges, with an id
/// lookup on the side. Logically immutable once built; the serving layer
/// replaces the whole value when the area of interest moves.
#[derive(Default)]
pub struct RouteGraph {
    pub(crate) graph: Graph<NodeData, EdgeData, Directed, u32>,
    node_lookup: FxHashMap<String, NodeIndex>,
}

impl RouteGraph {
    /// Build the graph from raw point and connection records. Every point
    /// becomes exactly one node, with the point closest to the requested
    /// centre renamed to "home". Every connection with a positive length
    /// becomes two directed edges with independently computed climb values.
    pub fn from_rows(
        nodes: Vec<NodeRow>,
        edges: Vec<EdgeRow>,
        centre_lat: f64,
        centre_lon: f64,
    ) -> Result<RouteGraph, RouteError> {
        if nodes.is_empty() {
            return Err(RouteError::Construction(
                "no nodes within the requested area".to_string(),
            ));
        }

        // Squared coordinate distance, good enough at city scale
        let mut home_source: Option<i64> = None;
        let mut best_d2 = f64::INFINITY;
        for row in nodes.iter() {
            let d2 =
                (row.lat - centre_lat).powi(2) + (row.lon - centre_lon).powi(2);
            if d2 < best_d2 {
                best_d2 = d2;
                home_source = Some(row.id);
            }
        }

        let home_source = home_source.ok_or_else(|| {
            RouteError::Construction(
                "could not identify a home node".to_string(),
            )
        })?;

        let mut graph = Graph::<NodeData, EdgeData, Directed, u32>::new();
        let mut node_lookup = FxHashMap::<String, NodeIndex>::default();
        let mut source_to_inx = FxHashMap::<i64, NodeIndex>::default();

        for (idx, row) in nodes.into_iter().enumerate() {
            let (id, name) = if row.id == home_source {
                ("home".to_string(), "Home".to_string())
            } else {
                (format!("n{idx}"), format!("Node {idx}"))
            };

            let inx = graph.add_node(NodeData {
                id: id.clone(),
                name,
                lat: row.lat,
                lon: row.lon,
                elevation: row.elevation,
            });
            node_lookup.insert(id, inx);
            source_to_inx.insert(row.id, inx);
        }

        for row in edges {
            if row.distance <= 0.0 {
                continue;
            }

            let src_inx = match source_to_inx.get(&row.src) {
                Some(inx) => *inx,
                None => continue,
            };
            let dst_inx = match source_to_inx.get(&row.dst) {
                Some(inx) => *inx,
                None => continue,
            };

            let road_type = RoadType::from(row.highway.as_str());

            let (src_id, src_elev) = {
                let node = &graph[src_inx];
                (node.id.clone(), node.elevation)
            };
            let (dst_id, dst_elev) = {
                let node = &graph[dst_inx];
                (node.id.clone(), node.elevation)
            };

            // One record per direction; climbing one way means flat the
            // other. update_edge keeps a repeated connection from creating
            // duplicate (src, dst) entries.
            graph.update_edge(
                src_inx,
                dst_inx,
                EdgeData {
                    src: src_id.clone(),
                    dst: dst_id.clone(),
                    distance: row.distance,
                    road_type,
                    elevation_gain: (dst_elev - src_elev).max(0.0),
                },
            );
            graph.update_edge(
                dst_inx,
                src_inx,
                EdgeData {
                    src: dst_id,
                    dst: src_id,
                    distance: row.distance,
                    road_type,
                    elevation_gain: (src_elev - dst_elev).max(0.0),
                },
            );
        }

        Ok(RouteGraph { graph, node_lookup })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of directed edge records (two per physical segment)
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.node_lookup.get(id).copied()
    }

    pub fn node(&self, inx: NodeIndex) -> Option<&NodeData> {
        self.graph.node_weight(inx)
    }

    pub fn node_by_id(&self, id: &str) -> Option<&NodeData> {
        self.index_of(id).and_then(|inx| self.graph.node_weight(inx))
    }

    /// The directed edge between two adjacent nodes, if one exists
    pub fn edge_between(
        &self,
        src: NodeIndex,
        dst: NodeIndex,
    ) -> Option<&EdgeData> {
        self.graph
            .find_edge(src, dst)
            .and_then(|eref| self.graph.edge_weight(eref))
    }

    /// Linear scan for the node closest to the given coordinate. Squared
    /// coordinate distance rather than geodesic; the approximation is part
    /// of the contract so results stay deterministic.
    pub fn nearest_node(&self, lat: f64, lon: f64) -> Result<&str, RouteError> {
        let mut best: Option<&str> = None;
        let mut best_d2 = f64::INFINITY;

        for (_, node) in self.graph.node_references() {
            let d2 = (node.lat - lat).powi(2) + (node.lon - lon).powi(2);
            if d2 < best_d2 {
                best_d2 = d2;
                best = Some(&node.id);
            }
        }

        best.ok_or(RouteError::EmptyGraph)
    }

    /// Every physical street segment exactly once, using the sorted endpoint
    /// ids to pick a canonical orientation
    pub fn segments(&self) -> Vec<GraphSegment> {
        let mut seen = FxHashSet::<(&str, &str)>::default();
        let mut segments = Vec::new();

        for eref in self.graph.edge_references() {
            let edata = eref.weight();

            let key = if edata.src <= edata.dst {
                (edata.src.as_str(), edata.dst.as_str())
            } else {
                (edata.dst.as_str(), edata.src.as_str())
            };
            if !seen.insert(key) {
                continue;
            }

            let n1 = &self.graph[eref.source()];
            let n2 = &self.graph[eref.target()];

            segments.push(GraphSegment {
                lat1: n1.lat,
                lon1: n1.lon,
                lat2: n2.lat,
                lon2: n2.lon,
                road_type: edata.road_type,
            });
        }

        segments
    }
}
