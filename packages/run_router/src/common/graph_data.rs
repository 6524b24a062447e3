//! Payload types stored as node and edge weights in the petgraph graph.

use serde::Serialize;

/// Simplified road classification, derived once from the source highway tag
/// when the graph is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadType {
    MainRoad,
    Residential,
    Path,
}

impl From<&str> for RoadType {
    /// Map a raw highway tag to a road category. The mapping is total:
    /// anything unrecognised (footway, cycleway, track, steps...) is a path.
    fn from(tag: &str) -> RoadType {
        match tag {
            "motorway" | "trunk" | "primary" => RoadType::MainRoad,
            "secondary" | "tertiary" | "unclassified" | "residential"
            | "living_street" | "service" => RoadType::Residential,
            _ => RoadType::Path,
        }
    }
}

/// Node weight: one junction or endpoint in the street network. Immutable
/// once the graph has been built.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// Metres above sea level. The current provider supplies zeros, but
    /// edge gains are computed from this field so real data slots in.
    pub elevation: f64,
}

/// Edge weight: one direction of travel along a street segment. Every
/// physical segment is stored as two of these, with independently computed
/// elevation gains (uphill one way is flat the other).
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeData {
    pub src: String,
    pub dst: String,
    pub distance: f64,
    pub road_type: RoadType,
    /// Positive metres climbed travelling src -> dst, never negative.
    pub elevation_gain: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Major roads map to the main_road category
    #[test]
    fn test_classify_main_road() {
        assert_eq!(RoadType::from("motorway"), RoadType::MainRoad);
        assert_eq!(RoadType::from("trunk"), RoadType::MainRoad);
        assert_eq!(RoadType::from("primary"), RoadType::MainRoad);
    }

    /// Minor roads map to the residential category
    #[test]
    fn test_classify_residential() {
        for tag in [
            "secondary",
            "tertiary",
            "unclassified",
            "residential",
            "living_street",
            "service",
        ] {
            assert_eq!(RoadType::from(tag), RoadType::Residential);
        }
    }

    /// Everything else, including unknown tags, falls back to path
    #[test]
    fn test_classify_path_fallback() {
        assert_eq!(RoadType::from("footway"), RoadType::Path);
        assert_eq!(RoadType::from("steps"), RoadType::Path);
        assert_eq!(RoadType::from("no_such_tag"), RoadType::Path);
    }
}
