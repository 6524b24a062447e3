//! The functions defined here can be used to read in details of all of the
//! raw points and connections required to represent a map of the area
//! surrounding the requested start location
use aho_corasick::AhoCorasick;
use sqlx;
use sqlx::PgPool;

use crate::common::bbox::BBox;

/// Container for the raw output of the nodes SQL query
#[derive(sqlx::FromRow, Debug, Clone, Copy)]
pub struct NodeRow {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
    pub elevation: f64,
}

/// Container for the raw output of the edges SQL query. One row represents
/// a physical street segment; direction is applied during graph build.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct EdgeRow {
    pub src: i64,
    pub dst: i64,
    pub distance: f64,
    pub highway: String,
}

/// Generate a SQL query to read in the nodes within the provided bounding
/// box
pub fn generate_nodes_query(bbox: &BBox) -> String {
    // This brings the query into the compiled code
    let nodes_base = include_str!("get_nodes.sql");

    let patterns = [
        "< min_lat >".to_string(),
        "< min_lon >".to_string(),
        "< max_lat >".to_string(),
        "< max_lon >".to_string(),
    ];
    let replace_with = [
        bbox.min_lat.to_string(),
        bbox.min_lon.to_string(),
        bbox.max_lat.to_string(),
        bbox.max_lon.to_string(),
    ];

    let ac = AhoCorasick::new(patterns)
        .expect("Something went wrong while setting up aho-corasick");

    ac.replace_all(nodes_base, &replace_with)
}

/// Generate a SQL query to read in the edges within the provided bounding
/// box
pub fn generate_edges_query(bbox: &BBox) -> String {
    let edges_base = include_str!("get_edges.sql");

    let patterns = [
        "< min_lat >".to_string(),
        "< min_lon >".to_string(),
        "< max_lat >".to_string(),
        "< max_lon >".to_string(),
    ];
    let replace_with = [
        bbox.min_lat.to_string(),
        bbox.min_lon.to_string(),
        bbox.max_lat.to_string(),
        bbox.max_lon.to_string(),
    ];

    let ac = AhoCorasick::new(patterns)
        .expect("Something went wrong while setting up aho-corasick");

    ac.replace_all(edges_base, &replace_with)
}

/// Executes the nodes SQL query and returns a vector of NodeRow
pub async fn load_nodes(
    pool: &PgPool,
    bbox: &BBox,
) -> Result<Vec<NodeRow>, sqlx::Error> {
    let query = generate_nodes_query(bbox);
    let rows: Vec<NodeRow> = sqlx::query_as(&query).fetch_all(pool).await?;
    Ok(rows)
}

/// Executes the edges SQL query and returns a vector of EdgeRow
pub async fn load_edges(
    pool: &PgPool,
    bbox: &BBox,
) -> Result<Vec<EdgeRow>, sqlx::Error> {
    let query = generate_edges_query(bbox);
    let rows: Vec<EdgeRow> = sqlx::query_as(&query).fetch_all(pool).await?;
    Ok(rows)
}
