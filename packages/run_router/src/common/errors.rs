//! Error taxonomy for the routing core.
//!
//! A loop search that finds nothing is not represented here; it is a normal
//! outcome and surfaces as `Ok(None)` from the search itself.

use thiserror::Error;

/// Errors produced while building or querying the street graph.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("graph construction failed: {0}")]
    Construction(String),

    #[error("nearest-node lookup on a graph with no nodes")]
    EmptyGraph,

    #[error("start node {0:?} is not in the graph")]
    UnknownStart(String),

    #[error("invalid request: {0}")]
    InvalidInput(String),

    #[error("graph provider error: {0}")]
    Provider(#[from] sqlx::Error),
}
