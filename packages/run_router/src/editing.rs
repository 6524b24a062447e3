//! Geometry for user-edited routes: a local planar frame, polyline
//! densification and snapping against the street graph, and a standalone
//! polyline length utility.

pub mod length;
pub mod projection;
pub mod snap;
pub mod structs;
