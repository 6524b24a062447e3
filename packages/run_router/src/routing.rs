//! The routing core: edge scoring, the distance-bounded shortest-path
//! engine, and the constrained loop search built on top of the two.

pub mod cost;
pub mod dijkstra;
pub mod looper;
pub mod structs;
