//! Lane assignment for annotations.
//!
//! All engines share the [`OverlapGraph`] model: one vertex per annotation,
//! one edge per overlapping pair. They only write lanes through
//! [`Laned::set_y`](crate::data_structs::annotation::Laned::set_y) and
//! return the number of lanes used (0 for an empty input, which is left
//! untouched).
//!
//! | engine | deterministic | optimal |
//! |---|---|---|
//! | [`interval_layout`] | yes | for interval overlap |
//! | [`greedy_layout`] | yes | no |
//! | [`heuristic_layout`] | no (unless seeded) | no |
//!
//! The colouring engines consume a disposable [`Adjacency`] copy, so one
//! graph can be reused across many layout calls.

mod config;
mod graph;
mod greedy;
mod heuristic;
mod interval;

pub use config::{
    lanes_overlap_free,
    LayoutAlgorithm,
    LayoutConfig,
};
pub use graph::{
    Adjacency,
    OverlapGraph,
};
pub use greedy::{
    greedy_layout,
    greedy_layout_by,
    greedy_layout_on,
    VertexOrder,
};
pub use heuristic::{
    heuristic_layout,
    heuristic_layout_on,
    heuristic_layout_with_rng,
};
pub use interval::{
    interval_layout,
    interval_layout_on,
};
