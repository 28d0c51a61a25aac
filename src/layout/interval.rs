use itertools::Itertools;
use log::debug;

use super::graph::OverlapGraph;
use crate::data_structs::annotation::Laned;
use crate::data_structs::typedef::{
    PosType,
    VertexId,
};

/// Exact interval scheduling layout.
///
/// Annotations are visited by ascending start (ties keep input order). Each
/// one goes into the first lane whose most recently placed occupant it does
/// not overlap, or into a new lane. For pure interval overlap this uses the
/// minimum number of lanes.
///
/// Returns the number of lanes opened.
pub fn interval_layout<A: Laned>(
    annotations: &mut [A],
    tolerance: PosType,
) -> usize {
    if annotations.is_empty() {
        return 0;
    }
    let graph = OverlapGraph::new(annotations, tolerance);
    interval_layout_on(annotations, &graph)
}

/// [`interval_layout`] over a prebuilt graph.
///
/// With a graph built from a custom predicate the lane count is still valid
/// but no longer guaranteed minimal.
pub fn interval_layout_on<A: Laned>(
    annotations: &mut [A],
    graph: &OverlapGraph,
) -> usize {
    assert_eq!(
        annotations.len(),
        graph.len(),
        "Overlap graph was built from a different annotation list"
    );
    if graph.is_empty() {
        return 0;
    }

    let order = graph
        .vertices()
        .sorted_by(|&a, &b| graph.x(a).total_cmp(&graph.x(b)));

    let mut lanes: Vec<Vec<VertexId>> = Vec::new();
    for vertex in order {
        let free = lanes.iter().position(|lane| {
            lane.last()
                .map_or(true, |&last| !graph.is_adjacent(vertex, last))
        });
        let lane = match free {
            Some(lane) => lane,
            None => {
                lanes.push(Vec::new());
                lanes.len() - 1
            },
        };
        lanes[lane].push(vertex);
        annotations[vertex].set_y(lane);
    }

    debug!(
        "Interval layout placed {} annotations in {} lanes",
        annotations.len(),
        lanes.len()
    );
    lanes.len()
}
