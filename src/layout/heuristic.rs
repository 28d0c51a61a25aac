use std::convert::Infallible;

use log::{
    debug,
    trace,
};
use rand::seq::SliceRandom;
use rand::Rng;

use super::graph::OverlapGraph;
use super::greedy::{
    color_graph,
    Coloring,
};
use crate::data_structs::annotation::Laned;
use crate::data_structs::typedef::PosType;

/// Randomized greedy colouring layout using the thread-local RNG.
///
/// See [`heuristic_layout_with_rng`].
pub fn heuristic_layout<A: Laned>(
    annotations: &mut [A],
    iterations: usize,
    tolerance: PosType,
) -> usize {
    heuristic_layout_with_rng(
        annotations,
        iterations,
        tolerance,
        &mut rand::thread_rng(),
    )
}

/// Runs `iterations` greedy colouring trials, each shuffling the vertex
/// order of every round, and applies the trial with the fewest lanes. The
/// first trial reaching the minimum wins. `iterations == 0` runs one trial.
pub fn heuristic_layout_with_rng<A, R>(
    annotations: &mut [A],
    iterations: usize,
    tolerance: PosType,
    rng: &mut R,
) -> usize
where
    A: Laned,
    R: Rng + ?Sized, {
    if annotations.is_empty() {
        return 0;
    }
    let graph = OverlapGraph::new(annotations, tolerance);
    heuristic_layout_on(annotations, &graph, iterations, rng)
}

/// [`heuristic_layout_with_rng`] over a prebuilt graph.
pub fn heuristic_layout_on<A, R>(
    annotations: &mut [A],
    graph: &OverlapGraph,
    iterations: usize,
    rng: &mut R,
) -> usize
where
    A: Laned,
    R: Rng + ?Sized, {
    assert_eq!(
        annotations.len(),
        graph.len(),
        "Overlap graph was built from a different annotation list"
    );
    if graph.is_empty() {
        return 0;
    }

    let mut best: Option<Coloring> = None;
    for trial in 0..iterations.max(1) {
        let coloring = match color_graph(graph, |round, _| {
            round.shuffle(&mut *rng);
            Ok::<(), Infallible>(())
        }) {
            Ok(coloring) => coloring,
            Err(never) => match never {},
        };
        trace!("Heuristic trial {} used {} lanes", trial, coloring.lanes);

        if best.as_ref().map_or(true, |b| coloring.lanes < b.lanes) {
            best = Some(coloring);
        }
    }

    match best {
        Some(best) => {
            best.apply(annotations);
            debug!(
                "Heuristic layout placed {} annotations in {} lanes",
                annotations.len(),
                best.lanes
            );
            best.lanes
        },
        None => 0,
    }
}
