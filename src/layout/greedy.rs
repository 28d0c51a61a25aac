use anyhow::bail;
use hashbrown::HashSet;
use log::debug;
use serde::{
    Deserialize,
    Serialize,
};

use super::graph::{
    Adjacency,
    OverlapGraph,
};
use crate::data_structs::annotation::Laned;
use crate::data_structs::typedef::{
    LaneType,
    PosType,
    VertexId,
};

/// Vertex ordering used by [`greedy_layout`] in every colouring round.
///
/// All orderings are stable: vertices that compare equal keep their input
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "console", derive(clap::ValueEnum))]
pub enum VertexOrder {
    /// Widest annotation first.
    #[default]
    WidthDescending,
    /// Vertex with the most remaining neighbours first.
    DegreeDescending,
    /// Leftmost annotation first.
    StartAscending,
}

impl VertexOrder {
    pub fn sort(
        &self,
        vertices: &mut [VertexId],
        graph: &OverlapGraph,
        adjacency: &Adjacency,
    ) {
        match self {
            VertexOrder::WidthDescending => {
                vertices.sort_by(|&a, &b| graph.w(b).total_cmp(&graph.w(a)))
            },
            VertexOrder::DegreeDescending => {
                vertices.sort_by(|&a, &b| adjacency.degree(b).cmp(&adjacency.degree(a)))
            },
            VertexOrder::StartAscending => {
                vertices.sort_by(|&a, &b| graph.x(a).total_cmp(&graph.x(b)))
            },
        }
    }
}

/// Result of colouring an [`OverlapGraph`]: a lane per vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Coloring {
    pub lanes:      usize,
    pub assignment: Vec<LaneType>,
}

impl Coloring {
    pub fn apply<A: Laned>(
        &self,
        annotations: &mut [A],
    ) {
        for (ann, &lane) in annotations.iter_mut().zip(self.assignment.iter()) {
            ann.set_y(lane);
        }
    }
}

/// Greedy colouring on a disposable copy of the graph's adjacency.
///
/// Each round `order` arranges the remaining vertices. Walking that order,
/// every still available vertex takes the round's lane and makes its
/// neighbours unavailable, then leaves the graph. Rounds repeat until no
/// vertex is left.
pub(super) fn color_graph<F, E>(
    graph: &OverlapGraph,
    mut order: F,
) -> Result<Coloring, E>
where
    F: FnMut(&mut [VertexId], &Adjacency) -> Result<(), E>, {
    let mut adjacency = graph.adjacency();
    let mut assignment = vec![0; graph.len()];
    let mut lane: LaneType = 0;

    while !adjacency.is_empty() {
        let mut round = adjacency.remaining();
        order(round.as_mut_slice(), &adjacency)?;

        let mut available: HashSet<VertexId> = round.iter().copied().collect();
        for &vertex in round.iter() {
            if !available.remove(&vertex) {
                continue;
            }
            assignment[vertex] = lane;
            for neighbor in adjacency.take(vertex) {
                available.remove(&neighbor);
            }
        }
        lane += 1;
    }

    Ok(Coloring {
        lanes: lane,
        assignment,
    })
}

/// Greedy graph colouring layout.
///
/// Deterministic for a given `order`. Returns the number of lanes used.
pub fn greedy_layout<A: Laned>(
    annotations: &mut [A],
    tolerance: PosType,
    order: VertexOrder,
) -> usize {
    if annotations.is_empty() {
        return 0;
    }
    let graph = OverlapGraph::new(annotations, tolerance);
    greedy_layout_on(annotations, &graph, order)
}

/// [`greedy_layout`] over a prebuilt graph.
pub fn greedy_layout_on<A: Laned>(
    annotations: &mut [A],
    graph: &OverlapGraph,
    order: VertexOrder,
) -> usize {
    assert_eq!(
        annotations.len(),
        graph.len(),
        "Overlap graph was built from a different annotation list"
    );
    if graph.is_empty() {
        return 0;
    }

    let coloring = match color_graph(graph, |round, adjacency| {
        order.sort(round, graph, adjacency);
        Ok::<(), std::convert::Infallible>(())
    }) {
        Ok(coloring) => coloring,
        Err(never) => match never {},
    };
    coloring.apply(annotations);
    debug!(
        "Greedy layout ({:?}) placed {} annotations in {} lanes",
        order,
        annotations.len(),
        coloring.lanes
    );
    coloring.lanes
}

/// Greedy layout with a caller-supplied ordering.
///
/// `order` receives the vertices remaining at the start of each round and
/// must rearrange them. Anything other than a permutation is rejected.
pub fn greedy_layout_by<A, F>(
    annotations: &mut [A],
    tolerance: PosType,
    mut order: F,
) -> anyhow::Result<usize>
where
    A: Laned,
    F: FnMut(&mut [VertexId], &OverlapGraph), {
    if annotations.is_empty() {
        return Ok(0);
    }
    let graph = OverlapGraph::new(annotations, tolerance);

    let coloring = color_graph(&graph, |round, adjacency| {
        order(round, &graph);
        let mut check = round.to_vec();
        check.sort_unstable();
        if check != adjacency.remaining() {
            bail!("Vertex ordering must be a permutation of the remaining vertices")
        }
        Ok(())
    })?;
    coloring.apply(annotations);
    debug!(
        "Greedy layout (custom order) placed {} annotations in {} lanes",
        annotations.len(),
        coloring.lanes
    );
    Ok(coloring.lanes)
}

