use anyhow::anyhow;
use hashbrown::{
    HashMap,
    HashSet,
};
use itertools::Itertools;
use log::warn;

use crate::data_structs::annotation::Laned;
use crate::data_structs::typedef::{
    AnnotId,
    PosType,
    VertexId,
};

/// Undirected overlap graph over a fixed list of annotations.
///
/// Vertices are the positions of the annotations in the slice the graph was
/// built from. The spans are copied at construction time, so the edge set
/// does not follow later changes to the annotations.
#[derive(Debug, Clone)]
pub struct OverlapGraph {
    ids:       Vec<AnnotId>,
    id_map:    HashMap<AnnotId, VertexId>,
    spans:     Vec<(PosType, PosType)>,
    edges:     Vec<Vec<VertexId>>,
    tolerance: PosType,
}

impl OverlapGraph {
    /// Builds the graph with the default overlap predicate
    /// ([`spans_overlap`](crate::data_structs::annotation::spans_overlap)).
    ///
    /// Candidate pairs are found by sweeping over annotations ordered by
    /// start, which yields the same edge set as checking every pair.
    pub fn new<A: Laned>(
        annotations: &[A],
        tolerance: PosType,
    ) -> Self {
        let mut graph = Self::empty(annotations, tolerance);
        let order = (0..graph.len())
            .sorted_by(|&a, &b| graph.spans[a].0.total_cmp(&graph.spans[b].0))
            .collect_vec();

        for (i, &a) in order.iter().enumerate() {
            let (a_x, a_x2) = graph.spans[a];
            for &b in &order[i + 1..] {
                let (b_x, b_x2) = graph.spans[b];
                if b_x > a_x2 + tolerance {
                    break;
                }
                if a_x - tolerance <= b_x2 {
                    graph.edges[a].push(b);
                    graph.edges[b].push(a);
                }
            }
        }
        graph.finish()
    }

    /// Builds the graph by testing every unordered pair with `predicate`.
    ///
    /// The edge is added if the predicate holds in either argument order.
    pub fn with_predicate<A, F>(
        annotations: &[A],
        tolerance: PosType,
        predicate: F,
    ) -> Self
    where
        A: Laned,
        F: Fn(&A, &A, PosType) -> bool, {
        let mut graph = Self::empty(annotations, tolerance);
        for (a, b) in (0..annotations.len()).tuple_combinations() {
            let (left, right) = (&annotations[a], &annotations[b]);
            if predicate(left, right, tolerance) || predicate(right, left, tolerance) {
                graph.edges[a].push(b);
                graph.edges[b].push(a);
            }
        }
        graph.finish()
    }

    fn empty<A: Laned>(
        annotations: &[A],
        tolerance: PosType,
    ) -> Self {
        let mut id_map = HashMap::with_capacity(annotations.len());
        for (vertex, ann) in annotations.iter().enumerate() {
            if id_map.contains_key(ann.id()) {
                warn!(
                    "Duplicate annotation id {} in overlap graph, lookups will \
                     resolve to the first occurrence",
                    ann.id()
                );
                continue;
            }
            id_map.insert(ann.id().clone(), vertex);
        }

        Self {
            ids: annotations.iter().map(|a| a.id().clone()).collect(),
            id_map,
            spans: annotations.iter().map(|a| (a.x(), a.x2())).collect(),
            edges: vec![Vec::new(); annotations.len()],
            tolerance,
        }
    }

    fn finish(mut self) -> Self {
        for neighbors in self.edges.iter_mut() {
            neighbors.sort_unstable();
            neighbors.dedup();
        }
        self
    }

    pub fn len(&self) -> usize { self.ids.len() }

    pub fn is_empty(&self) -> bool { self.ids.is_empty() }

    pub fn tolerance(&self) -> PosType { self.tolerance }

    pub fn vertices(&self) -> impl Iterator<Item = VertexId> { 0..self.len() }

    /// Neighbours of `vertex`, in ascending order.
    pub fn edges(
        &self,
        vertex: VertexId,
    ) -> &[VertexId] {
        &self.edges[vertex]
    }

    pub fn degree(
        &self,
        vertex: VertexId,
    ) -> usize {
        self.edges[vertex].len()
    }

    pub fn is_adjacent(
        &self,
        u: VertexId,
        v: VertexId,
    ) -> bool {
        self.edges[u].binary_search(&v).is_ok()
    }

    pub fn id(
        &self,
        vertex: VertexId,
    ) -> &AnnotId {
        &self.ids[vertex]
    }

    pub fn x(
        &self,
        vertex: VertexId,
    ) -> PosType {
        self.spans[vertex].0
    }

    pub fn x2(
        &self,
        vertex: VertexId,
    ) -> PosType {
        self.spans[vertex].1
    }

    pub fn w(
        &self,
        vertex: VertexId,
    ) -> PosType {
        self.spans[vertex].1 - self.spans[vertex].0
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Resolves an annotation id to its vertex.
    pub fn annotation_index(
        &self,
        id: &AnnotId,
    ) -> anyhow::Result<VertexId> {
        self.id_map
            .get(id)
            .copied()
            .ok_or_else(|| anyhow!("No annotation with id {} in overlap graph", id))
    }

    /// Returns a disposable working copy of the adjacency structure.
    pub fn adjacency(&self) -> Adjacency {
        Adjacency {
            edges:   self
                .edges
                .iter()
                .enumerate()
                .map(|(v, neighbors)| (v, neighbors.iter().copied().collect()))
                .collect(),
            degrees: self
                .edges
                .iter()
                .enumerate()
                .map(|(v, neighbors)| (v, neighbors.len()))
                .collect(),
        }
    }

    /// Size of the largest set of pairwise overlapping annotations.
    ///
    /// Only meaningful for graphs built with the default predicate, where the
    /// overlap relation is the intersection of `[x, x2 + tolerance]`.
    pub fn max_clique_size(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        let events = self
            .spans
            .iter()
            .filter(|(x, x2)| *x <= x2 + self.tolerance)
            .flat_map(|&(x, x2)| [(x, 0i8), (x2 + self.tolerance, 1i8)])
            .sorted_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut depth = 0usize;
        let mut best = 1usize;
        for (_, kind) in events {
            if kind == 0 {
                depth += 1;
                best = best.max(depth);
            }
            else {
                depth = depth.saturating_sub(1);
            }
        }
        best
    }
}

/// Mutable edges/degrees copy of an [`OverlapGraph`], consumed vertex by
/// vertex by the colouring layouts.
#[derive(Debug, Clone)]
pub struct Adjacency {
    edges:   HashMap<VertexId, HashSet<VertexId>>,
    degrees: HashMap<VertexId, usize>,
}

impl Adjacency {
    pub fn is_empty(&self) -> bool { self.edges.is_empty() }

    pub fn len(&self) -> usize { self.edges.len() }

    pub fn contains(
        &self,
        vertex: VertexId,
    ) -> bool {
        self.edges.contains_key(&vertex)
    }

    /// Remaining degree of `vertex`, or `None` once it has been taken.
    pub fn degree(
        &self,
        vertex: VertexId,
    ) -> Option<usize> {
        self.degrees.get(&vertex).copied()
    }

    /// Vertices not yet taken, in ascending order.
    pub fn remaining(&self) -> Vec<VertexId> {
        self.edges.keys().copied().sorted_unstable().collect()
    }

    /// Removes `vertex` and returns its remaining neighbours.
    pub fn take(
        &mut self,
        vertex: VertexId,
    ) -> Vec<VertexId> {
        self.degrees.remove(&vertex);
        let Some(neighbors) = self.edges.remove(&vertex)
        else {
            return Vec::new();
        };
        for n in neighbors.iter() {
            if let Some(set) = self.edges.get_mut(n) {
                set.remove(&vertex);
            }
            if let Some(degree) = self.degrees.get_mut(n) {
                *degree = degree.saturating_sub(1);
            }
        }
        neighbors.into_iter().collect()
    }
}
