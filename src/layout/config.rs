use std::io::Read;

use anyhow::bail;
use itertools::Itertools;
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{
    Deserialize,
    Serialize,
};

use super::greedy::{
    greedy_layout,
    VertexOrder,
};
use super::heuristic::heuristic_layout_with_rng;
use super::interval::interval_layout;
use crate::data_structs::annotation::{
    spans_overlap,
    Laned,
};
use crate::data_structs::typedef::{
    LaneType,
    PosType,
};
use crate::utils::config_from_json;
use crate::with_field_fn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "console", derive(clap::ValueEnum))]
pub enum LayoutAlgorithm {
    /// Exact interval scheduling.
    #[default]
    Interval,
    /// Deterministic greedy colouring.
    Greedy,
    /// Randomized greedy colouring, best of several trials.
    Heuristic,
}

/// Options for laying out one track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub algorithm:    LayoutAlgorithm,
    pub tolerance:    PosType,
    pub iterations:   usize,
    pub vertex_order: VertexOrder,
    pub seed:         Option<u64>,
    pub bin_height:   PosType,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            algorithm:    LayoutAlgorithm::default(),
            tolerance:    0.0,
            iterations:   100,
            vertex_order: VertexOrder::default(),
            seed:         None,
            bin_height:   10.0,
        }
    }
}

impl LayoutConfig {
    with_field_fn!(algorithm, LayoutAlgorithm);
    with_field_fn!(tolerance, PosType);
    with_field_fn!(iterations, usize);
    with_field_fn!(vertex_order, VertexOrder);
    with_field_fn!(seed, Option<u64>);
    with_field_fn!(bin_height, PosType);

    pub fn from_json<R: Read>(reader: R) -> anyhow::Result<Self> {
        config_from_json(reader)
    }

    /// Lays out `annotations` with the configured algorithm and returns the
    /// lane count.
    pub fn run<A: Laned>(
        &self,
        annotations: &mut [A],
    ) -> anyhow::Result<usize> {
        if !self.tolerance.is_finite() {
            bail!("Overlap tolerance must be finite, got {}", self.tolerance)
        }
        debug!(
            "Running {:?} layout on {} annotations",
            self.algorithm,
            annotations.len()
        );
        let lanes = match self.algorithm {
            LayoutAlgorithm::Interval => interval_layout(annotations, self.tolerance),
            LayoutAlgorithm::Greedy => {
                greedy_layout(annotations, self.tolerance, self.vertex_order)
            },
            LayoutAlgorithm::Heuristic => {
                match self.seed {
                    Some(seed) => {
                        heuristic_layout_with_rng(
                            annotations,
                            self.iterations,
                            self.tolerance,
                            &mut StdRng::seed_from_u64(seed),
                        )
                    },
                    None => {
                        heuristic_layout_with_rng(
                            annotations,
                            self.iterations,
                            self.tolerance,
                            &mut rand::thread_rng(),
                        )
                    },
                }
            },
        };
        Ok(lanes)
    }

    /// Pixel height of a track holding `lanes` lanes.
    pub fn track_height(
        &self,
        lanes: usize,
    ) -> PosType {
        lanes as PosType * self.bin_height
    }

    /// Pixel offset of the top of `lane`.
    pub fn lane_offset(
        &self,
        lane: LaneType,
    ) -> PosType {
        lane as PosType * self.bin_height
    }
}

/// Checks that no two annotations sharing a lane overlap within
/// `tolerance`. Unassigned annotations are ignored.
pub fn lanes_overlap_free<A: Laned>(
    annotations: &[A],
    tolerance: PosType,
) -> bool {
    annotations
        .iter()
        .filter_map(|ann| ann.y().map(|lane| (lane, ann)))
        .into_group_map()
        .values()
        .all(|lane| {
            lane.iter()
                .tuple_combinations()
                .all(|(a, b)| !spans_overlap(*a, *b, tolerance))
        })
}
