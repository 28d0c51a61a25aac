use std::fs::File;
use std::io::{
    BufWriter,
    Write,
};
use std::path::PathBuf;

use anyhow::bail;
use clap::Args;
use itertools::Itertools;
use log::{
    info,
    warn,
};
use tracklane::prelude::*;

use crate::utils::UtilsArgs;

#[derive(Args, Debug, Clone)]
pub(crate) struct LayoutArgs {
    #[arg(required = true, help = "Path to a BED or GFF3 file")]
    file: PathBuf,

    #[arg(short, long, value_enum, help = "Input format (detected from the extension if omitted)")]
    format: Option<AnnotationFormat>,

    #[arg(short, long, value_enum, help = "Layout algorithm")]
    algorithm: Option<LayoutAlgorithm>,

    #[arg(short, long, help = "Overlap tolerance in semantic units")]
    tolerance: Option<f64>,

    #[arg(short, long, help = "Number of randomized trials (heuristic layout)")]
    iterations: Option<usize>,

    #[arg(long, help = "Random seed (heuristic layout)")]
    seed: Option<u64>,

    #[arg(long, value_enum, help = "Vertex order (greedy layout)")]
    order: Option<VertexOrder>,

    #[arg(long, help = "Only lay out records on this sequence")]
    seqname: Option<String>,

    #[arg(short, long, help = "JSON file with layout options, overridden by flags")]
    config: Option<PathBuf>,
}

impl LayoutArgs {
    fn layout_config(&self) -> anyhow::Result<LayoutConfig> {
        let mut config = match self.config.as_ref() {
            Some(path) => LayoutConfig::from_json(File::open(path)?)?,
            None => LayoutConfig::default(),
        };
        if let Some(algorithm) = self.algorithm {
            config = config.with_algorithm(algorithm);
        }
        if let Some(tolerance) = self.tolerance {
            config = config.with_tolerance(tolerance);
        }
        if let Some(iterations) = self.iterations {
            config = config.with_iterations(iterations);
        }
        if let Some(order) = self.order {
            config = config.with_vertex_order(order);
        }
        if self.seed.is_some() {
            config = config.with_seed(self.seed);
        }
        Ok(config)
    }

    pub fn run(
        &self,
        _utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        if !self.file.exists() {
            bail!("File {} does not exist", self.file.display())
        }
        let config = self.layout_config()?;
        let mut annotations =
            read_annotations(&self.file, self.format, self.seqname.as_deref())?;
        if annotations.is_empty() {
            warn!("No annotations found in {}", self.file.display());
        }

        let lanes = config.run(&mut annotations)?;
        info!(
            "Laid out {} annotations in {} lanes ({:?})",
            annotations.len(),
            lanes,
            config.algorithm
        );

        let mut out = BufWriter::new(std::io::stdout().lock());
        writeln!(out, "{}", ["id", "x", "w", "lane"].iter().join("\t"))?;
        for ann in annotations.iter() {
            let lane = ann.y().map(|y| y.to_string()).unwrap_or_default();
            writeln!(out, "{}\t{}\t{}\t{}", ann.id(), ann.x(), ann.w(), lane)?;
        }
        out.flush()?;
        Ok(())
    }
}
