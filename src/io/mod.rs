//! Readers turning annotation files into [`Annotation`]s.

pub mod bed;
pub mod gff;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::anyhow;
pub use bed::read_bed;
pub use gff::{
    read_gff,
    read_gff_groups,
};
use log::info;
use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::annotation::Annotation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "console", derive(clap::ValueEnum))]
pub enum AnnotationFormat {
    Bed,
    Gff,
}

impl AnnotationFormat {
    /// Guesses the format from the file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "bed" => Some(Self::Bed),
            "gff" | "gff3" => Some(Self::Gff),
            _ => None,
        }
    }
}

/// Reads every annotation of `path`. The format is detected from the
/// extension when not given. GFF3 files are read with all feature types.
pub fn read_annotations<P: AsRef<Path>>(
    path: P,
    format: Option<AnnotationFormat>,
    seqname: Option<&str>,
) -> anyhow::Result<Vec<Annotation>> {
    let path = path.as_ref();
    let format = format
        .or_else(|| AnnotationFormat::from_path(path))
        .ok_or_else(|| anyhow!("Can not detect annotation format of {}", path.display()))?;
    let reader = BufReader::new(File::open(path)?);

    let annotations = match format {
        AnnotationFormat::Bed => read_bed(reader, seqname)?,
        AnnotationFormat::Gff => read_gff(reader, seqname, None)?,
    };
    info!(
        "Read {} annotations from {}",
        annotations.len(),
        path.display()
    );
    Ok(annotations)
}
