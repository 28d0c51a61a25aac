use std::io::Read;

use anyhow::bail;
use bio::io::gff::{
    self,
    GffType,
};
use indexmap::IndexMap;
use log::debug;

use crate::data_structs::annotation::{
    Annotation,
    AnnotationGroup,
};
use crate::data_structs::typedef::AnnotId;
use crate::data_structs::Strand;

/// Reads GFF3 records into [`Annotation`]s.
///
/// GFF3 positions are 1-based and inclusive; they are shifted to 0-based
/// half-open (`x = start - 1`, `w = end - start + 1`). The id comes from the
/// `ID` attribute, or `seqname:start-end` when absent. Records can be
/// restricted to one sequence and to one feature type (e.g. `gene`).
pub fn read_gff<R: Read>(
    reader: R,
    seqname: Option<&str>,
    feature_type: Option<&str>,
) -> anyhow::Result<Vec<Annotation>> {
    let mut reader = gff::Reader::new(reader, GffType::GFF3);
    let mut annotations = Vec::new();

    for record in reader.records() {
        let record = record?;
        if seqname.is_some_and(|name| name != record.seqname())
            || feature_type.is_some_and(|ft| ft != record.feature_type())
        {
            continue;
        }

        annotations.push(to_annotation(&record)?);
    }

    debug!("Read {} annotations from GFF3", annotations.len());
    Ok(annotations)
}

/// Reads GFF3 records into [`AnnotationGroup`]s keyed by their `Parent`
/// attribute, e.g. the exons of one transcript.
///
/// Groups are ordered by the first appearance of their parent and span the
/// union of their members. Records without a `Parent` are skipped; for
/// records listing several parents only the first one is used.
pub fn read_gff_groups<R: Read>(
    reader: R,
    seqname: Option<&str>,
    feature_type: Option<&str>,
) -> anyhow::Result<Vec<AnnotationGroup<Annotation>>> {
    let mut reader = gff::Reader::new(reader, GffType::GFF3);
    let mut members: IndexMap<AnnotId, Vec<Annotation>> = IndexMap::new();

    for record in reader.records() {
        let record = record?;
        if seqname.is_some_and(|name| name != record.seqname())
            || feature_type.is_some_and(|ft| ft != record.feature_type())
        {
            continue;
        }
        let Some(parent) = record.attributes().get("Parent")
        else {
            continue;
        };
        let parent = AnnotId::from(parent.as_str());
        members
            .entry(parent)
            .or_default()
            .push(to_annotation(&record)?);
    }

    let groups = members
        .into_iter()
        .map(|(parent, annots)| AnnotationGroup::try_from_members(parent, annots))
        .collect::<anyhow::Result<Vec<_>>>()?;
    debug!("Read {} annotation groups from GFF3", groups.len());
    Ok(groups)
}

fn to_annotation(record: &gff::Record) -> anyhow::Result<Annotation> {
    let (start, end) = (*record.start(), *record.end());
    if start == 0 || start > end {
        bail!(
            "Invalid GFF3 coordinates {}:{}-{}",
            record.seqname(),
            start,
            end
        )
    }

    let id = match record.attributes().get("ID") {
        Some(id) => arcstr::ArcStr::from(id.as_str()),
        None => arcstr::format!("{}:{}-{}", record.seqname(), start - 1, end),
    };
    let strand = record.strand().map(Strand::from).unwrap_or_default();
    Ok(Annotation::from_span(id, (start - 1) as f64, end as f64).with_strand(strand))
}
