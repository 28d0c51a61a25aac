use std::io::Read;

use anyhow::bail;
use bio::io::bed;
use log::debug;

use crate::data_structs::annotation::Annotation;
use crate::data_structs::Strand;

/// Reads BED records into [`Annotation`]s.
///
/// BED coordinates are already 0-based half-open, so `x = start` and
/// `w = end - start`. The id is taken from the name column, or
/// `chrom:start-end` when it is missing. With `seqname` set, records on
/// other sequences are skipped.
pub fn read_bed<R: Read>(
    reader: R,
    seqname: Option<&str>,
) -> anyhow::Result<Vec<Annotation>> {
    let mut reader = bed::Reader::new(reader);
    let mut annotations = Vec::new();

    for record in reader.records() {
        let record = record?;
        if seqname.is_some_and(|name| name != record.chrom()) {
            continue;
        }
        if record.start() > record.end() {
            bail!(
                "BED record {}:{}-{} ends before it starts",
                record.chrom(),
                record.start(),
                record.end()
            )
        }

        let id = match record.name() {
            Some(name) if !name.is_empty() => arcstr::ArcStr::from(name),
            _ => arcstr::format!("{}:{}-{}", record.chrom(), record.start(), record.end()),
        };
        let strand = record.strand().map(Strand::from).unwrap_or_default();
        annotations.push(
            Annotation::from_span(id, record.start() as f64, record.end() as f64)
                .with_strand(strand),
        );
    }

    debug!("Read {} annotations from BED", annotations.len());
    Ok(annotations)
}
