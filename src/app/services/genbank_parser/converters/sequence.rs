//! Converters for organism data and the ORIGIN sequence block

use super::{Conversion, ConvertResult, content_map, join_spaced, key};
use crate::app::models::{Record, Value};
use crate::app::services::genbank_parser::diagnostics::Diagnostics;
use crate::constants::content_keys;

/// `SOURCE` text into `content.source`
pub fn source(lines: &[String], record: &mut Record, _diagnostics: &mut Diagnostics) -> ConvertResult {
    let content = content_map(record)?;
    content.insert(key(content_keys::SOURCE), Value::Text(join_spaced(lines)));
    Ok(Conversion::AlreadyApplied)
}

/// `ORGANISM` block into `content.organism`: species followed by the lineage
///
/// The lineage is `;`-separated and closed by a full stop, which is dropped.
pub fn organism(lines: &[String], record: &mut Record, _diagnostics: &mut Diagnostics) -> ConvertResult {
    let mut taxa = Vec::new();
    if let Some((species, lineage)) = lines.split_first() {
        let species = species.trim();
        if !species.is_empty() {
            taxa.push(Value::text(species));
        }
        taxa.extend(
            join_spaced(lineage)
                .trim_end()
                .trim_end_matches('.')
                .split(';')
                .map(str::trim)
                .filter(|taxon| !taxon.is_empty())
                .map(Value::text),
        );
    }

    let content = content_map(record)?;
    content.insert(key(content_keys::ORGANISM), Value::List(taxa));
    Ok(Conversion::AlreadyApplied)
}

/// `ORIGIN` block into `content.sequence`
///
/// Each line starts with a position number (the header line with the field
/// name); the remaining groups are concatenated.
pub fn origin(lines: &[String], record: &mut Record, _diagnostics: &mut Diagnostics) -> ConvertResult {
    let sequence: String = lines
        .iter()
        .flat_map(|line| line.split_whitespace().skip(1))
        .collect();

    let content = content_map(record)?;
    content.insert(key(content_keys::SEQUENCE), Value::Text(sequence));
    Ok(Conversion::AlreadyApplied)
}
