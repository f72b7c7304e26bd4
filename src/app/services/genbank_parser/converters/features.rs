//! Converters for the `FEATURES` table
//!
//! Feature blocks look like
//!
//! ```text
//!      gene            <1..206
//!                      /gene="AXL2"
//!                      /note="a long note that
//!                      wraps"
//! ```
//!
//! The location lines form `bp_range`; each `/key=value` qualifier becomes
//! one entry. Gene, CDS and RNA features are folded into one list of gene
//! entries at `content.genes`:
//!
//! | feature   | last entry open        | no entry / last entry done          |
//! |-----------|------------------------|-------------------------------------|
//! | gene      | marked done, new entry | new entry                           |
//! | cds / rna | merged into last entry | new synthetic entry + diagnostic    |
//!
//! A merged CDS or RNA closes the entry, so a second CDS after one gene
//! starts a synthetic entry of its own.

use super::{Conversion, ConvertResult, content_map, key, list_in};
use crate::app::models::{Record, Value, ValueMap};
use crate::app::services::genbank_parser::diagnostics::{DiagnosticKind, Diagnostics};
use crate::constants::{UNSPACED_QUALIFIERS, content_keys, gene_keys};

/// Feature kinds folded into a gene entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Product {
    Cds,
    Rna(&'static str),
}

impl Product {
    fn label(self) -> &'static str {
        match self {
            Product::Cds => "cds",
            Product::Rna(kind) => kind,
        }
    }
}

/// `source` feature into `content.source_feature`
pub fn source(lines: &[String], record: &mut Record, _diagnostics: &mut Diagnostics) -> ConvertResult {
    let feature = parse_feature(lines);
    let content = content_map(record)?;
    content.insert(key(content_keys::SOURCE_FEATURE), Value::Map(feature));
    Ok(Conversion::AlreadyApplied)
}

/// `gene` feature: closes the previous entry and opens a new one
pub fn gene(lines: &[String], record: &mut Record, _diagnostics: &mut Diagnostics) -> ConvertResult {
    let mut entry = parse_feature(lines);
    entry.insert(key(gene_keys::DONE), Value::Flag(false));
    entry.insert(key(gene_keys::CDS_INCLUDED), Value::Flag(false));
    entry.insert(key(gene_keys::RNA_INCLUDED), Value::Flag(false));

    let genes = genes(record)?;
    if let Some(Value::Map(previous)) = genes.last_mut() {
        previous.insert(key(gene_keys::DONE), Value::Flag(true));
    }
    genes.push(Value::Map(entry));
    Ok(Conversion::AlreadyApplied)
}

pub fn cds(lines: &[String], record: &mut Record, diagnostics: &mut Diagnostics) -> ConvertResult {
    attach_product(lines, record, diagnostics, Product::Cds)
}

pub fn rrna(lines: &[String], record: &mut Record, diagnostics: &mut Diagnostics) -> ConvertResult {
    attach_product(lines, record, diagnostics, Product::Rna("rrna"))
}

pub fn trna(lines: &[String], record: &mut Record, diagnostics: &mut Diagnostics) -> ConvertResult {
    attach_product(lines, record, diagnostics, Product::Rna("trna"))
}

pub fn ncrna(lines: &[String], record: &mut Record, diagnostics: &mut Diagnostics) -> ConvertResult {
    attach_product(lines, record, diagnostics, Product::Rna("ncrna"))
}

pub fn tmrna(lines: &[String], record: &mut Record, diagnostics: &mut Diagnostics) -> ConvertResult {
    attach_product(lines, record, diagnostics, Product::Rna("tmrna"))
}

fn attach_product(
    lines: &[String],
    record: &mut Record,
    diagnostics: &mut Diagnostics,
    product: Product,
) -> ConvertResult {
    let mut entry = parse_feature(lines);
    match product {
        Product::Cds => {
            entry.insert(key(gene_keys::CDS_INCLUDED), Value::Flag(true));
        }
        Product::Rna(kind) => {
            entry.insert(key(gene_keys::RNA_INCLUDED), Value::Flag(true));
            entry.insert(key(gene_keys::RNA_TYPE), Value::text(kind));
        }
    }
    entry.insert(key(gene_keys::DONE), Value::Flag(true));

    let genes = genes(record)?;
    let last_open = genes
        .last()
        .and_then(Value::as_map)
        .is_some_and(|last| !is_done(last));

    if last_open {
        if let Some(Value::Map(last)) = genes.last_mut() {
            last.extend(entry);
        }
    } else {
        diagnostics.report(
            DiagnosticKind::OrphanFeature,
            format!(
                "{} without preceding gene; adding a new gene entry",
                product.label()
            ),
        );
        let missing = match product {
            Product::Cds => gene_keys::RNA_INCLUDED,
            Product::Rna(_) => gene_keys::CDS_INCLUDED,
        };
        entry.insert(key(missing), Value::Flag(false));
        genes.push(Value::Map(entry));
    }

    Ok(Conversion::AlreadyApplied)
}

fn genes(record: &mut Record) -> Result<&mut Vec<Value>, super::ConvertError> {
    let content = content_map(record)?;
    list_in(content, content_keys::GENES)
}

fn is_done(entry: &ValueMap) -> bool {
    entry
        .get(&key(gene_keys::DONE))
        .and_then(Value::as_flag)
        .unwrap_or(false)
}

/// Location and qualifiers of one feature block
pub fn parse_feature(lines: &[String]) -> ValueMap {
    let mut feature = ValueMap::new();
    let mut location = String::new();
    let mut open: Option<(String, String)> = None;

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let continues_quoted = open
            .as_ref()
            .is_some_and(|(_, value)| value.matches('"').count() % 2 == 1);

        match line.strip_prefix('/') {
            Some(qualifier) if !continues_quoted => {
                if let Some((name, value)) = open.take() {
                    feature.insert(Some(name), qualifier_value(&value));
                }
                match qualifier.split_once('=') {
                    Some((name, value)) => open = Some((name.to_lowercase(), value.to_string())),
                    None => {
                        feature.insert(key(&qualifier.to_lowercase()), Value::Flag(true));
                    }
                }
            }
            _ => match open.as_mut() {
                Some((name, value)) => {
                    if !UNSPACED_QUALIFIERS.contains(&name.as_str()) {
                        value.push(' ');
                    }
                    value.push_str(line);
                }
                None => location.push_str(line),
            },
        }
    }

    if let Some((name, value)) = open {
        feature.insert(Some(name), qualifier_value(&value));
    }
    if !location.is_empty() {
        feature.insert(key(gene_keys::BP_RANGE), Value::Text(location));
    }
    feature
}

fn qualifier_value(raw: &str) -> Value {
    Value::Text(raw.replace('"', ""))
}
