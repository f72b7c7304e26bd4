//! Test utilities and fixtures for GenBank parser testing
//!
//! This module provides common fixtures and helper functions used across
//! the parser test modules.

use crate::app::models::Record;
use crate::app::services::genbank_parser::{Diagnostics, GenbankParser, ParseResult};

mod converter_tests;
mod feature_tests;

/// Two complete records: a yeast entry with references and genes, and a
/// small plasmid entry with DBLINK, BASE COUNT and an unregistered field
pub const TWO_RECORDS: &str = include_str!("../../../../../tests/data/two_records.gb");

/// Minimal LOCUS line used by the scenario tests
pub const LOCUS_LINE: &str = "LOCUS       AB000001   1000 bp    DNA     linear";

/// Parse text with the default parser, panicking on error
pub fn parse(text: &str) -> ParseResult {
    GenbankParser::default()
        .parse_records(text.as_bytes())
        .expect("fixture should parse")
}

/// Join lines with newlines and a trailing newline
pub fn text(lines: &[&str]) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Owned buffered lines for calling converters directly
pub fn lines(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

/// Run a converter against a fresh record
pub fn convert(
    converter: crate::app::services::genbank_parser::Converter,
    raw: &[&str],
) -> (crate::app::services::genbank_parser::ConvertResult, Record, Diagnostics) {
    let mut record = Record::new();
    let mut diagnostics = Diagnostics::new();
    let result = converter(&lines(raw), &mut record, &mut diagnostics);
    (result, record, diagnostics)
}

/// A feature line: key at column 5, location at column 21
pub fn feature(key: &str, location: &str) -> String {
    format!("     {:<16}{}", key, location)
}

/// A feature qualifier line at column 21
pub fn qualifier(text: &str) -> String {
    format!("{}{}", " ".repeat(21), text)
}
