//! Field converters
//!
//! A converter turns the buffered lines of one field or subfield into a
//! [`Value`]. It either hands the value back for the accumulator to merge
//! under the field name ([`Conversion::Merge`]) or writes into the record
//! itself ([`Conversion::AlreadyApplied`]) when the value belongs to a
//! deeper structure such as the reference or gene lists.
//!
//! - [`header`] - single-field entries (LOCUS, VERSION, DBLINK, ...)
//! - [`reference`] - REFERENCE and its subfields
//! - [`features`] - the feature table and the gene/CDS/RNA list
//! - [`sequence`] - SOURCE organism data and the ORIGIN sequence

pub mod features;
pub mod header;
pub mod reference;
pub mod sequence;

use super::diagnostics::{DiagnosticKind, Diagnostics};
use crate::app::models::{Record, Value, ValueMap};
use crate::constants::CONTENT_KEY;

/// Outcome of a successful conversion
#[derive(Debug, Clone, PartialEq)]
pub enum Conversion {
    /// Store this value under the current field (and subfield)
    Merge(Value),
    /// The converter already wrote into the record
    AlreadyApplied,
}

/// Converter failure on lines it could not interpret
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConvertError {
    #[error("expected at least {expected} tokens, found {found}")]
    MissingTokens { expected: usize, found: usize },

    #[error("expected 'key:value', found '{text}'")]
    MalformedPair { text: String },

    #[error("no open {entry} entry to attach to")]
    NoOpenEntry { entry: &'static str },

    #[error("value stored under '{key}' has an unexpected shape")]
    UnexpectedShape { key: String },
}

pub type ConvertResult = Result<Conversion, ConvertError>;

/// Signature shared by every converter, including the fallback
pub type Converter = fn(&[String], &mut Record, &mut Diagnostics) -> ConvertResult;

/// Fallback for fields and subfields without a registered converter
///
/// Discards the content and reports it.
pub fn unparsed(lines: &[String], _record: &mut Record, diagnostics: &mut Diagnostics) -> ConvertResult {
    diagnostics.report(
        DiagnosticKind::UnknownField,
        format!(
            "no converter registered; {} line(s) discarded",
            lines.len()
        ),
    );
    Ok(Conversion::AlreadyApplied)
}

/// Lines joined with single spaces, skipping empty ones
pub(crate) fn join_spaced(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whitespace-separated tokens across all lines
pub(crate) fn tokens(lines: &[String]) -> Vec<&str> {
    lines.iter().flat_map(|line| line.split_whitespace()).collect()
}

/// The shared `content` map, created on first use
pub(crate) fn content_map(record: &mut Record) -> Result<&mut ValueMap, ConvertError> {
    record
        .entry_or_insert_with(CONTENT_KEY, Value::empty_map)
        .as_map_mut()
        .ok_or_else(|| ConvertError::UnexpectedShape {
            key: CONTENT_KEY.to_string(),
        })
}

/// A list stored under `key` in `map`, created on first use
pub(crate) fn list_in<'a>(
    map: &'a mut ValueMap,
    key: &str,
) -> Result<&'a mut Vec<Value>, ConvertError> {
    map.entry(Some(key.to_string()))
        .or_insert_with(|| Value::List(Vec::new()))
        .as_list_mut()
        .ok_or_else(|| ConvertError::UnexpectedShape {
            key: key.to_string(),
        })
}

pub(crate) fn key(name: &str) -> Option<String> {
    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_join_spaced_skips_empty_lines() {
        assert_eq!(join_spaced(&lines(&["a", "", "  b "])), "a b");
    }

    #[test]
    fn test_unparsed_reports_and_discards() {
        let mut record = Record::new();
        let mut diagnostics = Diagnostics::new();
        let result = unparsed(&lines(&["x", "y"]), &mut record, &mut diagnostics).unwrap();
        assert_eq!(result, Conversion::AlreadyApplied);
        assert!(record.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.entries()[0].kind, DiagnosticKind::UnknownField);
    }

    #[test]
    fn test_content_map_rejects_non_map() {
        let mut record = Record::new();
        record.insert(CONTENT_KEY, Value::text("oops"));
        assert!(matches!(
            content_map(&mut record),
            Err(ConvertError::UnexpectedShape { .. })
        ));
    }
}
