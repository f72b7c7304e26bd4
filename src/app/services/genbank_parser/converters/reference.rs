//! Converters for `REFERENCE` blocks
//!
//! Each `REFERENCE` line opens a new entry in the record's `reference`
//! list; its subfields (AUTHORS, TITLE, JOURNAL, ...) fill in the last
//! entry.

use super::{Conversion, ConvertError, ConvertResult, join_spaced, key};
use crate::app::models::{Record, Value, ValueMap};
use crate::app::services::genbank_parser::diagnostics::Diagnostics;
use regex::Regex;
use std::sync::LazyLock;

const REFERENCE_FIELD: &str = "reference";

static AUTHOR_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r",\s+(?:and\s+)?|\s+and\s+").expect("author separator pattern is valid")
});

/// `REFERENCE` line: append `{info: ...}` to the reference list
pub fn reference(lines: &[String], record: &mut Record, _diagnostics: &mut Diagnostics) -> ConvertResult {
    let mut entry = ValueMap::new();
    entry.insert(key("info"), Value::Text(join_spaced(lines)));

    record
        .entry_or_insert_with(REFERENCE_FIELD, || Value::List(Vec::new()))
        .as_list_mut()
        .ok_or_else(|| ConvertError::UnexpectedShape {
            key: REFERENCE_FIELD.to_string(),
        })?
        .push(Value::Map(entry));

    Ok(Conversion::AlreadyApplied)
}

/// `AUTHORS`: `Last,I.` names split on commas and the final `and`
pub fn authors(lines: &[String], record: &mut Record, _diagnostics: &mut Diagnostics) -> ConvertResult {
    let joined = join_spaced(lines);
    let names = AUTHOR_SEPARATOR
        .split(&joined)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| match name.split_once(',') {
            Some((last, initials)) => Value::Text(format!("{} {}", last, initials)),
            None => Value::text(name),
        })
        .collect();

    attach(record, "authors", Value::List(names))
}

pub fn consortium(lines: &[String], record: &mut Record, _diagnostics: &mut Diagnostics) -> ConvertResult {
    attach(record, "consortium", Value::Text(join_spaced(lines)))
}

pub fn title(lines: &[String], record: &mut Record, _diagnostics: &mut Diagnostics) -> ConvertResult {
    attach(record, "title", Value::Text(join_spaced(lines)))
}

pub fn journal(lines: &[String], record: &mut Record, _diagnostics: &mut Diagnostics) -> ConvertResult {
    attach(record, "journal", Value::Text(join_spaced(lines)))
}

pub fn pubmed(lines: &[String], record: &mut Record, _diagnostics: &mut Diagnostics) -> ConvertResult {
    attach(record, "pubmed", Value::Text(join_spaced(lines)))
}

pub fn medline(lines: &[String], record: &mut Record, _diagnostics: &mut Diagnostics) -> ConvertResult {
    attach(record, "medline", Value::Text(join_spaced(lines)))
}

pub fn remark(lines: &[String], record: &mut Record, _diagnostics: &mut Diagnostics) -> ConvertResult {
    attach(record, "remark", Value::Text(join_spaced(lines)))
}

/// Store `value` under `name` in the most recent reference entry
fn attach(record: &mut Record, name: &str, value: Value) -> ConvertResult {
    let entry = record
        .get_mut(REFERENCE_FIELD)
        .and_then(Value::as_list_mut)
        .and_then(|entries| entries.last_mut())
        .ok_or(ConvertError::NoOpenEntry {
            entry: REFERENCE_FIELD,
        })?
        .as_map_mut()
        .ok_or_else(|| ConvertError::UnexpectedShape {
            key: REFERENCE_FIELD.to_string(),
        })?;

    entry.insert(key(name), value);
    Ok(Conversion::AlreadyApplied)
}
