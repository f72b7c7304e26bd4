//! Converters for single-block header fields

use super::{Conversion, ConvertError, ConvertResult, join_spaced, key, tokens};
use crate::app::models::{Record, Value, ValueMap};
use crate::app::services::genbank_parser::diagnostics::Diagnostics;
use chrono::NaiveDate;

/// Free text: lines joined with single spaces
pub fn text(lines: &[String], _record: &mut Record, _diagnostics: &mut Diagnostics) -> ConvertResult {
    Ok(Conversion::Merge(Value::Text(join_spaced(lines))))
}

/// `LOCUS` line: identifier, size and the remaining tokens as key/value pairs
///
/// `AB000001 1000 bp DNA linear` becomes
/// `{null: AB000001, "size [bp]": 1000, DNA: linear}`. An unpaired trailing
/// token is kept as a key with empty text, and a trailing `DD-MON-YYYY`
/// date is also stored as ISO `date`.
pub fn locus(lines: &[String], _record: &mut Record, _diagnostics: &mut Diagnostics) -> ConvertResult {
    let tokens = tokens(lines);
    if tokens.len() < 3 {
        return Err(ConvertError::MissingTokens {
            expected: 3,
            found: tokens.len(),
        });
    }

    let mut locus = ValueMap::new();
    locus.insert(None, Value::text(tokens[0]));
    locus.insert(key(&format!("size [{}]", tokens[2])), Value::text(tokens[1]));

    for pair in tokens[3..].chunks(2) {
        match pair {
            [name, value] => {
                locus.insert(key(name), Value::text(*value));
            }
            [name] => {
                locus.insert(key(name), Value::text(""));
            }
            _ => {}
        }
    }

    if tokens.len() > 3 {
        if let Some(date) = tokens.last().and_then(|last| parse_genbank_date(last)) {
            locus.insert(key("date"), Value::text(date.format("%Y-%m-%d").to_string()));
        }
    }

    Ok(Conversion::Merge(Value::Map(locus)))
}

/// GenBank dates look like `21-JUN-1999`
fn parse_genbank_date(token: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(token, "%d-%b-%Y").ok()
}

/// `VERSION` line: accession.version plus optional `key:value` tokens
pub fn version(lines: &[String], _record: &mut Record, _diagnostics: &mut Diagnostics) -> ConvertResult {
    let tokens = tokens(lines);
    let Some((first, rest)) = tokens.split_first() else {
        return Err(ConvertError::MissingTokens {
            expected: 1,
            found: 0,
        });
    };

    let mut version = ValueMap::new();
    version.insert(None, Value::text(*first));
    for token in rest {
        let (name, value) = token
            .split_once(':')
            .ok_or_else(|| ConvertError::MalformedPair {
                text: token.to_string(),
            })?;
        version.insert(key(name), Value::text(value));
    }

    Ok(Conversion::Merge(Value::Map(version)))
}

/// `DBLINK` block: one `Database: id` pair per line
///
/// A line without a colon continues the previous pair's value.
pub fn dblink(lines: &[String], _record: &mut Record, _diagnostics: &mut Diagnostics) -> ConvertResult {
    let mut links = ValueMap::new();
    let mut last: Option<String> = None;

    for line in lines {
        let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            continue;
        }
        match compact.split_once(':') {
            Some((name, value)) => {
                links.insert(key(name), Value::text(value));
                last = Some(name.to_string());
            }
            None => {
                let previous = last
                    .as_ref()
                    .and_then(|name| links.get_mut(&Some(name.clone())))
                    .ok_or_else(|| ConvertError::MalformedPair {
                        text: line.clone(),
                    })?;
                if let Value::Text(value) = previous {
                    value.push_str(&compact);
                }
            }
        }
    }

    Ok(Conversion::Merge(Value::Map(links)))
}

/// `BASE COUNT` line: `count base` pairs keyed by base
pub fn base_count(lines: &[String], _record: &mut Record, _diagnostics: &mut Diagnostics) -> ConvertResult {
    let tokens = tokens(lines);
    // The field label is "BASE COUNT"; only "BASE" is the field name, so
    // "COUNT" may lead the payload when the label column is narrow
    let tokens = match tokens.first() {
        Some(first) if first.eq_ignore_ascii_case("count") => &tokens[1..],
        _ => &tokens[..],
    };

    let mut counts = ValueMap::new();
    for pair in tokens.chunks(2) {
        match pair {
            [count, base] => {
                counts.insert(key(base), Value::text(*count));
            }
            [stray] => {
                return Err(ConvertError::MalformedPair {
                    text: stray.to_string(),
                });
            }
            _ => {}
        }
    }

    Ok(Conversion::Merge(Value::Map(counts)))
}
