//! Parse state, boundary flushing and record finalisation
//!
//! [`ParseState`] holds everything that changes while one record is being
//! read. Each field or subfield boundary flushes the buffered payload lines
//! through the dispatch table; the end marker flushes one last time and
//! [`ParseState::finish`] hands back the finished record with the state
//! reset for the next one.

use super::converters::Conversion;
use super::diagnostics::Diagnostics;
use super::dispatch::{DispatchTable, Route};
use crate::app::models::{Record, Value, ValueMap};
use crate::{Error, Result};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Result of a successful [`ParseState::flush`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Buffered lines were converted and merged
    Flushed,
    /// No field has been opened since the last record; nothing to do
    NothingOpen,
}

/// Mutable state of the record currently being read
#[derive(Debug, Default)]
pub struct ParseState {
    current_field: Option<String>,
    current_subfield: Option<String>,
    buffered_lines: Vec<String>,
    record: Record,
    /// `(field, subfield)` slots already holding a list of repeated values
    repeated: HashSet<(String, Option<String>)>,
}

impl ParseState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a top-level field; any open subfield is closed
    pub fn open_field(&mut self, field: String) {
        self.current_field = Some(field);
        self.current_subfield = None;
        self.buffered_lines.clear();
    }

    /// Start a subfield of the open field
    pub fn open_subfield(&mut self, subfield: String) {
        self.current_subfield = Some(subfield);
        self.buffered_lines.clear();
    }

    /// Buffer the payload of one line for the open field or subfield
    pub fn push_payload(&mut self, payload: &str) {
        self.buffered_lines.push(payload.trim().to_string());
    }

    pub fn current_field(&self) -> Option<&str> {
        self.current_field.as_deref()
    }

    pub fn current_subfield(&self) -> Option<&str> {
        self.current_subfield.as_deref()
    }

    pub fn buffered_lines(&self) -> &[String] {
        &self.buffered_lines
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Identifier of the record being built, once LOCUS has been flushed
    pub fn record_id(&self) -> Option<&str> {
        self.record.identifier()
    }

    /// True while nothing has been opened or stored since the last reset
    pub fn is_pristine(&self) -> bool {
        self.current_field.is_none() && self.buffered_lines.is_empty() && self.record.is_empty()
    }

    /// Convert the buffered lines and merge the result into the record
    ///
    /// With an empty buffer this succeeds only when no field has been
    /// opened yet. `line` is the input line that triggered the flush and is
    /// used for diagnostics and error context.
    pub fn flush(
        &mut self,
        table: &DispatchTable,
        diagnostics: &mut Diagnostics,
        line: usize,
    ) -> Result<FlushOutcome> {
        let Some(field) = self.current_field.clone() else {
            if self.buffered_lines.is_empty() {
                return Ok(FlushOutcome::NothingOpen);
            }
            return Err(Error::structural(
                line,
                "buffered content without an open field",
            ));
        };

        if self.buffered_lines.is_empty() {
            return Err(Error::structural_in(
                line,
                Some(&field),
                self.current_subfield.as_deref(),
                self.record_id(),
                "flush with no buffered content for an open field",
            ));
        }

        let subfield = self.current_subfield.clone();
        let lines = std::mem::take(&mut self.buffered_lines);
        let resolution = table.resolve(&field, subfield.as_deref());
        trace!(
            field = %field,
            subfield = subfield.as_deref().unwrap_or("-"),
            route = ?resolution.route,
            lines = lines.len(),
            "Flushing buffered lines"
        );

        diagnostics.locate(line, Some(&field), subfield.as_deref());
        let conversion = (resolution.converter)(&lines, &mut self.record, diagnostics)
            .map_err(|source| {
                Error::conversion(&field, subfield.as_deref(), self.record_id(), source)
            })?;

        match conversion {
            Conversion::Merge(value) => {
                self.merge(&field, subfield.as_deref(), value);
            }
            Conversion::AlreadyApplied => {
                if resolution.route != Route::Fallback {
                    debug!(field = %field, "Converter wrote into the record directly");
                }
            }
        }

        Ok(FlushOutcome::Flushed)
    }

    /// Store a converter value under `field`, or under `field.subfield`
    ///
    /// A flat value already stored for the field is kept under the `None`
    /// key when the first subfield value arrives. A slot written a second
    /// time becomes a list holding every value in input order.
    fn merge(&mut self, field: &str, subfield: Option<&str>, value: Value) {
        let slot = (field.to_string(), subfield.map(str::to_string));

        let Some(subfield) = subfield else {
            match self.record.get_mut(field) {
                Some(existing) => {
                    let collected = !self.repeated.insert(slot);
                    collect_repeat(existing, value, collected);
                    debug!(field = %field, "Collected repeated field value");
                }
                None => {
                    self.record.insert(field, value);
                }
            }
            return;
        };

        let key = Some(subfield.to_string());
        match self.record.get_mut(field) {
            Some(Value::Map(map)) => match map.get_mut(&key) {
                Some(existing) => {
                    let collected = !self.repeated.insert(slot);
                    collect_repeat(existing, value, collected);
                    debug!(field = %field, subfield = %subfield, "Collected repeated subfield value");
                }
                None => {
                    map.insert(key, value);
                }
            },
            Some(existing) => {
                let flat = std::mem::replace(existing, Value::empty_map());
                let mut map = ValueMap::new();
                map.insert(None, flat);
                map.insert(key, value);
                *existing = Value::Map(map);
            }
            None => {
                let mut map = ValueMap::new();
                map.insert(key, value);
                self.record.insert(field, Value::Map(map));
            }
        }
    }

    /// Take the finished record and reset to the initial state
    pub fn finish(&mut self) -> Record {
        let state = std::mem::take(self);
        state.record
    }
}

/// Append `value` to a slot seen before
///
/// `collected` is true once the slot already holds the repeat list.
fn collect_repeat(slot: &mut Value, value: Value, collected: bool) {
    if collected {
        if let Value::List(items) = slot {
            items.push(value);
            return;
        }
    }
    let first = std::mem::replace(slot, Value::List(Vec::new()));
    *slot = Value::List(vec![first, value]);
}
