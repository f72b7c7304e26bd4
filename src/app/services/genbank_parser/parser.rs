//! Core GenBank parser implementation
//!
//! This module drives the line loop: each input line is classified, routed
//! to the [`ParseState`], and every end marker hands a finished record to
//! the configured [`RecordSink`].

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, trace};

use super::accumulator::{FlushOutcome, ParseState};
use super::classifier::{LineKind, classify};
use super::diagnostics::{DiagnosticKind, Diagnostics};
use super::dispatch::DispatchTable;
use super::schema::Schema;
use super::stats::{ParseResult, ParseStats};
use crate::app::models::Record;
use crate::app::services::record_sink::RecordSink;
use crate::config::Config;
use crate::{Error, Result};

/// GenBank flat-file parser
///
/// The parser itself is immutable: every call to [`parse`](Self::parse)
/// builds its own [`ParseState`], so one parser can serve any number of
/// inputs, including from several threads at once.
#[derive(Debug, Clone)]
pub struct GenbankParser {
    schema: Schema,
    table: Arc<DispatchTable>,
}

impl GenbankParser {
    /// Create a parser with the standard converter table
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            table: DispatchTable::standard(),
        }
    }

    /// Create a parser from the schema section of the configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(Schema::from_config(&config.schema))
    }

    /// Replace the converter table
    pub fn with_table(mut self, table: Arc<DispatchTable>) -> Self {
        self.table = table;
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn table(&self) -> &DispatchTable {
        &self.table
    }

    /// Parse every record in `reader`, handing each finished record to `sink`
    ///
    /// Structural and conversion errors stop the parse; records already
    /// handed to the sink stay there. A record without an end marker at the
    /// end of input is discarded with a diagnostic.
    pub fn parse<R, S>(&self, reader: R, sink: &mut S) -> Result<ParseStats>
    where
        R: BufRead,
        S: RecordSink + ?Sized,
    {
        let mut state = ParseState::new();
        let mut diagnostics = Diagnostics::new();
        let mut stats = ParseStats::new();

        for (index, line) in reader.lines().enumerate() {
            let line_number = index + 1;
            let line = line.map_err(|e| {
                Error::io(format!("Failed to read input line {}", line_number), e)
            })?;
            stats.lines_read += 1;

            let line = line.strip_suffix('\r').unwrap_or(&line);
            if line.trim().is_empty() {
                continue;
            }

            let kind = classify(line, state.current_field(), &self.schema).map_err(|fault| {
                Error::structural_in(line_number, None, None, state.record_id(), fault.to_string())
            })?;
            trace!(line = line_number, kind = ?kind, "Classified line");

            match kind {
                LineKind::RecordEnd => {
                    self.flush(&mut state, &mut diagnostics, &mut stats, line_number)?;
                    if state.is_pristine() {
                        debug!(line = line_number, "End marker without record content");
                        continue;
                    }

                    let record = state.finish();
                    stats.records_emitted += 1;
                    debug!(
                        line = line_number,
                        id = record.identifier().unwrap_or("-"),
                        fields = record.len(),
                        "Finished record"
                    );
                    sink.accept(record)?;
                }
                LineKind::NewField(name) => {
                    self.flush(&mut state, &mut diagnostics, &mut stats, line_number)?;
                    let payload = self.schema.layout(Some(&name)).payload(line);
                    state.open_field(name);
                    state.push_payload(payload);
                }
                LineKind::NewSubfield(name) => {
                    self.flush(&mut state, &mut diagnostics, &mut stats, line_number)?;
                    let payload = self.schema.layout(state.current_field()).payload(line);
                    state.open_subfield(name);
                    state.push_payload(payload);
                }
                LineKind::Content => {
                    let payload = self.schema.layout(state.current_field()).payload(line);
                    state.push_payload(payload);
                }
            }
        }

        if !state.is_pristine() {
            diagnostics.locate(
                stats.lines_read,
                state.current_field(),
                state.current_subfield(),
            );
            diagnostics.report(
                DiagnosticKind::PartialRecordDiscarded,
                format!(
                    "input ended before '{}'; partial record {} discarded",
                    self.schema.end_marker(),
                    state.record_id().unwrap_or("without identifier")
                ),
            );
        }

        stats.diagnostics = diagnostics.into_entries();
        info!(
            "Parsed {} records from {} lines ({} diagnostics)",
            stats.records_emitted,
            stats.lines_read,
            stats.diagnostics.len()
        );
        Ok(stats)
    }

    fn flush(
        &self,
        state: &mut ParseState,
        diagnostics: &mut Diagnostics,
        stats: &mut ParseStats,
        line: usize,
    ) -> Result<()> {
        if state.flush(&self.table, diagnostics, line)? == FlushOutcome::Flushed {
            stats.fields_flushed += 1;
        }
        Ok(())
    }

    /// Parse in-memory text
    pub fn parse_str<S>(&self, text: &str, sink: &mut S) -> Result<ParseStats>
    where
        S: RecordSink + ?Sized,
    {
        self.parse(text.as_bytes(), sink)
    }

    /// Parse into memory and return the records with statistics
    pub fn parse_records<R: BufRead>(&self, reader: R) -> Result<ParseResult> {
        let mut records: Vec<Record> = Vec::new();
        let stats = self.parse(reader, &mut records)?;
        Ok(ParseResult { records, stats })
    }

    /// Parse a GenBank file from disk
    pub fn parse_file<S>(&self, path: &Path, sink: &mut S) -> Result<ParseStats>
    where
        S: RecordSink + ?Sized,
    {
        info!("Parsing GenBank file: {}", path.display());

        if !path.exists() {
            return Err(Error::file_not_found(path.display().to_string()));
        }
        let file = File::open(path)
            .map_err(|e| Error::io(format!("Failed to open {}", path.display()), e))?;

        self.parse(BufReader::new(file), sink)
    }
}

impl Default for GenbankParser {
    fn default() -> Self {
        Self::new(Schema::default())
    }
}
