//! Destinations for finished records
//!
//! The parser hands every finished record to a [`RecordSink`]. Sinks
//! compose: a [`CallbackSink`] runs a closure on each record and then passes
//! it on to an inner sink, which may collect, persist or drop it.

use crate::app::models::Record;
use crate::constants::RECORD_FILE_EXTENSION;
use crate::{Error, Result};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Receiver of finished records
pub trait RecordSink {
    /// Take ownership of one finished record
    fn accept(&mut self, record: Record) -> Result<()>;
}

/// Collect-to-memory mode
impl RecordSink for Vec<Record> {
    fn accept(&mut self, record: Record) -> Result<()> {
        self.push(record);
        Ok(())
    }
}

impl<S: RecordSink + ?Sized> RecordSink for &mut S {
    fn accept(&mut self, record: Record) -> Result<()> {
        (**self).accept(record)
    }
}

impl<S: RecordSink + ?Sized> RecordSink for Box<S> {
    fn accept(&mut self, record: Record) -> Result<()> {
        (**self).accept(record)
    }
}

/// Drops every record; used when only a callback is wanted
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardSink;

impl RecordSink for DiscardSink {
    fn accept(&mut self, _record: Record) -> Result<()> {
        Ok(())
    }
}

/// Persist-to-directory mode: one `<locus>.json` file per record
#[derive(Debug, Clone)]
pub struct JsonDirectorySink {
    directory: PathBuf,
    pretty: bool,
    written: Vec<PathBuf>,
}

impl JsonDirectorySink {
    /// Create the sink, creating `directory` if needed
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory).map_err(|e| {
            Error::io(
                format!("Failed to create output directory {}", directory.display()),
                e,
            )
        })?;

        Ok(Self {
            directory,
            pretty: false,
            written: Vec::new(),
        })
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Files written so far, in order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Destination file for a record identifier
    pub fn path_for(&self, identifier: &str) -> PathBuf {
        let stem: String = identifier
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        self.directory
            .join(format!("{}.{}", stem, RECORD_FILE_EXTENSION))
    }
}

impl RecordSink for JsonDirectorySink {
    fn accept(&mut self, record: Record) -> Result<()> {
        let identifier = record
            .identifier()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                Error::structural_record(
                    Some("locus"),
                    None,
                    "record has no locus identifier to name its output file",
                )
            })?;

        let path = self.path_for(identifier);
        let file = File::create(&path)
            .map_err(|e| Error::io(format!("Failed to create {}", path.display()), e))?;
        let writer = BufWriter::new(file);

        if self.pretty {
            serde_json::to_writer_pretty(writer, &record)
        } else {
            serde_json::to_writer(writer, &record)
        }
        .map_err(|e| Error::serialization(format!("Failed to write {}", path.display()), e))?;

        debug!("Wrote record {} to {}", identifier, path.display());
        self.written.push(path);
        Ok(())
    }
}

/// Callback mode: runs `callback` on each record, then forwards it to `inner`
///
/// Extra arguments for the callback are captured by the closure.
pub struct CallbackSink<F, S = DiscardSink> {
    callback: F,
    inner: S,
}

impl<F> CallbackSink<F, DiscardSink>
where
    F: FnMut(&Record) -> Result<()>,
{
    /// Callback only; records are dropped afterwards
    pub fn new(callback: F) -> Self {
        Self {
            callback,
            inner: DiscardSink,
        }
    }
}

impl<F, S> CallbackSink<F, S>
where
    F: FnMut(&Record) -> Result<()>,
    S: RecordSink,
{
    /// Callback followed by another sink (collect or persist)
    pub fn wrapping(callback: F, inner: S) -> Self {
        Self { callback, inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<F, S> RecordSink for CallbackSink<F, S>
where
    F: FnMut(&Record) -> Result<()>,
    S: RecordSink,
{
    fn accept(&mut self, record: Record) -> Result<()> {
        (self.callback)(&record)?;
        self.inner.accept(record)
    }
}
