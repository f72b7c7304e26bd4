//! GenBank Parser Library
//!
//! A Rust library for converting GenBank flat-file nucleotide entries into
//! structured, JSON-serialisable records.
//!
//! This library provides tools for:
//! - Classifying column-aligned GenBank lines into fields and subfields
//! - Dispatching buffered field content to field-specific converters
//! - Emitting one finished record per `//`-terminated entry
//! - Collecting records in memory, persisting them as JSON, or streaming
//!   them to a callback
//! - Fetching entries from NCBI nuccore by identifier

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod genbank_parser;
        pub mod nuccore_client;
        pub mod record_sink;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{Record, Value, ValueMap};
pub use app::services::genbank_parser::{GenbankParser, ParseResult, ParseStats};
pub use app::services::record_sink::{CallbackSink, DiscardSink, JsonDirectorySink, RecordSink};
pub use config::Config;

use app::services::genbank_parser::ConvertError;

/// Result type alias for the GenBank parser
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for parsing, persisting and fetching GenBank records
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Input violates the positional grammar of the flat-file format
    #[error(
        "Structural error{}{}: {message}",
        describe_line(.line),
        describe_location(.field.as_deref(), .subfield.as_deref(), .record_id.as_deref())
    )]
    Structural {
        /// Input line, when the error is tied to a position
        line: Option<usize>,
        field: Option<String>,
        subfield: Option<String>,
        record_id: Option<String>,
        message: String,
    },

    /// A field converter rejected its buffered lines
    #[error(
        "Conversion of field '{field}'{} failed: {source}",
        describe_location(None, .subfield.as_deref(), .record_id.as_deref())
    )]
    Conversion {
        field: String,
        subfield: Option<String>,
        record_id: Option<String>,
        #[source]
        source: ConvertError,
    },

    /// Remote server answered with a non-success status
    #[error("Fetch from '{url}' failed with HTTP status {status}")]
    Fetch { url: String, status: u16 },

    /// HTTP transport failure
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// Record identifier rejected before fetching
    #[error("Invalid genome identifier: '{id}'")]
    InvalidIdentifier { id: String },

    /// JSON serialisation or deserialisation failed
    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Directory traversal error
    #[error("Directory traversal error: {message}")]
    DirectoryTraversal {
        message: String,
        #[source]
        source: walkdir::Error,
    },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

fn describe_line(line: &Option<usize>) -> String {
    line.map(|line| format!(" at line {}", line))
        .unwrap_or_default()
}

fn describe_location(
    field: Option<&str>,
    subfield: Option<&str>,
    record_id: Option<&str>,
) -> String {
    let mut out = String::new();
    if let Some(field) = field {
        out.push_str(&format!(" in field '{}'", field));
    }
    if let Some(subfield) = subfield {
        out.push_str(&format!(" subfield '{}'", subfield));
    }
    if let Some(id) = record_id {
        out.push_str(&format!(" of record '{}'", id));
    }
    out
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a structural error without field context
    pub fn structural(line: usize, message: impl Into<String>) -> Self {
        Self::Structural {
            line: Some(line),
            field: None,
            subfield: None,
            record_id: None,
            message: message.into(),
        }
    }

    /// Create a structural error pointing at a field/subfield of a record
    pub fn structural_in(
        line: usize,
        field: Option<&str>,
        subfield: Option<&str>,
        record_id: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self::Structural {
            line: Some(line),
            field: field.map(str::to_string),
            subfield: subfield.map(str::to_string),
            record_id: record_id.map(str::to_string),
            message: message.into(),
        }
    }

    /// Create a structural error for a finished record, with no input position
    pub fn structural_record(
        field: Option<&str>,
        record_id: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self::Structural {
            line: None,
            field: field.map(str::to_string),
            subfield: None,
            record_id: record_id.map(str::to_string),
            message: message.into(),
        }
    }

    /// Create a converter error with field context
    pub fn conversion(
        field: impl Into<String>,
        subfield: Option<&str>,
        record_id: Option<&str>,
        source: ConvertError,
    ) -> Self {
        Self::Conversion {
            field: field.into(),
            subfield: subfield.map(str::to_string),
            record_id: record_id.map(str::to_string),
            source,
        }
    }

    /// Create a fetch error for a non-success HTTP status
    pub fn fetch(url: impl Into<String>, status: u16) -> Self {
        Self::Fetch {
            url: url.into(),
            status,
        }
    }

    /// Create an HTTP transport error
    pub fn http(message: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Http {
            message: message.into(),
            source,
        }
    }

    /// Create an invalid identifier error
    pub fn invalid_identifier(id: impl Into<String>) -> Self {
        Self::InvalidIdentifier { id: id.into() }
    }

    /// Create a serialisation error with context
    pub fn serialization(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a directory traversal error
    pub fn directory_traversal(message: impl Into<String>, source: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: message.into(),
            source,
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }

    /// True for errors caused by malformed record content rather than by
    /// the network or the local environment
    pub fn is_content_error(&self) -> bool {
        matches!(self, Self::Structural { .. } | Self::Conversion { .. })
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: "JSON processing failed".to_string(),
            source: error,
        }
    }
}

impl From<walkdir::Error> for Error {
    fn from(error: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: "Directory traversal failed".to_string(),
            source: error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_error_message_names_location() {
        let err = Error::structural_in(
            7,
            Some("features"),
            Some("gene"),
            Some("AB000001"),
            "content line before any field",
        );
        let text = err.to_string();
        assert!(text.contains("line 7"));
        assert!(text.contains("field 'features'"));
        assert!(text.contains("subfield 'gene'"));
        assert!(text.contains("record 'AB000001'"));
        assert!(err.is_content_error());
    }

    #[test]
    fn test_structural_error_without_position_omits_line() {
        let err = Error::structural_record(Some("locus"), None, "record has no identifier");
        let text = err.to_string();
        assert_eq!(
            text,
            "Structural error in field 'locus': record has no identifier"
        );
        assert!(matches!(err, Error::Structural { line: None, .. }));
    }

    #[test]
    fn test_fetch_error_is_not_content_error() {
        let err = Error::fetch("https://example.org/efetch?id=1", 404);
        assert!(!err.is_content_error());
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn test_conversion_error_keeps_source() {
        let err = Error::conversion(
            "version",
            None,
            Some("U49845"),
            ConvertError::MalformedPair {
                text: "GI1293613".to_string(),
            },
        );
        assert!(err.is_content_error());
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("version"));
    }
}
