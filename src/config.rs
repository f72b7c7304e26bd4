//! Configuration management and validation.
//!
//! Provides the column layout of the flat-file format, remote fetch settings
//! and output preferences. Values are loaded once at startup from a JSON
//! file (explicit path, then the platform config directory) and fall back to
//! built-in defaults.

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_FLAT_FIELD,
    DEFAULT_LONG_FIELD, DEFAULT_LONG_SEPARATOR_COLUMN, DEFAULT_LONG_SUBFIELD_COLUMN,
    DEFAULT_NUCCORE_URL, DEFAULT_RECORD_END_MARKER, DEFAULT_SHORT_SEPARATOR_COLUMN,
    DEFAULT_SHORT_SUBFIELD_COLUMN, DEFAULT_SHORT_SUBFIELD_SLACK, IDS_PLACEHOLDER,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Column layout consumed by the line classifier
    pub schema: SchemaConfig,

    /// Remote retrieval settings
    pub fetch: FetchConfig,

    /// Output preferences
    pub output: OutputConfig,
}

/// Column layout of the flat-file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Line prefix terminating a record
    pub record_end_marker: String,

    /// Content column for ordinary fields
    pub short_separator_column: usize,

    /// Content column for the feature table
    pub long_separator_column: usize,

    /// Column checked for a subfield label in ordinary fields
    pub short_subfield_column: usize,

    /// Extra columns an ordinary subfield label may be indented by
    pub short_subfield_slack: usize,

    /// Column checked for a feature key in the feature table
    pub long_subfield_column: usize,

    /// Field using the long layout
    pub long_field: String,

    /// Field without subfields or label column
    pub flat_field: String,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            record_end_marker: DEFAULT_RECORD_END_MARKER.to_string(),
            short_separator_column: DEFAULT_SHORT_SEPARATOR_COLUMN,
            long_separator_column: DEFAULT_LONG_SEPARATOR_COLUMN,
            short_subfield_column: DEFAULT_SHORT_SUBFIELD_COLUMN,
            short_subfield_slack: DEFAULT_SHORT_SUBFIELD_SLACK,
            long_subfield_column: DEFAULT_LONG_SUBFIELD_COLUMN,
            long_field: DEFAULT_LONG_FIELD.to_string(),
            flat_field: DEFAULT_FLAT_FIELD.to_string(),
        }
    }
}

/// Remote retrieval settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// URL template; `{ids}` is replaced by the comma-joined identifiers
    pub nuccore_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            nuccore_url: DEFAULT_NUCCORE_URL.to_string(),
            timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }
}

/// Output preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output
    pub pretty: bool,

    /// Persist one file per record into this directory instead of printing
    pub directory: Option<PathBuf>,
}

impl Config {
    /// Default configuration file location (`<config dir>/gbparse/config.json`)
    pub fn default_config_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or_else(|| Error::configuration("Could not determine config directory"))
    }

    /// Read configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::file_not_found(path.display().to_string()));
        }
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::io(format!("Failed to read config file {}", path.display()), e)
        })?;
        let config: Config = serde_json::from_str(&text).map_err(|e| {
            Error::serialization(format!("Invalid config file {}", path.display()), e)
        })?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration: explicit file, then default location, then defaults
    ///
    /// An explicit path must exist; the default location is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => {
                info!("Using config file: {}", path.display());
                Self::from_file(path)?
            }
            None => match Self::default_config_path() {
                Ok(path) if path.exists() => {
                    info!("Using config file: {}", path.display());
                    Self::from_file(&path)?
                }
                _ => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let schema = &self.schema;

        if schema.record_end_marker.is_empty() {
            return Err(Error::configuration("Record end marker cannot be empty"));
        }

        if schema.short_separator_column <= schema.short_subfield_column {
            return Err(Error::configuration(format!(
                "Short separator column ({}) must be greater than short subfield column ({})",
                schema.short_separator_column, schema.short_subfield_column
            )));
        }

        if schema.short_separator_column <= schema.short_subfield_column + schema.short_subfield_slack
        {
            return Err(Error::configuration(format!(
                "Short subfield labels may start up to column {}, which reaches the separator column ({})",
                schema.short_subfield_column + schema.short_subfield_slack,
                schema.short_separator_column
            )));
        }

        if schema.long_separator_column <= schema.long_subfield_column {
            return Err(Error::configuration(format!(
                "Long separator column ({}) must be greater than long subfield column ({})",
                schema.long_separator_column, schema.long_subfield_column
            )));
        }

        if schema.long_field.eq_ignore_ascii_case(&schema.flat_field) {
            return Err(Error::configuration(format!(
                "Field '{}' cannot use both the long and the flat layout",
                schema.long_field
            )));
        }

        if !self.fetch.nuccore_url.contains(IDS_PLACEHOLDER) {
            return Err(Error::configuration(format!(
                "Fetch URL template must contain '{}'",
                IDS_PLACEHOLDER
            )));
        }

        if self.fetch.timeout_secs == 0 {
            return Err(Error::configuration(
                "Fetch timeout must be greater than 0 seconds",
            ));
        }

        Ok(())
    }

    /// Use a different record terminator
    pub fn with_end_marker(mut self, marker: impl Into<String>) -> Self {
        self.schema.record_end_marker = marker.into();
        self
    }

    /// Pretty-print JSON output
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.output.pretty = pretty;
        self
    }

    /// Persist records into a directory
    pub fn with_output_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.output.directory = Some(directory.into());
        self
    }

    /// Use a different fetch URL template
    pub fn with_nuccore_url(mut self, url: impl Into<String>) -> Self {
        self.fetch.nuccore_url = url.into();
        self
    }
}
