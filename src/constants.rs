//! Application constants for the GenBank parser
//!
//! This module contains the default layout columns of the GenBank flat-file
//! format, remote fetch defaults and file naming conventions.

// =============================================================================
// Flat-file Layout
// =============================================================================

/// Line prefix terminating one GenBank entry
pub const DEFAULT_RECORD_END_MARKER: &str = "//";

/// Column where content starts for ordinary fields (`LOCUS       ...`)
pub const DEFAULT_SHORT_SEPARATOR_COLUMN: usize = 12;

/// Column where content starts inside the feature table
pub const DEFAULT_LONG_SEPARATOR_COLUMN: usize = 21;

/// Column holding the first letter of an ordinary subfield (`  ORGANISM`)
pub const DEFAULT_SHORT_SUBFIELD_COLUMN: usize = 2;

/// Extra indentation accepted for an ordinary subfield label (`   PUBMED`)
pub const DEFAULT_SHORT_SUBFIELD_SLACK: usize = 1;

/// Column holding the first letter of a feature key (`     gene`)
pub const DEFAULT_LONG_SUBFIELD_COLUMN: usize = 5;

/// Field using the feature-table columns
pub const DEFAULT_LONG_FIELD: &str = "features";

/// Field whose lines never open subfields and carry no label column
pub const DEFAULT_FLAT_FIELD: &str = "origin";

// =============================================================================
// Record Layout
// =============================================================================

/// Field holding the record identifier under its null subfield
pub const IDENTIFIER_FIELD: &str = "locus";

/// Record key collecting converter output that is not tied to one field
pub const CONTENT_KEY: &str = "content";

/// Keys inside the content map
pub mod content_keys {
    pub const SOURCE: &str = "source";
    pub const ORGANISM: &str = "organism";
    pub const SOURCE_FEATURE: &str = "source_feature";
    pub const GENES: &str = "genes";
    pub const SEQUENCE: &str = "sequence";
}

/// Keys inside one gene entry
pub mod gene_keys {
    pub const DONE: &str = "_done";
    pub const CDS_INCLUDED: &str = "cds_included";
    pub const RNA_INCLUDED: &str = "rna_included";
    pub const RNA_TYPE: &str = "rna_type";
    pub const BP_RANGE: &str = "bp_range";
}

/// Feature qualifier whose continuation lines join without a space
pub const UNSPACED_QUALIFIERS: &[&str] = &["translation"];

// =============================================================================
// Remote Fetch
// =============================================================================

/// Placeholder replaced by the comma-joined identifier list
pub const IDS_PLACEHOLDER: &str = "{ids}";

/// NCBI E-utilities efetch endpoint returning GenBank text
pub const DEFAULT_NUCCORE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/efetch.fcgi?db=nuccore&id={ids}&rettype=gb&retmode=text";

/// HTTP timeout for a fetch request
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 60;

// =============================================================================
// Files
// =============================================================================

/// Extension of persisted records
pub const RECORD_FILE_EXTENSION: &str = "json";

/// Extensions recognised when walking input directories
pub const GENBANK_EXTENSIONS: &[&str] = &["gb", "gbk", "gbff", "gbf", "genbank"];

/// Application directory under the platform config directory
pub const CONFIG_DIR_NAME: &str = "gbparse";

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "config.json";
