//! Fields command implementation
//!
//! Prints the converter table: every supported field with the subfields
//! that have their own converter.

use super::shared::{RunStats, setup_logging};
use crate::app::services::genbank_parser::{DispatchTable, FieldEntry};
use crate::cli::args::{FieldsArgs, OutputFormat};
use crate::{Error, Result};
use colored::*;
use std::io::Write;

/// Run the fields command
pub async fn run_fields(args: FieldsArgs) -> Result<RunStats> {
    setup_logging(&args.common)?;
    args.common.validate()?;

    let table = DispatchTable::standard();
    let rendered = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&fields_json(table.entries()))?,
        OutputFormat::Summary => fields_summary(table.entries()),
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", rendered).map_err(|e| Error::io("Failed to write to stdout", e))?;
    Ok(RunStats::default())
}

/// `{field: [subfield, ...]}`
fn fields_json(entries: &[FieldEntry]) -> serde_json::Value {
    let map = entries
        .iter()
        .map(|entry| {
            let subfields = entry.subfields().map(serde_json::Value::from).collect();
            (entry.id.name().to_string(), serde_json::Value::Array(subfields))
        })
        .collect();
    serde_json::Value::Object(map)
}

fn fields_summary(entries: &[FieldEntry]) -> String {
    let mut lines = vec![format!("{}", "Supported fields".bright_green().bold())];
    for entry in entries {
        let subfields: Vec<&str> = entry.subfields().collect();
        let detail = if subfields.is_empty() {
            "-".dimmed().to_string()
        } else {
            subfields.join(", ")
        };
        lines.push(format!("  {:<12} {}", entry.id.name().bright_cyan(), detail));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_json_lists_subfields() {
        let table = DispatchTable::standard();
        let json = fields_json(table.entries());

        assert_eq!(json["locus"], serde_json::json!([]));
        let source = json["source"].as_array().unwrap();
        assert_eq!(source, &vec![serde_json::Value::from("organism")]);
        assert!(json["features"].as_array().unwrap().len() >= 7);
    }

    #[test]
    fn test_fields_summary_names_every_field() {
        colored::control::set_override(false);
        let table = DispatchTable::standard();
        let summary = fields_summary(table.entries());
        for entry in table.entries() {
            assert!(summary.contains(entry.id.name()));
        }
    }
}
