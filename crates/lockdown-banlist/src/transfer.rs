//! Ban list export and import files.
//!
//! Exports are plain text (one ID per line) or, for paths ending in
//! `.json`, a `{"steamIds": [...]}` document. Imports accept either JSON
//! shape (a bare array or the export object) and fall back to plain lines
//! for anything else.

use crate::error::{BanListError, Result};
use lockdown_gvas::record::is_identifier_shaped;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Layout of an export file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// One ID per line
    Plain,
    /// `{"steamIds": [...]}`, pretty-printed
    Json,
}

impl ExportFormat {
    /// Format implied by the file extension (`.json`, any case, is JSON).
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Plain,
        }
    }
}

/// JSON export document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanListExport {
    /// Exported identifiers in ban list order
    #[serde(rename = "steamIds")]
    pub steam_ids: Vec<String>,
}

/// Render `identifiers` in `format`.
///
/// # Errors
///
/// Returns `Json` if the document cannot be encoded.
pub fn render_export(identifiers: &[String], format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Plain => Ok(identifiers.join("\n")),
        ExportFormat::Json => {
            let document = BanListExport {
                steam_ids: identifiers.to_vec(),
            };
            Ok(serde_json::to_string_pretty(&document)?)
        }
    }
}

/// Write `identifiers` to `path`, picking the format from its extension.
///
/// Missing parent directories are created. Returns the number of
/// identifiers written.
///
/// # Errors
///
/// Returns `Io` when the directory or file cannot be written.
pub fn export_to_file(identifiers: &[String], path: &Path) -> Result<usize> {
    let format = ExportFormat::from_path(path);
    let content = render_export(identifiers, format)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| BanListError::io(parent, e))?;
    }
    fs::write(path, content).map_err(|e| BanListError::io(path, e))?;

    info!(path = %path.display(), count = identifiers.len(), ?format, "exported ban list");
    Ok(identifiers.len())
}

/// Identifiers listed in an import file, before any filtering.
///
/// JSON arrays and objects with a `steamIds` array are read as JSON; an
/// object without one yields nothing. Any other text, including a lone
/// ID that happens to parse as a JSON number, is read one ID per line.
pub fn parse_import(text: &str) -> Vec<String> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(values)) => values.into_iter().map(value_to_id).collect(),
        Ok(Value::Object(mut object)) => match object.remove("steamIds") {
            Some(Value::Array(values)) => values.into_iter().map(value_to_id).collect(),
            _ => {
                debug!("JSON object without a steamIds array");
                Vec::new()
            }
        },
        _ => text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
    }
}

fn value_to_id(value: Value) -> String {
    match value {
        Value::String(id) => id,
        other => other.to_string(),
    }
}

/// Trim, deduplicate and shape-check identifiers before they are added.
///
/// Entries that are not Steam64-shaped are dropped; order is kept.
pub fn prepare_additions<S: AsRef<str>>(identifiers: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    identifiers
        .iter()
        .map(|id| id.as_ref().trim())
        .filter(|id| !id.is_empty() && seen.insert(*id))
        .filter(|id| is_identifier_shaped(id.as_bytes()))
        .map(str::to_string)
        .collect()
}
