//! Program export reading.
//!
//! The export is a JSON array of session objects. Exports produced by the
//! program tool sometimes end in a dangling comma (`{...},` with no closing
//! `]`, or `{...},]`). That single malformation class is repaired by cutting
//! the text after the last `}` and closing the array. This is a best-effort
//! heuristic, not a general fault-tolerant parser: anything else that fails
//! to parse is rejected.

use std::path::Path;

use confgraph_core::RawSession;

use crate::error::{LoadError, Result};

/// A parsed export, ready to load.
#[derive(Debug, Clone)]
pub struct Export {
    pub records: Vec<RawSession>,
    /// Whether the trailing-comma repair had to be applied.
    pub repaired: bool,
    /// BLAKE3 hash (hex) of the export bytes as read.
    pub content_hash: String,
}

/// Read and parse an export file.
pub fn read_export(path: &Path) -> Result<Export> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_export(&text)
}

/// Parse export text, applying the trailing-comma repair when needed.
pub fn parse_export(text: &str) -> Result<Export> {
    let content_hash = blake3::hash(text.as_bytes()).to_hex().to_string();

    let first_error = match serde_json::from_str::<Vec<RawSession>>(text) {
        Ok(records) => {
            return Ok(Export {
                records,
                repaired: false,
                content_hash,
            })
        }
        Err(e) => e,
    };

    let Some((repaired, cut_at)) = repair_trailing_comma(text) else {
        return Err(LoadError::MalformedInput(first_error.to_string()));
    };

    match serde_json::from_str::<Vec<RawSession>>(&repaired) {
        Ok(records) => {
            tracing::warn!(
                original_error = %first_error,
                records = records.len(),
                cut_at,
                dropped_bytes = text.len() - cut_at,
                "Export repaired: truncated after last record and closed the array"
            );
            Ok(Export {
                records,
                repaired: true,
                content_hash,
            })
        }
        Err(_) => Err(LoadError::MalformedInput(first_error.to_string())),
    }
}

/// Truncate after the last `}` and append `]`, returning the repaired text
/// and the byte offset the original was cut at. `None` when the text holds
/// no object at all.
fn repair_trailing_comma(text: &str) -> Option<(String, usize)> {
    let cut_at = text.rfind('}')? + 1;
    let mut repaired = String::with_capacity(cut_at + 1);
    repaired.push_str(&text[..cut_at]);
    repaired.push(']');
    Some((repaired, cut_at))
}
