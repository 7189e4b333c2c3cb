//! Run summary for a load.
//!
//! Every run records what it read (by content hash), what it wrote and what
//! it skipped. The summary is logged at the end of the run and can be written
//! to disk as JSON so two runs over the same export can be compared.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

/// A record the loader did not write.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Zero-based position in the export.
    pub index: usize,
    pub reason: String,
}

/// Outcome of one load run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadSummary {
    pub run_id: Uuid,
    /// BLAKE3 hash of the export bytes.
    pub export_hash: String,
    pub repaired_export: bool,
    pub dry_run: bool,
    pub records_total: usize,
    pub sessions_written: usize,
    pub operations_applied: usize,
    pub skipped: Vec<SkippedRecord>,
    /// Records whose non-empty schedule did not parse.
    pub unparsed_schedules: usize,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl LoadSummary {
    pub fn new(export_hash: &str, repaired_export: bool, records_total: usize) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            export_hash: export_hash.to_string(),
            repaired_export,
            dry_run: false,
            records_total,
            sessions_written: 0,
            operations_applied: 0,
            skipped: Vec::new(),
            unparsed_schedules: 0,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn finish(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    /// Emit the summary as a single structured log line.
    pub fn log(&self) {
        tracing::info!(
            run_id = %self.run_id,
            export_hash = %self.export_hash,
            repaired_export = self.repaired_export,
            dry_run = self.dry_run,
            records = self.records_total,
            written = self.sessions_written,
            operations = self.operations_applied,
            skipped = self.skipped.len(),
            unparsed_schedules = self.unparsed_schedules,
            "Load complete"
        );
    }

    /// Write the summary as pretty-printed JSON, creating parent directories.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        tracing::info!(path = %path.display(), "Run summary written");
        Ok(())
    }
}
