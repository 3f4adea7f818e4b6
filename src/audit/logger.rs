//! Audit logger

use crate::anonymizer::SubstitutionRecord;
use crate::audit::hash_value;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use uuid::Uuid;

/// Audit log entry for one processed record
#[derive(Debug, Serialize)]
struct AuditLogEntry {
    timestamp: String,
    run_id: Uuid,
    record: usize,
    substitutions_count: usize,
    substitutions: Vec<AuditSubstitution>,
}

/// One substitution inside an entry (with hashed PII)
#[derive(Debug, Serialize)]
struct AuditSubstitution {
    kind: String,
    field_path: String,
    /// SHA-256 hash of the original value; plaintext PII is never logged
    value_hash: String,
}

/// Append-only audit logger
pub struct AuditLogger {
    log_path: PathBuf,
    json_format: bool,
    enabled: bool,
}

impl AuditLogger {
    /// Create a new audit logger
    pub fn new(log_path: PathBuf, json_format: bool, enabled: bool) -> Result<Self> {
        if enabled {
            if let Some(parent) = log_path.parent() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create audit log directory: {}", parent.display())
                })?;
            }
        }

        Ok(Self {
            log_path,
            json_format,
            enabled,
        })
    }

    /// Log the substitutions applied to one record
    pub fn log_record(
        &self,
        run_id: Uuid,
        record_ordinal: usize,
        substitutions: &[SubstitutionRecord],
    ) -> Result<()> {
        if !self.enabled || substitutions.is_empty() {
            return Ok(());
        }

        let entry = AuditLogEntry {
            timestamp: chrono::Utc::now().to_rfc3339(),
            run_id,
            record: record_ordinal,
            substitutions_count: substitutions.len(),
            substitutions: substitutions
                .iter()
                .map(|s| AuditSubstitution {
                    kind: s.kind.label().to_string(),
                    field_path: s.field_path.clone(),
                    value_hash: hash_value(&s.original),
                })
                .collect(),
        };

        self.write_entry(&entry)
    }

    fn write_entry(&self, entry: &AuditLogEntry) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open audit log: {}", self.log_path.display()))?;

        if self.json_format {
            let json_line =
                serde_json::to_string(entry).context("Failed to serialize audit entry")?;
            writeln!(file, "{json_line}").context("Failed to write audit entry")?;
        } else {
            writeln!(
                file,
                "[{}] Run: {} | Record: {} | Substitutions: {}",
                entry.timestamp, entry.run_id, entry.record, entry.substitutions_count
            )
            .context("Failed to write audit entry")?;
        }

        Ok(())
    }
}
