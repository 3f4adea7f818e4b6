//! Run reporting
//!
//! The [`RunReport`] exposes run statistics, the per-field classification
//! summary and a redacted sample of issued mappings. Originals appear only as
//! SHA-256 hashes so the report itself never leaks PII.

use crate::audit::hash_value;
use crate::domain::{FieldClassification, PiiKind, StatisticsSnapshot};
use crate::mapping::MappingCache;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// NAME mappings sampled into the report
const NAME_SAMPLE_LIMIT: usize = 5;

/// EMAIL mappings sampled into the report
const EMAIL_SAMPLE_LIMIT: usize = 3;

/// One classified field in the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedField {
    /// Display form of the field path
    pub path: String,
    /// Assigned kind label, if any
    pub kind: Option<String>,
    /// Classification confidence
    pub confidence: f64,
    /// Number of samples the decision was based on
    pub sampled: usize,
}

/// One redacted mapping sample
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactedMapping {
    /// SHA-256 hash of the original value
    pub original_sha256: String,
    /// The fake value issued for it
    pub fake: String,
}

/// Report over one anonymization run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Run identifier
    pub run_id: Uuid,
    /// When the report was generated
    pub generated_at: DateTime<Utc>,
    /// Run duration in milliseconds
    pub duration_ms: u64,
    /// Accumulated counters
    pub statistics: StatisticsSnapshot,
    /// Per-field classification summary
    pub classifications: Vec<ClassifiedField>,
    /// Redacted NAME mapping samples
    pub name_samples: Vec<RedactedMapping>,
    /// Redacted EMAIL mapping samples
    pub email_samples: Vec<RedactedMapping>,
}

impl RunReport {
    /// Build a report from run state
    pub fn new(
        run_id: Uuid,
        duration_ms: u64,
        statistics: StatisticsSnapshot,
        classifications: &[FieldClassification],
        cache: &MappingCache,
    ) -> Self {
        let classifications = classifications
            .iter()
            .map(|c| ClassifiedField {
                path: c.path.to_string(),
                kind: c.kind.map(|k| k.label().to_string()),
                confidence: c.confidence,
                sampled: c.evidence.sampled,
            })
            .collect();

        Self {
            run_id,
            generated_at: Utc::now(),
            duration_ms,
            statistics,
            classifications,
            name_samples: redact(cache, PiiKind::Name, NAME_SAMPLE_LIMIT),
            email_samples: redact(cache, PiiKind::Email, EMAIL_SAMPLE_LIMIT),
        }
    }

    /// Format the report for console output
    pub fn format_console(&self) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str("                    ANONYMIZATION RUN REPORT                   \n");
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output.push_str("SUMMARY\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!("  Run ID:                  {}\n", self.run_id));
        output.push_str(&format!("  Duration:                {} ms\n", self.duration_ms));
        output.push_str(&format!(
            "  Fields classified NAME:  {}\n",
            self.statistics.fields_classified_name
        ));
        output.push_str(&format!(
            "  Fields classified EMAIL: {}\n",
            self.statistics.fields_classified_email
        ));
        output.push_str(&format!(
            "  Fields left untouched:   {}\n",
            self.statistics.fields_classified_none
        ));
        output.push_str(&format!(
            "  Values substituted:      {} name, {} email\n",
            self.statistics.values_substituted_name, self.statistics.values_substituted_email
        ));
        output.push_str(&format!(
            "  Text spans substituted:  {} name, {} email\n",
            self.statistics.text_spans_name, self.statistics.text_spans_email
        ));
        output.push_str(&format!(
            "  Values skipped:          {}\n",
            self.statistics.values_skipped_malformed
        ));
        if self.statistics.degraded_classifications > 0 {
            output.push_str(&format!(
                "  Degraded classifications (no recognizer): {}\n",
                self.statistics.degraded_classifications
            ));
        }
        if self.statistics.traversal_truncations > 0 {
            output.push_str(&format!(
                "  Traversals truncated at depth bound: {}\n",
                self.statistics.traversal_truncations
            ));
        }
        output.push('\n');

        let classified: Vec<&ClassifiedField> = self
            .classifications
            .iter()
            .filter(|c| c.kind.is_some())
            .collect();
        if !classified.is_empty() {
            output.push_str("CLASSIFIED FIELDS\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for field in classified {
                output.push_str(&format!(
                    "  {:<40} {:<6} {:>5.0}%  ({} samples)\n",
                    field.path,
                    field.kind.as_deref().unwrap_or("-"),
                    field.confidence * 100.0,
                    field.sampled
                ));
            }
            output.push('\n');
        }

        if !self.name_samples.is_empty() || !self.email_samples.is_empty() {
            output.push_str("SAMPLE MAPPINGS (originals hashed)\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for sample in &self.name_samples {
                output.push_str(&format!(
                    "  NAME  {}… → \"{}\"\n",
                    &sample.original_sha256[..12],
                    sample.fake
                ));
            }
            for sample in &self.email_samples {
                output.push_str(&format!(
                    "  EMAIL {}… → \"{}\"\n",
                    &sample.original_sha256[..12],
                    sample.fake
                ));
            }
            output.push('\n');
        }

        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output
    }

    /// Format the report as pretty JSON
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the report to a file as JSON
    pub fn write_to_file(&self, path: &std::path::Path) -> std::io::Result<()> {
        let json = self
            .format_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)
    }
}

fn redact(cache: &MappingCache, kind: PiiKind, limit: usize) -> Vec<RedactedMapping> {
    cache
        .sample(kind, limit)
        .into_iter()
        .map(|mapping| RedactedMapping {
            original_sha256: hash_value(&mapping.original),
            fake: mapping.fake,
        })
        .collect()
}
