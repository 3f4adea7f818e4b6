//! Main anonymization engine
//!
//! Orchestrates the pipeline over one source: field discovery and
//! classification, structured substitution, the residual free-text pass, and
//! the audit trail. The engine owns the run-scoped mapping cache, so every
//! substitution it applies, structured or embedded, is consistent with
//! every other substitution of the same original value.
//!
//! # Examples
//!
//! ```no_run
//! use mascara::config::MascaraConfig;
//! use mascara::engine::AnonymizationEngine;
//! use mascara::source::JsonDocumentSource;
//! use serde_json::json;
//!
//! # fn example() -> anyhow::Result<()> {
//! let engine = AnonymizationEngine::new(MascaraConfig::default())?;
//! let mut source = JsonDocumentSource::new(
//!     "reviews",
//!     vec![json!({"author": "João Silva", "contact_email": "joao@example.com"})],
//! );
//! let report = engine.run(&mut source, "reviews")?;
//! println!("{}", report.format_console());
//! # Ok(())
//! # }
//! ```

use crate::anonymizer::{FreeTextScanner, StructuredFieldAnonymizer, SubstitutionRecord};
use crate::audit::AuditLogger;
use crate::config::MascaraConfig;
use crate::detection::{
    ClassifierThresholds, EntityRecognizer, FieldClassifier, KeywordRegistry, LexiconRecognizer,
    PatternValidators,
};
use crate::domain::{FieldClassification, FieldPath, RunStatistics, StatisticsSnapshot};
use crate::mapping::{
    EmailAddressGenerator, ExportedMapping, FakeValueGenerator, MappingCache, PersonNameGenerator,
};
use crate::report::RunReport;
use crate::source::{RecordStream, SampleProvider};
use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Orchestrates detection and consistent substitution over one source
pub struct AnonymizationEngine {
    config: MascaraConfig,
    classifier: FieldClassifier,
    structured: StructuredFieldAnonymizer,
    scanner: FreeTextScanner,
    cache: Arc<MappingCache>,
    stats: Arc<RunStatistics>,
    audit_logger: Option<AuditLogger>,
    run_id: Uuid,
}

impl AnonymizationEngine {
    /// Create an engine from configuration
    ///
    /// Uses the built-in lexicon recognizer when `detection.recognizer_enabled`
    /// is set; without a recognizer NAME detection degrades to the structural
    /// heuristics and the run records the degraded mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the keyword library
    /// cannot be loaded, or the audit logger cannot be initialized.
    pub fn new(config: MascaraConfig) -> Result<Self> {
        let recognizer: Option<Arc<dyn EntityRecognizer>> = if config.detection.recognizer_enabled
        {
            Some(Arc::new(LexiconRecognizer::new()))
        } else {
            None
        };
        Self::build(config, recognizer)
    }

    /// Create an engine with a host-provided entity recognizer
    pub fn with_recognizer(
        config: MascaraConfig,
        recognizer: Arc<dyn EntityRecognizer>,
    ) -> Result<Self> {
        Self::build(config, Some(recognizer))
    }

    fn build(
        config: MascaraConfig,
        recognizer: Option<Arc<dyn EntityRecognizer>>,
    ) -> Result<Self> {
        config
            .validate()
            .map_err(anyhow::Error::msg)
            .context("Invalid configuration")?;

        let keywords = match &config.detection.keyword_library {
            Some(path) => KeywordRegistry::from_file(path)?,
            None => KeywordRegistry::default_terms()?,
        };

        let thresholds = ClassifierThresholds {
            email_content: config.detection.email_content_threshold,
            name_content: config.detection.name_content_threshold,
            keyword_only_confidence: config.detection.keyword_only_confidence,
        };

        let locale = config.generation.locale;
        let (name_generator, email_generator): (
            Box<dyn FakeValueGenerator>,
            Box<dyn FakeValueGenerator>,
        ) = match config.generation.seed {
            Some(seed) => (
                Box::new(PersonNameGenerator::with_seed(locale, seed)),
                Box::new(EmailAddressGenerator::with_seed(seed)),
            ),
            None => (
                Box::new(PersonNameGenerator::new(locale)),
                Box::new(EmailAddressGenerator::new()),
            ),
        };
        let cache = Arc::new(MappingCache::new(name_generator, email_generator));

        let stats = Arc::new(RunStatistics::new());

        let classifier = FieldClassifier::new(
            keywords,
            PatternValidators::new()?,
            recognizer.clone(),
            thresholds,
            Arc::clone(&stats),
        );
        let structured = StructuredFieldAnonymizer::new(
            Arc::clone(&cache),
            PatternValidators::new()?,
            Arc::clone(&stats),
        );
        let scanner = FreeTextScanner::new(
            PatternValidators::new()?,
            recognizer,
            Arc::clone(&cache),
            Arc::clone(&stats),
        );

        let audit_logger = if config.audit.enabled {
            Some(AuditLogger::new(
                config.audit.log_path.clone(),
                config.audit.json_format,
                true,
            )?)
        } else {
            None
        };

        Ok(Self {
            config,
            classifier,
            structured,
            scanner,
            cache,
            stats,
            audit_logger,
            run_id: Uuid::new_v4(),
        })
    }

    /// Classify every discoverable field of a collection
    ///
    /// Sample retrieval failures degrade the affected field to a keyword-only
    /// classification instead of failing the run.
    pub fn classify_source(
        &self,
        provider: &dyn SampleProvider,
        collection: &str,
    ) -> Result<Vec<FieldClassification>> {
        let fields = provider
            .list_fields(collection)
            .with_context(|| format!("Failed to enumerate fields of '{collection}'"))?;

        tracing::info!(collection, fields = fields.len(), "Classifying fields");

        let mut classifications = Vec::with_capacity(fields.len());
        for path in &fields {
            let samples = match provider.sample_values(path, self.config.detection.sample_size) {
                Ok(samples) => samples,
                Err(error) => {
                    tracing::warn!(field = %path, error = %error, "Sampling failed; classifying from field name only");
                    Vec::new()
                }
            };
            classifications.push(self.classifier.classify(path, &samples));
        }
        Ok(classifications)
    }

    /// Anonymize one record in place
    ///
    /// Applies the structured pass over classified fields, then the free-text
    /// pass over every remaining string leaf at least
    /// `detection.free_text_min_chars` long. Returns the substitutions
    /// applied, for the audit trail.
    pub fn anonymize_record(
        &self,
        record: &mut Value,
        collection: &str,
        classifications: &[FieldClassification],
    ) -> Result<Vec<SubstitutionRecord>> {
        let mut applied = self.structured.anonymize_record(record, classifications);

        // Fields already substituted whole are skipped by the text pass.
        let skip: HashSet<&FieldPath> = classifications
            .iter()
            .filter(|c| c.is_pii())
            .map(|c| &c.path)
            .collect();

        let root = FieldPath::new(collection);
        self.scrub_free_text(record, &root, &skip, &mut applied);

        Ok(applied)
    }

    fn scrub_free_text(
        &self,
        value: &mut Value,
        path: &FieldPath,
        skip: &HashSet<&FieldPath>,
        applied: &mut Vec<SubstitutionRecord>,
    ) {
        match value {
            Value::String(text) => {
                if skip.contains(path) {
                    return;
                }
                if text.chars().count() < self.config.detection.free_text_min_chars {
                    return;
                }
                let (rewritten, spans) = self.scanner.scrub(text);
                if spans.is_empty() {
                    return;
                }
                for span in &spans {
                    applied.push(SubstitutionRecord {
                        kind: span.kind,
                        field_path: path.to_string(),
                        original: span.text.clone(),
                    });
                }
                *text = rewritten;
            }
            Value::Object(map) => {
                for (key, child) in map {
                    self.scrub_free_text(child, &path.child_key(key.clone()), skip, applied);
                }
            }
            Value::Array(elements) => {
                let element_path = path.child_array();
                for child in elements {
                    self.scrub_free_text(child, &element_path, skip, applied);
                }
            }
            _ => {}
        }
    }

    /// Run the full pipeline over one source
    ///
    /// Classifies all fields first, then streams records through
    /// substitution, writing each rewritten record back. A record that fails
    /// is logged and skipped, never written back unanonymized. In dry-run
    /// mode records are classified but not rewritten.
    pub fn run<S>(&self, source: &mut S, collection: &str) -> Result<RunReport>
    where
        S: SampleProvider + RecordStream,
    {
        let started = Instant::now();
        tracing::info!(run_id = %self.run_id, collection, "Starting anonymization run");

        let classifications = self.classify_source(source, collection)?;

        let mut ordinal = 0usize;
        while let Some(mut record) = source.next_record()? {
            if self.config.application.dry_run {
                ordinal += 1;
                continue;
            }
            match self.anonymize_record(&mut record, collection, &classifications) {
                Ok(applied) => {
                    if let Some(logger) = &self.audit_logger {
                        logger.log_record(self.run_id, ordinal, &applied)?;
                    }
                    source.write_back(record)?;
                }
                Err(error) => {
                    // Fail-safe: never write back a partially anonymized record.
                    tracing::error!(record = ordinal, error = ?error, "Failed to anonymize record; skipped");
                }
            }
            ordinal += 1;
        }

        for _ in 0..source.truncations() {
            self.stats.record_truncation();
        }

        let report = self.report(&classifications, started.elapsed().as_millis() as u64);
        tracing::info!(
            run_id = %self.run_id,
            records = ordinal,
            substitutions = report.statistics.total_substitutions(),
            "Anonymization run finished"
        );
        Ok(report)
    }

    /// Build the run report from classifications and current statistics
    pub fn report(&self, classifications: &[FieldClassification], duration_ms: u64) -> RunReport {
        RunReport::new(
            self.run_id,
            duration_ms,
            self.stats.snapshot(),
            classifications,
            &self.cache,
        )
    }

    /// Current statistics snapshot
    pub fn statistics(&self) -> StatisticsSnapshot {
        self.stats.snapshot()
    }

    /// Export the mapping table, e.g. for host-driven cross-run seeding
    pub fn export_mappings(&self) -> Vec<ExportedMapping> {
        self.cache.export()
    }

    /// Preload mappings from a prior export
    pub fn seed_mappings<I>(&self, mappings: I)
    where
        I: IntoIterator<Item = ExportedMapping>,
    {
        self.cache.seed(mappings);
    }

    /// This run's identifier
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Whether the engine is in dry-run mode
    pub fn is_dry_run(&self) -> bool {
        self.config.application.dry_run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::JsonDocumentSource;
    use serde_json::json;

    fn engine() -> AnonymizationEngine {
        let mut config = MascaraConfig::default();
        config.generation.seed = Some(99);
        AnonymizationEngine::new(config).unwrap()
    }

    #[test]
    fn test_engine_creation_with_defaults() {
        assert!(AnonymizationEngine::new(MascaraConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = MascaraConfig::default();
        config.detection.sample_size = 0;
        assert!(AnonymizationEngine::new(config).is_err());
    }

    #[test]
    fn test_run_rewrites_classified_fields() {
        let engine = engine();
        let mut source = JsonDocumentSource::new(
            "users",
            vec![
                json!({"customer_name": "João Silva", "email": "joao@x.com"}),
                json!({"customer_name": "Maria Santos", "email": "maria@x.com"}),
            ],
        );

        let report = engine.run(&mut source, "users").unwrap();

        assert_eq!(source.rewritten().len(), 2);
        for record in source.rewritten() {
            assert_ne!(record["customer_name"], json!("João Silva"));
            assert_ne!(record["customer_name"], json!("Maria Santos"));
        }
        assert_eq!(report.statistics.fields_classified_name, 1);
        assert_eq!(report.statistics.fields_classified_email, 1);
        assert_eq!(report.statistics.values_substituted_name, 2);
        assert_eq!(report.statistics.values_substituted_email, 2);
    }

    #[test]
    fn test_dry_run_leaves_records_unwritten() {
        let mut config = MascaraConfig::default();
        config.application.dry_run = true;
        let engine = AnonymizationEngine::new(config).unwrap();
        let mut source =
            JsonDocumentSource::new("users", vec![json!({"email": "joao@x.com"})]);

        let report = engine.run(&mut source, "users").unwrap();

        assert!(source.rewritten().is_empty());
        assert_eq!(report.statistics.fields_classified_email, 1);
        assert_eq!(report.statistics.values_substituted_email, 0);
    }

    #[test]
    fn test_free_text_pass_reuses_structured_mapping() {
        let engine = engine();
        let mut source = JsonDocumentSource::new(
            "tickets",
            vec![json!({
                "customer_name": "João Silva",
                "notes": "Contact João Silva at joao@example.com about the refund"
            })],
        );

        engine.run(&mut source, "tickets").unwrap();

        let record = &source.rewritten()[0];
        let fake_name = record["customer_name"].as_str().unwrap();
        let notes = record["notes"].as_str().unwrap();
        assert!(notes.contains(fake_name));
        assert!(!notes.contains("João Silva"));
        assert!(!notes.contains("joao@example.com"));
    }

    #[test]
    fn test_short_strings_skip_free_text_pass() {
        let engine = engine();
        let mut source = JsonDocumentSource::new(
            "docs",
            vec![json!({"note": "cc joao@x.com"})],
        );

        engine.run(&mut source, "docs").unwrap();

        // Below the free-text length floor and not classified: untouched.
        assert_eq!(source.rewritten()[0]["note"], json!("cc joao@x.com"));
    }
}
