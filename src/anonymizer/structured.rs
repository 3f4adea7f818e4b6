//! Structured-field anonymizer
//!
//! Rewrites every classified field of a record through the mapping cache.
//! Applied per record as the surrounding collaborator streams them; performs
//! no I/O itself. Value-level failures (a record value that no longer passes
//! validation for its classified kind) skip that value and are counted,
//! never aborting the record.

use crate::anonymizer::SubstitutionRecord;
use crate::detection::PatternValidators;
use crate::domain::{FieldClassification, PathSegment, PiiKind, RunStatistics};
use crate::mapping::MappingCache;
use serde_json::Value;
use std::sync::Arc;

/// Rewrites classified structured fields in place
pub struct StructuredFieldAnonymizer {
    cache: Arc<MappingCache>,
    validators: PatternValidators,
    stats: Arc<RunStatistics>,
}

impl StructuredFieldAnonymizer {
    /// Create an anonymizer over a shared cache and statistics accumulator
    pub fn new(
        cache: Arc<MappingCache>,
        validators: PatternValidators,
        stats: Arc<RunStatistics>,
    ) -> Self {
        Self {
            cache,
            validators,
            stats,
        }
    }

    /// Substitute every qualifying field of one record in place
    ///
    /// Null and empty values are left untouched; array-valued fields are
    /// rewritten element-wise. Returns the substitutions applied, for the
    /// audit trail.
    pub fn anonymize_record(
        &self,
        record: &mut Value,
        classifications: &[FieldClassification],
    ) -> Vec<SubstitutionRecord> {
        let mut applied = Vec::new();
        for classification in classifications {
            let Some(kind) = classification.kind else {
                continue;
            };
            self.apply(
                record,
                classification.path.segments(),
                kind,
                &classification.path.to_string(),
                &mut applied,
            );
        }
        applied
    }

    fn apply(
        &self,
        value: &mut Value,
        segments: &[PathSegment],
        kind: PiiKind,
        path_display: &str,
        applied: &mut Vec<SubstitutionRecord>,
    ) {
        match segments.split_first() {
            None => self.rewrite_leaf(value, kind, path_display, applied),
            Some((PathSegment::Key(key), rest)) => {
                if let Some(child) = value.as_object_mut().and_then(|map| map.get_mut(key)) {
                    self.apply(child, rest, kind, path_display, applied);
                }
            }
            Some((PathSegment::Array, rest)) => {
                if let Some(elements) = value.as_array_mut() {
                    for element in elements {
                        self.apply(element, rest, kind, path_display, applied);
                    }
                }
            }
        }
    }

    fn rewrite_leaf(
        &self,
        value: &mut Value,
        kind: PiiKind,
        path_display: &str,
        applied: &mut Vec<SubstitutionRecord>,
    ) {
        let Some(original) = value.as_str() else {
            // Null stays untouched; a non-string leaf under a classified
            // path cannot be substituted and is counted as skipped.
            if !value.is_null() {
                self.stats.record_skipped_value();
            }
            return;
        };
        if original.trim().is_empty() {
            return;
        }
        if kind == PiiKind::Email && !self.validators.is_valid_email(original) {
            self.stats.record_skipped_value();
            tracing::debug!(field = path_display, "Value failed email validation; skipped");
            return;
        }

        let fake = self.cache.resolve(kind, original);
        applied.push(SubstitutionRecord {
            kind,
            field_path: path_display.to_string(),
            original: original.to_string(),
        });
        self.stats.record_substitution(kind);
        *value = Value::String(fake);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldPath, SignalEvidence};
    use crate::mapping::{EmailAddressGenerator, Locale, PersonNameGenerator};
    use serde_json::json;

    fn fixture() -> (Arc<MappingCache>, StructuredFieldAnonymizer, Arc<RunStatistics>) {
        let cache = Arc::new(MappingCache::new(
            Box::new(PersonNameGenerator::with_seed(Locale::En, 11)),
            Box::new(EmailAddressGenerator::with_seed(11)),
        ));
        let stats = Arc::new(RunStatistics::new());
        let anonymizer = StructuredFieldAnonymizer::new(
            Arc::clone(&cache),
            PatternValidators::new().unwrap(),
            Arc::clone(&stats),
        );
        (cache, anonymizer, stats)
    }

    fn classified(path: FieldPath, kind: PiiKind) -> FieldClassification {
        FieldClassification {
            path,
            kind: Some(kind),
            confidence: 1.0,
            evidence: SignalEvidence::default(),
        }
    }

    #[test]
    fn test_rewrites_flat_email_field() {
        let (cache, anonymizer, stats) = fixture();
        let mut record = json!({"contact_email": "a@x.com", "age": 33});
        let classifications = vec![classified(
            FieldPath::column("users", "contact_email"),
            PiiKind::Email,
        )];

        let applied = anonymizer.anonymize_record(&mut record, &classifications);

        assert_eq!(applied.len(), 1);
        let rewritten = record["contact_email"].as_str().unwrap();
        assert_ne!(rewritten, "a@x.com");
        assert_eq!(rewritten, cache.resolve(PiiKind::Email, "a@x.com"));
        assert_eq!(record["age"], json!(33));
        assert_eq!(stats.snapshot().values_substituted_email, 1);
    }

    #[test]
    fn test_nested_and_array_paths_substitute_element_wise() {
        let (_, anonymizer, stats) = fixture();
        let mut record = json!({
            "reviewer": {"name": "Maria Santos", "role": "editor"},
            "team": [
                {"member_name": "João Silva"},
                {"member_name": "Pedro Costa"}
            ]
        });
        let classifications = vec![
            classified(
                FieldPath::new("reviews").child_key("reviewer").child_key("name"),
                PiiKind::Name,
            ),
            classified(
                FieldPath::new("reviews")
                    .child_key("team")
                    .child_array()
                    .child_key("member_name"),
                PiiKind::Name,
            ),
        ];

        anonymizer.anonymize_record(&mut record, &classifications);

        assert_ne!(record["reviewer"]["name"], json!("Maria Santos"));
        assert_eq!(record["reviewer"]["role"], json!("editor"));
        assert_ne!(record["team"][0]["member_name"], json!("João Silva"));
        assert_ne!(record["team"][1]["member_name"], json!("Pedro Costa"));
        assert_ne!(
            record["team"][0]["member_name"],
            record["team"][1]["member_name"]
        );
        assert_eq!(stats.snapshot().values_substituted_name, 3);
    }

    #[test]
    fn test_null_and_empty_values_untouched() {
        let (cache, anonymizer, stats) = fixture();
        let mut record = json!({"email": null, "name": ""});
        let classifications = vec![
            classified(FieldPath::column("users", "email"), PiiKind::Email),
            classified(FieldPath::column("users", "name"), PiiKind::Name),
        ];

        let applied = anonymizer.anonymize_record(&mut record, &classifications);

        assert!(applied.is_empty());
        assert_eq!(record, json!({"email": null, "name": ""}));
        assert!(cache.is_empty());
        assert_eq!(stats.snapshot().total_substitutions(), 0);
    }

    #[test]
    fn test_malformed_email_skipped_and_counted() {
        let (_, anonymizer, stats) = fixture();
        let mut record = json!({"contact_email": "not-an-email"});
        let classifications = vec![classified(
            FieldPath::column("users", "contact_email"),
            PiiKind::Email,
        )];

        let applied = anonymizer.anonymize_record(&mut record, &classifications);

        assert!(applied.is_empty());
        assert_eq!(record["contact_email"], json!("not-an-email"));
        assert_eq!(stats.snapshot().values_skipped_malformed, 1);
    }

    #[test]
    fn test_same_value_across_fields_maps_identically() {
        let (_, anonymizer, _) = fixture();
        let mut record = json!({"author": "João Silva", "editor": "João Silva"});
        let classifications = vec![
            classified(FieldPath::column("posts", "author"), PiiKind::Name),
            classified(FieldPath::column("posts", "editor"), PiiKind::Name),
        ];

        anonymizer.anonymize_record(&mut record, &classifications);

        assert_eq!(record["author"], record["editor"]);
    }
}
