//! Field classifier
//!
//! Combines three weak signals into one classification decision per field:
//! keyword matching on the field name, pattern validation over a bounded
//! value sample, and (when available) entity recognition over the same
//! sample. Thresholds are named constants so they stay independently
//! testable and tunable.

use crate::detection::keywords::KeywordRegistry;
use crate::detection::recognizer::EntityRecognizer;
use crate::detection::validators::{looks_like_person_name, PatternValidators};
use crate::domain::{FieldClassification, FieldPath, PiiKind, RunStatistics, SignalEvidence};
use serde_json::Value;
use std::sync::Arc;

/// Fraction of valid emails in a sample required to classify EMAIL
pub const EMAIL_CONTENT_THRESHOLD: f64 = 0.5;

/// Fraction of name candidates in a sample required to classify NAME
pub const NAME_CONTENT_THRESHOLD: f64 = 0.4;

/// Confidence assigned when only the keyword signal supports the kind
pub const KEYWORD_ONLY_CONFIDENCE: f64 = 0.5;

/// Confidence boost when the keyword signal agrees with the content signal
pub const KEYWORD_AGREEMENT_BOOST: f64 = 0.15;

/// Tunable classification thresholds
#[derive(Debug, Clone, Copy)]
pub struct ClassifierThresholds {
    /// Minimum valid-email fraction for an EMAIL classification
    pub email_content: f64,
    /// Minimum name-candidate fraction for a NAME classification
    pub name_content: f64,
    /// Confidence of a keyword-only classification
    pub keyword_only_confidence: f64,
}

impl Default for ClassifierThresholds {
    fn default() -> Self {
        Self {
            email_content: EMAIL_CONTENT_THRESHOLD,
            name_content: NAME_CONTENT_THRESHOLD,
            keyword_only_confidence: KEYWORD_ONLY_CONFIDENCE,
        }
    }
}

/// Assigns each field a PII kind and confidence from sampled values
pub struct FieldClassifier {
    keywords: KeywordRegistry,
    validators: PatternValidators,
    recognizer: Option<Arc<dyn EntityRecognizer>>,
    thresholds: ClassifierThresholds,
    stats: Arc<RunStatistics>,
}

impl FieldClassifier {
    /// Create a classifier
    pub fn new(
        keywords: KeywordRegistry,
        validators: PatternValidators,
        recognizer: Option<Arc<dyn EntityRecognizer>>,
        thresholds: ClassifierThresholds,
        stats: Arc<RunStatistics>,
    ) -> Self {
        Self {
            keywords,
            validators,
            recognizer,
            thresholds,
            stats,
        }
    }

    /// Classify one field from its path and a bounded sample of its values
    ///
    /// Classification never fails: recognizer unavailability degrades NAME
    /// detection to the structural heuristic and is recorded in the run
    /// statistics.
    pub fn classify(&self, path: &FieldPath, samples: &[Value]) -> FieldClassification {
        let keyword = path
            .terminal_name()
            .map(|name| self.keywords.match_field(name))
            .and_then(|signal| signal.hit());

        let values: Vec<&str> = samples
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect();

        let evidence = self.collect_evidence(keyword, &values);
        let (kind, confidence) = self.resolve(&evidence);

        self.stats.record_classification(kind);
        tracing::debug!(
            field = %path,
            kind = kind.map(|k| k.label()).unwrap_or("-"),
            confidence,
            sampled = evidence.sampled,
            "Classified field"
        );

        FieldClassification {
            path: path.clone(),
            kind,
            confidence,
            evidence,
        }
    }

    fn collect_evidence(&self, keyword: Option<PiiKind>, values: &[&str]) -> SignalEvidence {
        let sampled = values.len();
        if sampled == 0 {
            return SignalEvidence {
                keyword,
                sampled,
                ..SignalEvidence::default()
            };
        }

        let email_valid = values
            .iter()
            .filter(|v| self.validators.is_valid_email(v))
            .count();

        if self.recognizer.is_none() {
            self.stats.record_degraded_classification();
        }

        let mut recognizer_hits = 0usize;
        let mut name_candidates = 0usize;
        for value in values {
            let tagged_whole = self.tagged_as_whole_person(value);
            if tagged_whole {
                recognizer_hits += 1;
            }
            if tagged_whole || looks_like_person_name(value) {
                name_candidates += 1;
            }
        }

        SignalEvidence {
            keyword,
            email_valid_ratio: email_valid as f64 / sampled as f64,
            name_candidate_ratio: name_candidates as f64 / sampled as f64,
            recognizer_ratio: recognizer_hits as f64 / sampled as f64,
            sampled,
        }
    }

    /// Whether the recognizer tags the entire value as a single PERSON span
    fn tagged_as_whole_person(&self, value: &str) -> bool {
        let Some(recognizer) = &self.recognizer else {
            return false;
        };
        match recognizer.tag_persons(value) {
            Ok(spans) => {
                spans.len() == 1 && spans[0].start == 0 && spans[0].end == value.len()
            }
            Err(error) => {
                tracing::warn!(error = %error, "Entity recognizer failed; using structural heuristic");
                self.stats.record_degraded_classification();
                false
            }
        }
    }

    fn resolve(&self, evidence: &SignalEvidence) -> (Option<PiiKind>, f64) {
        let email_pass = evidence.sampled > 0 && evidence.email_valid_ratio >= self.thresholds.email_content;
        let name_pass = evidence.sampled > 0 && evidence.name_candidate_ratio >= self.thresholds.name_content;

        // Email wins a double-pass: its validator is exact, not probabilistic.
        if email_pass {
            let confidence =
                boosted(evidence.email_valid_ratio, evidence.keyword == Some(PiiKind::Email));
            return (Some(PiiKind::Email), confidence);
        }
        if name_pass {
            let confidence =
                boosted(evidence.name_candidate_ratio, evidence.keyword == Some(PiiKind::Name));
            return (Some(PiiKind::Name), confidence);
        }
        // Keyword-only fallback covers fields whose sample is all nulls or
        // placeholders, at a discounted confidence.
        if let Some(kind) = evidence.keyword {
            return (Some(kind), self.thresholds.keyword_only_confidence);
        }
        (None, 0.0)
    }
}

fn boosted(ratio: f64, keyword_agrees: bool) -> f64 {
    if keyword_agrees {
        (ratio + KEYWORD_AGREEMENT_BOOST).min(1.0)
    } else {
        ratio
    }
}
