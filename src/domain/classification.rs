//! Classification data models

use crate::domain::FieldPath;
use serde::{Deserialize, Serialize};

/// PII kind targeted by the detection heuristics
///
/// A field classified as neither kind is represented as `Option<PiiKind>`
/// being `None`, which also keeps [`crate::mapping::MappingKey`] unable to
/// express a "no kind" entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PiiKind {
    /// Person name (first + last, possibly with middle parts)
    Name,
    /// Email address
    Email,
}

impl PiiKind {
    /// Human-readable label for reports and audit entries
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "NAME",
            Self::Email => "EMAIL",
        }
    }
}

/// Per-signal evidence collected while classifying one field
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SignalEvidence {
    /// Kind suggested by the field-name keyword sets, if any
    pub keyword: Option<PiiKind>,
    /// Fraction of sampled values passing the email validator
    pub email_valid_ratio: f64,
    /// Fraction of sampled values accepted as name candidates
    pub name_candidate_ratio: f64,
    /// Fraction of sampled values tagged whole-value PERSON by the recognizer
    pub recognizer_ratio: f64,
    /// Number of non-null string samples the ratios are computed over
    pub sampled: usize,
}

/// Outcome of classifying one field
///
/// Created once per field per run and immutable afterwards; consumed by the
/// structured-field anonymizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldClassification {
    /// The field this classification applies to
    pub path: FieldPath,
    /// Assigned kind; `None` means the field is left untouched
    pub kind: Option<PiiKind>,
    /// Confidence score in `0..=1`
    pub confidence: f64,
    /// Evidence breakdown behind the decision
    pub evidence: SignalEvidence,
}

impl FieldClassification {
    /// Whether the field qualifies for substitution
    pub fn is_pii(&self) -> bool {
        self.kind.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        assert_eq!(PiiKind::Name.label(), "NAME");
        assert_eq!(PiiKind::Email.label(), "EMAIL");
    }

    #[test]
    fn test_is_pii() {
        let classification = FieldClassification {
            path: FieldPath::column("users", "email"),
            kind: Some(PiiKind::Email),
            confidence: 1.0,
            evidence: SignalEvidence::default(),
        };
        assert!(classification.is_pii());

        let none = FieldClassification {
            kind: None,
            confidence: 0.0,
            ..classification
        };
        assert!(!none.is_pii());
    }
}
