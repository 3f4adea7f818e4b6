//! Run statistics
//!
//! Counters are atomic so the structured anonymizer and the free-text scanner
//! can share one instance even when the host parallelizes record processing.

use crate::domain::PiiKind;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters accumulated over one anonymization run
#[derive(Debug, Default)]
pub struct RunStatistics {
    fields_classified_name: AtomicUsize,
    fields_classified_email: AtomicUsize,
    fields_classified_none: AtomicUsize,
    values_substituted_name: AtomicUsize,
    values_substituted_email: AtomicUsize,
    values_skipped_malformed: AtomicUsize,
    text_spans_name: AtomicUsize,
    text_spans_email: AtomicUsize,
    degraded_classifications: AtomicUsize,
    traversal_truncations: AtomicUsize,
}

impl RunStatistics {
    /// Create a zeroed statistics accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one field classification
    pub fn record_classification(&self, kind: Option<PiiKind>) {
        match kind {
            Some(PiiKind::Name) => self.fields_classified_name.fetch_add(1, Ordering::Relaxed),
            Some(PiiKind::Email) => self.fields_classified_email.fetch_add(1, Ordering::Relaxed),
            None => self.fields_classified_none.fetch_add(1, Ordering::Relaxed),
        };
    }

    /// Record one successful structured-field substitution
    pub fn record_substitution(&self, kind: PiiKind) {
        match kind {
            PiiKind::Name => self.values_substituted_name.fetch_add(1, Ordering::Relaxed),
            PiiKind::Email => self.values_substituted_email.fetch_add(1, Ordering::Relaxed),
        };
    }

    /// Record a value skipped because it failed validation at substitution time
    pub fn record_skipped_value(&self) {
        self.values_skipped_malformed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one substituted free-text span
    pub fn record_span(&self, kind: PiiKind) {
        match kind {
            PiiKind::Name => self.text_spans_name.fetch_add(1, Ordering::Relaxed),
            PiiKind::Email => self.text_spans_email.fetch_add(1, Ordering::Relaxed),
        };
    }

    /// Record a classification performed without the entity recognizer
    pub fn record_degraded_classification(&self) {
        self.degraded_classifications.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a traversal cut short by the depth bound
    pub fn record_truncation(&self) {
        self.traversal_truncations.fetch_add(1, Ordering::Relaxed);
    }

    /// Capture a point-in-time copy of all counters
    pub fn snapshot(&self) -> StatisticsSnapshot {
        StatisticsSnapshot {
            fields_classified_name: self.fields_classified_name.load(Ordering::Relaxed),
            fields_classified_email: self.fields_classified_email.load(Ordering::Relaxed),
            fields_classified_none: self.fields_classified_none.load(Ordering::Relaxed),
            values_substituted_name: self.values_substituted_name.load(Ordering::Relaxed),
            values_substituted_email: self.values_substituted_email.load(Ordering::Relaxed),
            values_skipped_malformed: self.values_skipped_malformed.load(Ordering::Relaxed),
            text_spans_name: self.text_spans_name.load(Ordering::Relaxed),
            text_spans_email: self.text_spans_email.load(Ordering::Relaxed),
            degraded_classifications: self.degraded_classifications.load(Ordering::Relaxed),
            traversal_truncations: self.traversal_truncations.load(Ordering::Relaxed),
        }
    }
}

/// Serializable point-in-time view of [`RunStatistics`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    /// Fields classified NAME
    pub fields_classified_name: usize,
    /// Fields classified EMAIL
    pub fields_classified_email: usize,
    /// Fields classified as neither kind
    pub fields_classified_none: usize,
    /// Structured NAME values substituted
    pub values_substituted_name: usize,
    /// Structured EMAIL values substituted
    pub values_substituted_email: usize,
    /// Values skipped because they failed validation at substitution time
    pub values_skipped_malformed: usize,
    /// Free-text NAME spans substituted
    pub text_spans_name: usize,
    /// Free-text EMAIL spans substituted
    pub text_spans_email: usize,
    /// Classifications performed without the entity recognizer
    pub degraded_classifications: usize,
    /// Traversals cut short by the depth bound
    pub traversal_truncations: usize,
}

impl StatisticsSnapshot {
    /// Total substituted values and spans across both kinds
    pub fn total_substitutions(&self) -> usize {
        self.values_substituted_name
            + self.values_substituted_email
            + self.text_spans_name
            + self.text_spans_email
    }
}
