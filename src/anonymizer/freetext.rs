//! Free-text scanner
//!
//! Finds embedded PII spans in prose and rewrites them in place, copying
//! every non-PII character verbatim. Candidate spans come from three
//! signals: the email pattern over the raw text, the entity recognizer, and
//! the capitalized-run heuristic over stretches the recognizer did not
//! cover. Overlaps are resolved by the single tie-break rule in
//! [`crate::domain::span`].

use crate::detection::validators::name_token_runs;
use crate::detection::{EntityRecognizer, PatternValidators};
use crate::domain::{merge_spans, PiiKind, RunStatistics, SpanOrigin, TextSpan};
use crate::mapping::MappingCache;
use std::sync::Arc;

/// Scans and rewrites free text through the shared mapping cache
pub struct FreeTextScanner {
    validators: PatternValidators,
    recognizer: Option<Arc<dyn EntityRecognizer>>,
    cache: Arc<MappingCache>,
    stats: Arc<RunStatistics>,
}

impl FreeTextScanner {
    /// Create a scanner over a shared cache and statistics accumulator
    pub fn new(
        validators: PatternValidators,
        recognizer: Option<Arc<dyn EntityRecognizer>>,
        cache: Arc<MappingCache>,
        stats: Arc<RunStatistics>,
    ) -> Self {
        Self {
            validators,
            recognizer,
            cache,
            stats,
        }
    }

    /// Detect embedded PII spans, merged and sorted by start offset
    pub fn scan(&self, text: &str) -> Vec<TextSpan> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let mut candidates = self.validators.email_spans(text);

        let recognizer_spans = self.recognize(text);
        for (start, end) in name_token_runs(text) {
            let covered = recognizer_spans
                .iter()
                .any(|span| span.start < end && start < span.end);
            if !covered {
                candidates.push(TextSpan {
                    start,
                    end,
                    kind: PiiKind::Name,
                    origin: SpanOrigin::Heuristic,
                    text: text[start..end].to_string(),
                });
            }
        }
        candidates.extend(recognizer_spans);

        merge_spans(candidates)
    }

    /// Rewrite the text with every detected span substituted
    ///
    /// Returns the rewritten text and the substituted spans. Text between
    /// spans is copied byte-for-byte; empty or whitespace-only input is a
    /// no-op.
    pub fn scrub(&self, text: &str) -> (String, Vec<TextSpan>) {
        let spans = self.scan(text);
        if spans.is_empty() {
            return (text.to_string(), spans);
        }

        let mut rewritten = String::with_capacity(text.len());
        let mut cursor = 0;
        for span in &spans {
            rewritten.push_str(&text[cursor..span.start]);
            rewritten.push_str(&self.cache.resolve(span.kind, &span.text));
            self.stats.record_span(span.kind);
            cursor = span.end;
        }
        rewritten.push_str(&text[cursor..]);

        (rewritten, spans)
    }

    fn recognize(&self, text: &str) -> Vec<TextSpan> {
        let Some(recognizer) = &self.recognizer else {
            return Vec::new();
        };
        match recognizer.tag_persons(text) {
            Ok(persons) => persons
                .into_iter()
                .map(|person| TextSpan {
                    start: person.start,
                    end: person.end,
                    kind: PiiKind::Name,
                    origin: SpanOrigin::Recognizer,
                    text: person.text,
                })
                .collect(),
            Err(error) => {
                tracing::warn!(error = %error, "Entity recognizer failed on free text; heuristics only");
                Vec::new()
            }
        }
    }
}
