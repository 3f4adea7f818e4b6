//! Tagged text spans and overlap resolution
//!
//! Spans from heterogeneous detectors (email regex, entity recognizer,
//! capitalized-run heuristic) are represented uniformly so that overlap
//! resolution is a single, total-order rule: the longer span wins, and on an
//! exact length tie the higher-priority origin wins.

use crate::domain::PiiKind;
use serde::{Deserialize, Serialize};

/// Signal that produced a span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanOrigin {
    /// Entity recognizer PERSON tag
    Recognizer,
    /// Exact pattern validator (email regex)
    Pattern,
    /// Structural capitalized-token heuristic
    Heuristic,
}

impl SpanOrigin {
    /// Tie-break priority; higher wins on equal span length
    pub fn priority(self) -> u8 {
        match self {
            Self::Recognizer => 2,
            Self::Pattern => 1,
            Self::Heuristic => 0,
        }
    }
}

/// A located, classified substring within one text value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSpan {
    /// Byte offset of the first matched character
    pub start: usize,
    /// Byte offset one past the last matched character
    pub end: usize,
    /// Kind of PII the span carries
    pub kind: PiiKind,
    /// Signal that produced the span
    pub origin: SpanOrigin,
    /// The matched substring
    pub text: String,
}

impl TextSpan {
    /// Span length in bytes
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers no characters
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether two spans share at least one character
    pub fn overlaps(&self, other: &TextSpan) -> bool {
        self.start < other.end && other.start < self.end
    }

    fn beats(&self, other: &TextSpan) -> bool {
        self.len() > other.len()
            || (self.len() == other.len() && self.origin.priority() > other.origin.priority())
    }
}

/// Resolve overlapping candidate spans into a sorted, non-overlapping set
///
/// Candidates are ordered by start offset; within a conflict the longer span
/// is kept, then the higher-priority origin on an exact length tie. Adjacent
/// spans (touching but not sharing characters) are left distinct.
pub fn merge_spans(mut spans: Vec<TextSpan>) -> Vec<TextSpan> {
    spans.retain(|s| !s.is_empty());
    spans.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then(b.len().cmp(&a.len()))
            .then(b.origin.priority().cmp(&a.origin.priority()))
    });

    let mut merged: Vec<TextSpan> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last() {
            Some(last) if span.overlaps(last) => {
                if span.beats(last) {
                    merged.pop();
                    merged.push(span);
                }
            }
            _ => merged.push(span),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize, end: usize, kind: PiiKind, origin: SpanOrigin) -> TextSpan {
        TextSpan {
            start,
            end,
            kind,
            origin,
            text: String::new(),
        }
    }

    #[test]
    fn test_longer_span_wins() {
        let merged = merge_spans(vec![
            span(0, 4, PiiKind::Name, SpanOrigin::Recognizer),
            span(0, 10, PiiKind::Name, SpanOrigin::Heuristic),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].end, 10);
        assert_eq!(merged[0].origin, SpanOrigin::Heuristic);
    }

    #[test]
    fn test_equal_length_prefers_recognizer() {
        let merged = merge_spans(vec![
            span(2, 8, PiiKind::Name, SpanOrigin::Heuristic),
            span(2, 8, PiiKind::Name, SpanOrigin::Recognizer),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].origin, SpanOrigin::Recognizer);
    }

    #[test]
    fn test_disjoint_spans_kept_sorted() {
        let merged = merge_spans(vec![
            span(20, 30, PiiKind::Email, SpanOrigin::Pattern),
            span(0, 5, PiiKind::Name, SpanOrigin::Recognizer),
        ]);
        assert_eq!(merged.len(), 2);
        assert!(merged[0].start < merged[1].start);
    }

    #[test]
    fn test_adjacent_spans_stay_distinct() {
        let merged = merge_spans(vec![
            span(0, 5, PiiKind::Name, SpanOrigin::Recognizer),
            span(5, 12, PiiKind::Email, SpanOrigin::Pattern),
        ]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_result_is_non_overlapping() {
        let merged = merge_spans(vec![
            span(0, 6, PiiKind::Name, SpanOrigin::Heuristic),
            span(4, 9, PiiKind::Name, SpanOrigin::Recognizer),
            span(8, 14, PiiKind::Email, SpanOrigin::Pattern),
        ]);
        for pair in merged.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
    }

    #[test]
    fn test_empty_spans_dropped() {
        let merged = merge_spans(vec![span(3, 3, PiiKind::Name, SpanOrigin::Heuristic)]);
        assert!(merged.is_empty());
    }
}
