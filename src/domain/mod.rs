//! Core domain types
//!
//! Field addressing, classification outcomes, text spans, run statistics and
//! the domain error hierarchy shared by every component.

pub mod classification;
pub mod errors;
pub mod field;
pub mod result;
pub mod span;
pub mod stats;

pub use classification::{FieldClassification, PiiKind, SignalEvidence};
pub use errors::MascaraError;
pub use field::{FieldPath, PathSegment};
pub use result::Result;
pub use span::{merge_spans, SpanOrigin, TextSpan};
pub use stats::{RunStatistics, StatisticsSnapshot};
