//! Source boundary contracts
//!
//! The engine consumes data through these traits and never performs I/O
//! itself: a [`SampleProvider`] enumerates candidate fields with sample
//! values, and a [`RecordStream`] hands records in and accepts rewritten
//! ones back. Database drivers live behind these traits in host code;
//! [`json::JsonDocumentSource`] is the in-memory implementation used by the
//! CLI and the test suites.

pub mod json;

use crate::domain::FieldPath;
use anyhow::Result;
use serde_json::Value;

pub use json::JsonDocumentSource;

/// Enumerates fields and samples their values
pub trait SampleProvider {
    /// List every discoverable field path in a collection
    fn list_fields(&self, collection: &str) -> Result<Vec<FieldPath>>;

    /// Return up to `limit` sampled values for one field
    ///
    /// The sample should be representative; omission degrades classification
    /// confidence but never crashes it.
    fn sample_values(&self, path: &FieldPath, limit: usize) -> Result<Vec<Value>>;

    /// Number of traversals cut short by the depth bound during discovery
    fn truncations(&self) -> usize {
        0
    }
}

/// Streams records out for rewriting and accepts them back
pub trait RecordStream {
    /// Produce the next record, or `None` when the stream is exhausted
    fn next_record(&mut self) -> Result<Option<Value>>;

    /// Accept a rewritten record for persistence
    fn write_back(&mut self, record: Value) -> Result<()>;
}
