//! In-memory JSON document source
//!
//! Holds a collection of JSON documents (loaded from a JSON array or an
//! NDJSON file) and implements both boundary traits over it. Field discovery
//! unions the traversal of a bounded number of sample records, since
//! document stores carry no declared schema.

use crate::domain::{FieldPath, PathSegment};
use crate::source::{RecordStream, SampleProvider};
use crate::traversal::{discover_fields, TraversalOutcome, MAX_TRAVERSAL_DEPTH};
use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Records examined when discovering the field set
const SCHEMA_SAMPLE_RECORDS: usize = 100;

/// In-memory document collection implementing the source boundary
pub struct JsonDocumentSource {
    collection: String,
    records: Vec<Value>,
    cursor: usize,
    rewritten: Vec<Value>,
    truncations: AtomicUsize,
}

impl JsonDocumentSource {
    /// Create a source over documents already in memory
    pub fn new(collection: impl Into<String>, records: Vec<Value>) -> Self {
        Self {
            collection: collection.into(),
            records,
            cursor: 0,
            rewritten: Vec::new(),
            truncations: AtomicUsize::new(0),
        }
    }

    /// Load documents from a JSON array file or an NDJSON file
    pub fn from_file<P: AsRef<Path>>(collection: impl Into<String>, path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?;

        let records = if content.trim_start().starts_with('[') {
            let parsed: Value = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON array: {}", path.display()))?;
            match parsed {
                Value::Array(records) => records,
                _ => bail!("Expected a JSON array in {}", path.display()),
            }
        } else {
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|line| {
                    serde_json::from_str(line)
                        .with_context(|| format!("Failed to parse NDJSON line: {line}"))
                })
                .collect::<Result<Vec<Value>>>()?
        };

        Ok(Self::new(collection, records))
    }

    /// The collection name this source was created with
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Documents accepted back through [`RecordStream::write_back`]
    pub fn rewritten(&self) -> &[Value] {
        &self.rewritten
    }

    /// Number of source documents
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the source holds no documents
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Write the rewritten documents as NDJSON
    pub fn write_ndjson<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }
        }
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        for record in &self.rewritten {
            let line = serde_json::to_string(record).context("Failed to serialize record")?;
            writeln!(file, "{line}").context("Failed to write record")?;
        }
        Ok(())
    }

    fn collect_values<'a>(value: &'a Value, segments: &[PathSegment], out: &mut Vec<&'a Value>) {
        match segments.split_first() {
            None => out.push(value),
            Some((PathSegment::Key(key), rest)) => {
                if let Some(child) = value.get(key) {
                    Self::collect_values(child, rest, out);
                }
            }
            Some((PathSegment::Array, rest)) => {
                if let Some(elements) = value.as_array() {
                    for element in elements {
                        Self::collect_values(element, rest, out);
                    }
                }
            }
        }
    }
}

impl SampleProvider for JsonDocumentSource {
    fn list_fields(&self, collection: &str) -> Result<Vec<FieldPath>> {
        if collection != self.collection {
            bail!(
                "Unknown collection '{collection}' (this source holds '{}')",
                self.collection
            );
        }

        let mut outcome = TraversalOutcome::default();
        for record in self.records.iter().take(SCHEMA_SAMPLE_RECORDS) {
            outcome.merge(discover_fields(collection, record, MAX_TRAVERSAL_DEPTH));
        }
        if outcome.truncated {
            self.truncations.fetch_add(1, Ordering::Relaxed);
        }
        Ok(outcome.paths)
    }

    fn sample_values(&self, path: &FieldPath, limit: usize) -> Result<Vec<Value>> {
        let mut values: Vec<&Value> = Vec::new();
        for record in &self.records {
            Self::collect_values(record, path.segments(), &mut values);
        }

        // Stride over the whole collection so the sample is not biased
        // toward the earliest records.
        let sampled: Vec<Value> = if values.len() > limit && limit > 0 {
            let stride = values.len() / limit;
            values
                .iter()
                .step_by(stride.max(1))
                .take(limit)
                .map(|v| (*v).clone())
                .collect()
        } else {
            values.into_iter().cloned().collect()
        };

        Ok(sampled)
    }

    fn truncations(&self) -> usize {
        self.truncations.load(Ordering::Relaxed)
    }
}

impl RecordStream for JsonDocumentSource {
    fn next_record(&mut self) -> Result<Option<Value>> {
        if self.cursor >= self.records.len() {
            return Ok(None);
        }
        let record = self.records[self.cursor].clone();
        self.cursor += 1;
        Ok(Some(record))
    }

    fn write_back(&mut self, record: Value) -> Result<()> {
        self.rewritten.push(record);
        Ok(())
    }
}
