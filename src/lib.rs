// Mascara - Schema-agnostic PII anonymization
// Copyright (c) 2025 Mascara Contributors
// Licensed under the MIT License

//! # Mascara - schema-agnostic PII anonymization
//!
//! Mascara scans schema-unknown tabular and document data, identifies fields
//! and free-text spans containing PII (person names and email addresses), and
//! replaces each distinct original value with a fake value, guaranteeing
//! that every occurrence of the same original anywhere in a run maps to the
//! same fake.
//!
//! ## Architecture
//!
//! - [`detection`] - keyword registry, pattern validators, entity recognizer
//!   boundary and the field classifier combining them
//! - [`mapping`] - the run-scoped consistency cache and fake value generators
//! - [`anonymizer`] - structured-field substitution and the free-text scanner
//! - [`traversal`] - bounded schema discovery over nested documents
//! - [`engine`] - the orchestrator tying the pipeline together per source
//! - [`source`] - boundary traits the surrounding I/O layers implement
//! - [`report`] / [`audit`] - run reporting and the hashed audit trail
//! - [`config`] / [`logging`] / [`cli`] - configuration, observability, CLI
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mascara::config::MascaraConfig;
//! use mascara::engine::AnonymizationEngine;
//! use mascara::source::JsonDocumentSource;
//!
//! fn main() -> anyhow::Result<()> {
//!     let engine = AnonymizationEngine::new(MascaraConfig::default())?;
//!     let mut source = JsonDocumentSource::from_file("reviews", "reviews.ndjson")?;
//!
//!     let report = engine.run(&mut source, "reviews")?;
//!     println!("{}", report.format_console());
//!
//!     source.write_ndjson("reviews.anonymized.ndjson")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Consistency guarantees
//!
//! Within one run, `resolve(kind, value)` is deterministic and injective: the
//! same original always maps to the same fake, and two distinct originals
//! never share one. Across runs fakes are freshly generated by default, so
//! two anonymized snapshots cannot be correlated through stable fake values;
//! set `generation.seed` or seed the cache from an exported mapping table
//! when longitudinal consistency is required instead.

pub mod anonymizer;
pub mod audit;
pub mod cli;
pub mod config;
pub mod detection;
pub mod domain;
pub mod engine;
pub mod logging;
pub mod mapping;
pub mod report;
pub mod source;
pub mod traversal;

pub use config::MascaraConfig;
pub use domain::{FieldClassification, FieldPath, MascaraError, PiiKind};
pub use engine::AnonymizationEngine;
pub use report::RunReport;
