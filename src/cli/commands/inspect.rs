//! Inspect command implementation
//!
//! Classifies fields without rewriting anything, so an operator can check
//! what a run would substitute before touching data.

use crate::cli::commands::load_or_default;
use crate::engine::AnonymizationEngine;
use crate::source::JsonDocumentSource;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Input file: a JSON array or NDJSON, one document per line
    #[arg(long)]
    pub input: PathBuf,

    /// Collection name the documents belong to
    #[arg(long)]
    pub collection: String,

    /// Only show fields that would be substituted
    #[arg(long)]
    pub pii_only: bool,
}

impl InspectArgs {
    /// Execute the inspect command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("❌ Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        let engine = AnonymizationEngine::new(config)?;
        let source = JsonDocumentSource::from_file(&self.collection, &self.input)?;
        let classifications = engine.classify_source(&source, &self.collection)?;

        let shown: Vec<_> = classifications
            .iter()
            .filter(|c| !self.pii_only || c.is_pii())
            .collect();

        if shown.is_empty() {
            println!("No matching fields found.");
            return Ok(0);
        }

        println!(
            "{:<45} {:<8} {:<12} {:<8}",
            "Field", "Kind", "Confidence", "Samples"
        );
        println!("{}", "-".repeat(78));
        for classification in shown {
            println!(
                "{:<45} {:<8} {:<12.2} {:<8}",
                classification.path.to_string(),
                classification
                    .kind
                    .map(|k| k.label())
                    .unwrap_or("-"),
                classification.confidence,
                classification.evidence.sampled
            );
        }

        Ok(0)
    }
}
