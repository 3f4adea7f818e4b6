//! Run command implementation
//!
//! Anonymizes a JSON/NDJSON document file and writes the rewritten records.

use crate::cli::commands::load_or_default;
use crate::engine::AnonymizationEngine;
use crate::source::JsonDocumentSource;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Input file: a JSON array or NDJSON, one document per line
    #[arg(long)]
    pub input: PathBuf,

    /// Collection name the documents belong to
    #[arg(long)]
    pub collection: String,

    /// Output file for rewritten records (NDJSON); defaults to <input>.anonymized
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Also write the run report as JSON to this path
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl RunArgs {
    /// Execute the run command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("❌ Failed to load configuration: {e}");
                return Ok(2);
            }
        };
        let dry_run = config.application.dry_run;

        let engine = AnonymizationEngine::new(config)?;
        let mut source = JsonDocumentSource::from_file(&self.collection, &self.input)?;
        tracing::info!(
            input = %self.input.display(),
            records = source.len(),
            "Loaded documents"
        );

        let report = engine.run(&mut source, &self.collection)?;
        println!("{}", report.format_console());

        if let Some(ref path) = self.report {
            report.write_to_file(path)?;
            println!("Report written to {}", path.display());
        }

        if dry_run {
            println!("Dry-run mode: no records were rewritten.");
            return Ok(0);
        }

        let output = self
            .output
            .clone()
            .unwrap_or_else(|| self.input.with_extension("anonymized.ndjson"));
        source.write_ndjson(&output)?;
        println!(
            "Wrote {} anonymized record(s) to {}",
            source.rewritten().len(),
            output.display()
        );

        Ok(0)
    }
}
