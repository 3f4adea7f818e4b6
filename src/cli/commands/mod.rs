//! CLI command implementations

pub mod inspect;
pub mod run;

use crate::config::{load_config, MascaraConfig};
use std::path::Path;

/// Load the configuration file, or defaults when the implicit path is absent
///
/// A missing explicitly-given path is an error; the default `mascara.toml`
/// is optional.
pub(crate) fn load_or_default(config_path: &str) -> crate::domain::Result<MascaraConfig> {
    if !Path::new(config_path).exists() && config_path == "mascara.toml" {
        tracing::info!("No mascara.toml found; using default configuration");
        return Ok(MascaraConfig::default());
    }
    load_config(config_path)
}
