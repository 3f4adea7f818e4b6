//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::MascaraConfig;
use crate::domain::errors::MascaraError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Load configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`MascaraConfig`]
/// 4. Applies environment variable overrides (`MASCARA_*` prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, TOML parsing fails, a
/// referenced environment variable is missing, or validation fails.
pub fn load_config(path: impl AsRef<Path>) -> Result<MascaraConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MascaraError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        MascaraError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: MascaraConfig = toml::from_str(&contents)
        .map_err(|e| MascaraError::Configuration(format!("Failed to parse TOML: {e}")))?;

    config
        .apply_env_overrides()
        .map_err(MascaraError::Configuration)?;

    config.validate().map_err(|e| {
        MascaraError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitute environment variables written as `${VAR_NAME}`
fn substitute_env_vars(contents: &str) -> Result<String> {
    let pattern = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}")
        .map_err(|e| MascaraError::Configuration(format!("Invalid substitution pattern: {e}")))?;

    let mut result = String::with_capacity(contents.len());
    let mut last_end = 0;

    for captures in pattern.captures_iter(contents) {
        let whole = captures
            .get(0)
            .ok_or_else(|| MascaraError::Configuration("Malformed substitution".to_string()))?;
        let name = captures
            .get(1)
            .ok_or_else(|| MascaraError::Configuration("Malformed substitution".to_string()))?
            .as_str();

        let value = std::env::var(name).map_err(|_| {
            MascaraError::Configuration(format!(
                "Environment variable '{name}' referenced in configuration is not set"
            ))
        })?;

        result.push_str(&contents[last_end..whole.start()]);
        result.push_str(&value);
        last_end = whole.end();
    }
    result.push_str(&contents[last_end..]);

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_minimal_config() {
        let file = write_config(
            r#"
            [application]
            log_level = "debug"
            "#,
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let err = load_config("/nonexistent/mascara.toml").unwrap_err();
        assert!(matches!(err, MascaraError::Configuration(_)));
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("MASCARA_TEST_LEVEL", "warn");
        let file = write_config(
            r#"
            [application]
            log_level = "${MASCARA_TEST_LEVEL}"
            "#,
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.application.log_level, "warn");
        std::env::remove_var("MASCARA_TEST_LEVEL");
    }

    #[test]
    fn test_unset_env_variable_fails() {
        let file = write_config(
            r#"
            [application]
            log_level = "${MASCARA_DEFINITELY_UNSET_VAR}"
            "#,
        );
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_invalid_threshold_fails_validation() {
        let file = write_config(
            r#"
            [detection]
            email_content_threshold = 7.0
            "#,
        );
        assert!(load_config(file.path()).is_err());
    }
}
