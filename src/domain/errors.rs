//! Domain error types
//!
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Mascara error type
///
/// Used at the configuration and domain boundary; the detection and
/// anonymization layers work with `anyhow` internally and surface context
/// through it.
#[derive(Debug, Error)]
pub enum MascaraError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Field classification errors
    #[error("Detection error: {0}")]
    Detection(String),

    /// Schema traversal errors
    #[error("Traversal error: {0}")]
    Traversal(String),

    /// Value substitution errors
    #[error("Substitution error: {0}")]
    Substitution(String),

    /// Source enumeration or streaming errors
    #[error("Source error: {0}")]
    Source(String),

    /// Audit logging errors
    #[error("Audit error: {0}")]
    Audit(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl From<std::io::Error> for MascaraError {
    fn from(err: std::io::Error) -> Self {
        MascaraError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for MascaraError {
    fn from(err: serde_json::Error) -> Self {
        MascaraError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for MascaraError {
    fn from(err: toml::de::Error) -> Self {
        MascaraError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<regex::Error> for MascaraError {
    fn from(err: regex::Error) -> Self {
        MascaraError::Detection(format!("invalid pattern: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MascaraError::Configuration("missing threshold".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing threshold");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: MascaraError = io_err.into();
        assert!(matches!(err, MascaraError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: MascaraError = json_err.into();
        assert!(matches!(err, MascaraError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("a = b = c").unwrap_err();
        let err: MascaraError = toml_err.into();
        assert!(matches!(err, MascaraError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_implements_std_error() {
        let err = MascaraError::Detection("bad sample".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
