//! Configuration schema types

use crate::detection::classifier::{
    EMAIL_CONTENT_THRESHOLD, KEYWORD_ONLY_CONFIDENCE, NAME_CONTENT_THRESHOLD,
};
use crate::mapping::Locale;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default number of values sampled per field during classification
pub const DEFAULT_SAMPLE_SIZE: usize = 100;

/// Default minimum length for a string field to enter the free-text pass
pub const DEFAULT_FREE_TEXT_MIN_CHARS: usize = 24;

/// Root configuration, mapping to the TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MascaraConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Classification settings
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Fake value generation settings
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Audit logging settings
    #[serde(default)]
    pub audit: AuditConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl MascaraConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.detection.validate()?;
        self.audit.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Apply `MASCARA_*` environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<(), String> {
        if let Ok(val) = std::env::var("MASCARA_LOG_LEVEL") {
            self.application.log_level = val;
        }
        if let Ok(val) = std::env::var("MASCARA_DRY_RUN") {
            self.application.dry_run = val
                .parse()
                .map_err(|_| format!("Invalid MASCARA_DRY_RUN value: {val}"))?;
        }
        if let Ok(val) = std::env::var("MASCARA_SAMPLE_SIZE") {
            self.detection.sample_size = val
                .parse()
                .map_err(|_| format!("Invalid MASCARA_SAMPLE_SIZE value: {val}"))?;
        }
        if let Ok(val) = std::env::var("MASCARA_RECOGNIZER_ENABLED") {
            self.detection.recognizer_enabled = val
                .parse()
                .map_err(|_| format!("Invalid MASCARA_RECOGNIZER_ENABLED value: {val}"))?;
        }
        if let Ok(val) = std::env::var("MASCARA_LOCALE") {
            self.generation.locale = match val.to_lowercase().as_str() {
                "en" => Locale::En,
                "pt" => Locale::Pt,
                _ => return Err(format!("Invalid MASCARA_LOCALE: {val}")),
            };
        }
        if let Ok(val) = std::env::var("MASCARA_SEED") {
            let seed = val
                .parse()
                .map_err(|_| format!("Invalid MASCARA_SEED value: {val}"))?;
            self.generation.seed = Some(seed);
        }
        if let Ok(val) = std::env::var("MASCARA_AUDIT_ENABLED") {
            self.audit.enabled = val
                .parse()
                .map_err(|_| format!("Invalid MASCARA_AUDIT_ENABLED value: {val}"))?;
        }
        if let Ok(val) = std::env::var("MASCARA_AUDIT_LOG_PATH") {
            self.audit.log_path = PathBuf::from(val);
        }
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Detect and classify only; never rewrite records
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// Classification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Values sampled per field
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,

    /// Minimum valid-email fraction for an EMAIL classification
    #[serde(default = "default_email_threshold")]
    pub email_content_threshold: f64,

    /// Minimum name-candidate fraction for a NAME classification
    #[serde(default = "default_name_threshold")]
    pub name_content_threshold: f64,

    /// Confidence assigned to keyword-only classifications
    #[serde(default = "default_keyword_only_confidence")]
    pub keyword_only_confidence: f64,

    /// Minimum string length for the free-text pass
    #[serde(default = "default_free_text_min_chars")]
    pub free_text_min_chars: usize,

    /// Use the built-in entity recognizer
    #[serde(default = "default_recognizer_enabled")]
    pub recognizer_enabled: bool,

    /// Optional custom keyword library (TOML)
    pub keyword_library: Option<PathBuf>,
}

impl DetectionConfig {
    fn validate(&self) -> Result<(), String> {
        if self.sample_size == 0 {
            return Err("sample_size must be greater than zero".to_string());
        }
        for (label, value) in [
            ("email_content_threshold", self.email_content_threshold),
            ("name_content_threshold", self.name_content_threshold),
            ("keyword_only_confidence", self.keyword_only_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{label} must be within 0..=1, got {value}"));
            }
        }
        if let Some(ref path) = self.keyword_library {
            if !path.exists() {
                return Err(format!("Keyword library not found: {}", path.display()));
            }
        }
        Ok(())
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            sample_size: default_sample_size(),
            email_content_threshold: default_email_threshold(),
            name_content_threshold: default_name_threshold(),
            keyword_only_confidence: default_keyword_only_confidence(),
            free_text_min_chars: default_free_text_min_chars(),
            recognizer_enabled: default_recognizer_enabled(),
            keyword_library: None,
        }
    }
}

/// Fake value generation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Output locale for generated names
    #[serde(default)]
    pub locale: Locale,

    /// Explicit RNG seed; fakes are freshly generated every run when unset
    ///
    /// Seeding trades the default unlinkability between runs for
    /// reproducible output, e.g. for longitudinal anonymized exports.
    pub seed: Option<u64>,
}

/// Audit logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Enable the audit trail
    #[serde(default)]
    pub enabled: bool,

    /// Audit log file path
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// Use JSON lines for audit entries
    #[serde(default = "default_audit_json_format")]
    pub json_format: bool,
}

impl AuditConfig {
    fn validate(&self) -> Result<(), String> {
        if self.enabled && self.log_path.as_os_str().is_empty() {
            return Err("audit.log_path must not be empty when audit is enabled".to_string());
        }
        Ok(())
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_log_path(),
            json_format: default_audit_json_format(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable rolling file logging in addition to the console
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Rotation policy: daily or hourly
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if !["daily", "hourly"].contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid local_rotation '{}'. Must be daily or hourly",
                self.local_rotation
            ));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_sample_size() -> usize {
    DEFAULT_SAMPLE_SIZE
}

fn default_email_threshold() -> f64 {
    EMAIL_CONTENT_THRESHOLD
}

fn default_name_threshold() -> f64 {
    NAME_CONTENT_THRESHOLD
}

fn default_keyword_only_confidence() -> f64 {
    KEYWORD_ONLY_CONFIDENCE
}

fn default_free_text_min_chars() -> usize {
    DEFAULT_FREE_TEXT_MIN_CHARS
}

fn default_recognizer_enabled() -> bool {
    true
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./audit/anonymization.log")
}

fn default_audit_json_format() -> bool {
    true
}

fn default_log_path() -> String {
    "./logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}
