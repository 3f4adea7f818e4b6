//! Configuration management
//!
//! TOML configuration with `${VAR}` substitution and `MASCARA_*` environment
//! overrides.

pub mod loader;
pub mod schema;

pub use loader::load_config;
pub use schema::{
    ApplicationConfig, AuditConfig, DetectionConfig, GenerationConfig, LoggingConfig,
    MascaraConfig, DEFAULT_FREE_TEXT_MIN_CHARS, DEFAULT_SAMPLE_SIZE,
};
