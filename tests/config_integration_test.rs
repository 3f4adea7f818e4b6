//! Configuration loading integration tests

use mascara::config::{load_config, MascaraConfig, DEFAULT_SAMPLE_SIZE};
use mascara::engine::AnonymizationEngine;
use mascara::mapping::Locale;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_full_config_round_trip() {
    let file = write_config(
        r#"
        [application]
        log_level = "debug"
        dry_run = true

        [detection]
        sample_size = 25
        email_content_threshold = 0.6
        name_content_threshold = 0.3
        free_text_min_chars = 10
        recognizer_enabled = false

        [generation]
        locale = "pt"
        seed = 7

        [audit]
        enabled = false
        "#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.application.log_level, "debug");
    assert!(config.application.dry_run);
    assert_eq!(config.detection.sample_size, 25);
    assert!((config.detection.email_content_threshold - 0.6).abs() < f64::EPSILON);
    assert!(!config.detection.recognizer_enabled);
    assert_eq!(config.generation.locale, Locale::Pt);
    assert_eq!(config.generation.seed, Some(7));
}

#[test]
fn test_partial_config_fills_defaults() {
    let file = write_config(
        r#"
        [detection]
        name_content_threshold = 0.55
        "#,
    );
    let config = load_config(file.path()).unwrap();
    assert_eq!(config.detection.sample_size, DEFAULT_SAMPLE_SIZE);
    assert!((config.detection.name_content_threshold - 0.55).abs() < f64::EPSILON);
    assert_eq!(config.application.log_level, "info");
}

#[test]
fn test_out_of_range_threshold_rejected() {
    let file = write_config(
        r#"
        [detection]
        name_content_threshold = 1.7
        "#,
    );
    assert!(load_config(file.path()).is_err());
}

#[test]
fn test_engine_accepts_loaded_config() {
    let file = write_config(
        r#"
        [detection]
        sample_size = 10

        [generation]
        seed = 3
        "#,
    );
    let config = load_config(file.path()).unwrap();
    assert!(AnonymizationEngine::new(config).is_ok());
}

#[test]
fn test_custom_keyword_library_wires_into_classification() {
    use mascara::source::JsonDocumentSource;
    use serde_json::json;

    let mut keywords = NamedTempFile::new().unwrap();
    keywords
        .write_all(
            br#"
            [keywords.name]
            terms = ["subscriber"]
            [keywords.email]
            terms = ["inbox"]
            "#,
        )
        .unwrap();

    let mut config = MascaraConfig::default();
    config.detection.keyword_library = Some(keywords.path().to_path_buf());
    config.generation.seed = Some(5);
    let engine = AnonymizationEngine::new(config).unwrap();

    // Sample is null-heavy, so only the custom keyword can carry the field.
    let source = JsonDocumentSource::new(
        "newsletter",
        vec![json!({"subscriber": null}), json!({"subscriber": null})],
    );
    let classifications = engine.classify_source(&source, "newsletter").unwrap();
    assert_eq!(classifications.len(), 1);
    assert!(classifications[0].is_pii());
}

#[test]
fn test_missing_explicit_config_file_errors() {
    assert!(load_config("/definitely/not/here.toml").is_err());
}
