/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;

use poglot::app_config::{Config, SourceLanguageMode, TargetLanguage, MAX_BATCH_SIZE};

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.target_language, TargetLanguage::Nb);
    assert_eq!(config.source_language, SourceLanguageMode::Auto);
    assert_eq!(config.batch_size, 50);
    assert!(!config.force_all);
    assert!(config.domain_context.is_none());
    assert_eq!(config.provider.model, "gpt-4o");
    assert_eq!(config.provider.endpoint, "https://api.openai.com/v1");
    assert_eq!(config.provider.timeout_secs, 60);
    assert!((config.provider.temperature - 0.2).abs() < f32::EPSILON);
    assert_eq!(config.retry.max_attempts, 5);
    assert_eq!(config.retry.base_delay_ms, 1000);
    assert_eq!(config.retry.min_delay_ms, 2000);
    assert_eq!(config.retry.max_delay_ms, 20000);
    assert!(config.validate().is_ok());
}

/// Unspecified fields fall back to defaults when loading a partial file
#[test]
fn test_from_file_withPartialJson_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "poglot.json",
        r#"{
            "target_language": "sv",
            "batch_size": 10,
            "provider": { "model": "gpt-4o-mini" }
        }"#,
    )?;

    let config = Config::from_file(&config_path)?;

    assert_eq!(config.target_language, TargetLanguage::Sv);
    assert_eq!(config.batch_size, 10);
    assert_eq!(config.provider.model, "gpt-4o-mini");
    assert_eq!(config.source_language, SourceLanguageMode::Auto);
    assert_eq!(config.provider.endpoint, "https://api.openai.com/v1");
    assert_eq!(config.retry.min_delay_ms, 2000);
    Ok(())
}

#[test]
fn test_from_file_withInvalidJson_shouldError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path =
        common::create_test_file(&temp_dir.path().to_path_buf(), "poglot.json", "{ not json")?;

    assert!(Config::from_file(&config_path).is_err());
    Ok(())
}

#[test]
fn test_from_file_withMissingFile_shouldError() {
    assert!(Config::from_file("no/such/poglot.json").is_err());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    // Start with a valid config
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    // Batch size outside 1..=MAX_BATCH_SIZE
    config.batch_size = 0;
    assert!(config.validate().is_err());
    config.batch_size = MAX_BATCH_SIZE + 1;
    assert!(config.validate().is_err());
    config.batch_size = MAX_BATCH_SIZE;
    assert!(config.validate().is_ok());

    // Empty model name
    config.provider.model = String::new();
    assert!(config.validate().is_err());
    config.provider.model = "gpt-4o".to_string();

    // Endpoint must parse as a URL
    config.provider.endpoint = "not a url".to_string();
    assert!(config.validate().is_err());
    config.provider.endpoint = "http://localhost:1234/v1".to_string();
    assert!(config.validate().is_ok());

    // Temperature outside 0.0..=2.0
    config.provider.temperature = -0.1;
    assert!(config.validate().is_err());
    config.provider.temperature = 2.5;
    assert!(config.validate().is_err());
    config.provider.temperature = 0.2;

    // At least one attempt
    config.retry.max_attempts = 0;
    assert!(config.validate().is_err());
    config.retry.max_attempts = 1;
    assert!(config.validate().is_ok());

    // Backoff floor above the cap
    config.retry.min_delay_ms = 30_000;
    config.retry.max_delay_ms = 20_000;
    assert!(config.validate().is_err());
    config.retry.min_delay_ms = 2_000;
    assert!(config.validate().is_ok());
}

/// A key in the config file wins over the environment
#[test]
fn test_ensure_api_key_withConfiguredKey_shouldReturnIt() -> Result<()> {
    let mut config = Config::default();
    config.provider.api_key = "sk-test-key".to_string();

    assert_eq!(config.ensure_api_key()?, "sk-test-key");
    Ok(())
}

/// Test target language parsing and display
#[test]
fn test_target_language_parsing_shouldRoundTrip() {
    assert_eq!("nb".parse::<TargetLanguage>().unwrap(), TargetLanguage::Nb);
    assert_eq!("SV".parse::<TargetLanguage>().unwrap(), TargetLanguage::Sv);
    assert_eq!("da".parse::<TargetLanguage>().unwrap(), TargetLanguage::Da);
    assert!("fr".parse::<TargetLanguage>().is_err());

    assert_eq!(TargetLanguage::Nb.to_string(), "nb");
    assert_eq!(TargetLanguage::Nb.display_name(), "Norwegian Bokmål");
    assert_eq!(TargetLanguage::Sv.display_name(), "Swedish");
    assert_eq!(TargetLanguage::Da.display_name(), "Danish");
}

/// Test source language mode parsing
#[test]
fn test_source_language_mode_parsing_shouldRoundTrip() {
    assert_eq!(
        "auto".parse::<SourceLanguageMode>().unwrap(),
        SourceLanguageMode::Auto
    );
    assert_eq!(
        "en".parse::<SourceLanguageMode>().unwrap(),
        SourceLanguageMode::En
    );
    assert_eq!(
        "DE".parse::<SourceLanguageMode>().unwrap(),
        SourceLanguageMode::De
    );
    assert!("nb".parse::<SourceLanguageMode>().is_err());
    assert_eq!(SourceLanguageMode::Auto.to_string(), "auto");
}
