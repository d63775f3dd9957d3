/*!
 * Tests for application configuration functionality
 */

use std::time::Duration;

use pagewise::app_config::{
    ChunkingConfig, Config, LogLevel, MergeStrategy, PacingConfig, ProviderConfig, TranslationProvider,
};

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "auto");
    assert_eq!(config.target_language, "en");
    assert_eq!(config.translation.provider, TranslationProvider::Google);
    assert_eq!(config.log_level, LogLevel::Info);

    let common = &config.translation.common;
    assert_eq!(common.retry_count, 5);
    assert_eq!(common.retry_backoff_ms, 1000);
    assert_eq!(common.min_text_length, 5);
    assert_eq!(common.formatting_symbol_ratio, 0.25);
    assert_eq!(common.min_cjk_payload, 10);
    assert!(common.cache_enabled);

    assert_eq!(config.chunking.max_length, 800);
    assert_eq!(config.chunking.overlap, 100);
    assert_eq!(config.chunking.chunking_threshold, 1000);
    assert_eq!(config.chunking.merge_strategy, MergeStrategy::Concatenate);

    assert_eq!(config.classifier.toc_dot_ratio, 0.15);
    assert_eq!(config.classifier.toc_page_marker_count, 10);

    assert_eq!(config.pacing.page_delay(), Duration::from_secs(2));
    assert_eq!(config.pacing.chunk_delay(), Duration::from_secs(1));
    assert_eq!(config.pacing.toc_item_delay(), Duration::from_millis(500));
    assert_eq!(config.pacing.max_toc_items, None);
}

#[test]
fn test_default_config_shouldListEveryProvider() {
    let config = Config::default();

    for provider in [TranslationProvider::Google, TranslationProvider::Ollama, TranslationProvider::Anthropic] {
        assert!(config.translation.get_provider_config(&provider).is_some());
    }
    assert_eq!(config.translation.get_endpoint(), "https://translate.googleapis.com");
    assert_eq!(config.translation.get_model(), "");
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    // Invalid source language
    config.source_language = "invalid".to_string();
    assert!(config.validate().is_err());
    config.source_language = "zh".to_string();
    assert!(config.validate().is_ok());

    // Invalid target language
    config.target_language = "".to_string();
    assert!(config.validate().is_err());
    config.target_language = "en".to_string();

    // Anthropic requires an API key
    config.translation.provider = TranslationProvider::Anthropic;
    assert!(config.validate().is_err());
    config.translation.available_providers = vec![ProviderConfig {
        api_key: "test-key".to_string(),
        ..ProviderConfig::new(TranslationProvider::Anthropic)
    }];
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_validation_withBadChunking_shouldFail() {
    let mut config = Config::default();
    config.chunking = ChunkingConfig {
        max_length: 100,
        overlap: 100,
        ..ChunkingConfig::default()
    };
    assert!(config.validate().is_err());

    config.chunking.max_length = 0;
    config.chunking.overlap = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_withZeroRetries_shouldFail() {
    let mut config = Config::default();
    config.translation.common.retry_count = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_set_model_shouldUpdateActiveProvider() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Ollama;
    assert_eq!(config.translation.get_model(), "qwen2.5:7b");

    config.translation.set_model("llama3");
    assert_eq!(config.translation.get_model(), "llama3");

    config.translation.available_providers.clear();
    config.translation.set_model("mistral");
    assert_eq!(config.translation.get_model(), "mistral");
    assert_eq!(config.translation.get_endpoint(), "http://localhost:11434");
}

#[test]
fn test_config_deserialize_withMinimalJson_shouldFillDefaults() {
    let json = r#"{
        "source_language": "zh",
        "target_language": "en",
        "translation": {"provider": "ollama"}
    }"#;

    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.translation.provider, TranslationProvider::Ollama);
    assert!(config.translation.available_providers.is_empty());
    assert_eq!(config.translation.get_model(), "qwen2.5:7b");
    assert_eq!(config.translation.common.retry_count, 5);
    assert_eq!(config.pacing.page_delay_ms, 2000);
    assert_eq!(config.log_level, LogLevel::Info);
}

#[test]
fn test_config_serialize_shouldRoundTripProviderNames() {
    let json = serde_json::to_value(Config::default()).unwrap();
    assert_eq!(json["translation"]["provider"], "google");
    assert_eq!(json["translation"]["available_providers"][1]["type"], "ollama");
    assert_eq!(json["chunking"]["merge_strategy"], "concatenate");
}

#[test]
fn test_provider_from_str_shouldIgnoreCase() {
    assert_eq!("Anthropic".parse::<TranslationProvider>().unwrap(), TranslationProvider::Anthropic);
    assert!("openai".parse::<TranslationProvider>().is_err());
    assert_eq!(TranslationProvider::Ollama.to_string(), "ollama");
    assert_eq!(TranslationProvider::Google.display_name(), "Google");
}

#[test]
fn test_pacing_none_shouldHaveNoDelays() {
    let pacing = PacingConfig::none();
    assert!(pacing.page_delay().is_zero());
    assert!(pacing.chunk_delay().is_zero());
    assert!(pacing.toc_item_delay().is_zero());
}

#[test]
fn test_log_level_to_level_filter_shouldMapEveryLevel() {
    assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}
