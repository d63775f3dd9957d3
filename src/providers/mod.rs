/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for the supported providers:
 * - Google: public web translation endpoint (no key needed)
 * - Ollama: Local LLM server
 * - Anthropic: Anthropic API integration
 * - Mock: scripted provider for tests and dry runs
 *
 * Providers are reached through a `ProviderFactory`. The translation client
 * asks the factory for a fresh connection on every attempt, so a provider
 * never has to recover from its own failed state.
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::ProviderError;
use crate::language_utils;

/// One unit of text to translate
#[derive(Debug, Clone, PartialEq)]
pub struct TranslateRequest {
    /// Text to translate
    pub text: String,
    /// Source language code, or "auto"
    pub source_language: String,
    /// Destination language code
    pub target_language: String,
}

impl TranslateRequest {
    pub fn new(
        text: impl Into<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }
}

/// Provider reply; `text` is `None` when the provider answered without a payload
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TranslateResponse {
    pub text: Option<String>,
}

impl TranslateResponse {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self { text: Some(text.into()) }
    }

    /// The payload if it holds anything besides whitespace
    pub fn usable_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// Common trait for all translation providers
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Translate a single request
    async fn complete(&self, request: TranslateRequest) -> Result<TranslateResponse, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

/// Opens provider connections
pub trait ProviderFactory: Send + Sync + Debug {
    /// Open a new connection whose requests time out after `timeout`
    fn connect(&self, timeout: Duration) -> Result<Box<dyn Provider>, ProviderError>;

    /// Name used in logs
    fn name(&self) -> String;
}

/// Factory for the provider selected in the configuration
#[derive(Debug, Clone)]
pub struct ConfiguredProviderFactory {
    provider: TranslationProvider,
    endpoint: String,
    api_key: String,
    model: String,
    system_prompt: String,
    temperature: f32,
}

impl ConfiguredProviderFactory {
    pub fn new(config: &TranslationConfig, source_language: &str, target_language: &str) -> Self {
        let system_prompt = config
            .common
            .system_prompt
            .replace("{source_language}", &language_utils::prompt_language_name(source_language))
            .replace("{target_language}", &language_utils::prompt_language_name(target_language));

        Self {
            provider: config.provider.clone(),
            endpoint: config.get_endpoint(),
            api_key: config.get_api_key(),
            model: config.get_model(),
            system_prompt,
            temperature: config.common.temperature,
        }
    }

    /// Shared handle for the translation client
    pub fn shared(config: &TranslationConfig, source_language: &str, target_language: &str) -> Arc<dyn ProviderFactory> {
        Arc::new(Self::new(config, source_language, target_language))
    }
}

impl ProviderFactory for ConfiguredProviderFactory {
    fn connect(&self, timeout: Duration) -> Result<Box<dyn Provider>, ProviderError> {
        match self.provider {
            TranslationProvider::Google => {
                Ok(Box::new(google::GoogleTranslate::new(&self.endpoint, timeout)?))
            }
            TranslationProvider::Ollama => Ok(Box::new(
                ollama::Ollama::new(&self.endpoint, &self.model, timeout)?
                    .system(&self.system_prompt)
                    .temperature(self.temperature),
            )),
            TranslationProvider::Anthropic => {
                if self.api_key.is_empty() {
                    return Err(ProviderError::Unavailable("Anthropic API key is not set".to_string()));
                }
                Ok(Box::new(
                    anthropic::Anthropic::new(&self.api_key, &self.endpoint, &self.model, timeout)?
                        .system(&self.system_prompt)
                        .temperature(self.temperature),
                ))
            }
        }
    }

    fn name(&self) -> String {
        self.provider.display_name().to_string()
    }
}

/// Build the HTTP client used by every provider connection
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::Unavailable(format!("Failed to build HTTP client: {}", e)))
}

/// Turn a reqwest send failure into a provider error
pub(crate) fn send_error(provider: &str, error: reqwest::Error) -> ProviderError {
    if error.is_timeout() || error.is_connect() {
        ProviderError::ConnectionError(format!("{}: {}", provider, error))
    } else {
        ProviderError::RequestFailed(format!("{}: {}", provider, error))
    }
}

pub mod anthropic;
pub mod google;
pub mod mock;
pub mod ollama;
