use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::time::Duration;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO), or "auto" to let the provider detect it
    pub source_language: String,

    /// Target language code (ISO)
    pub target_language: String,

    /// Translation config
    pub translation: TranslationConfig,

    /// Chunking of long pages
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Content classification thresholds
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Delays between consecutive provider calls
    #[serde(default)]
    pub pacing: PacingConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Google web translation endpoint
    #[default]
    Google,
    // @provider: Ollama
    Ollama,
    // @provider: Anthropic
    Anthropic,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Google => "Google",
            Self::Ollama => "Ollama",
            Self::Anthropic => "Anthropic",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Google => "google".to_string(),
            Self::Ollama => "ollama".to_string(),
            Self::Anthropic => "anthropic".to_string(),
        }
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "ollama" => Ok(Self::Ollama),
            "anthropic" => Ok(Self::Anthropic),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name (LLM providers only)
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        match provider_type {
            TranslationProvider::Google => Self {
                provider_type: "google".to_string(),
                model: String::new(),
                api_key: String::new(),
                endpoint: default_google_endpoint(),
            },
            TranslationProvider::Ollama => Self {
                provider_type: "ollama".to_string(),
                model: default_ollama_model(),
                api_key: String::new(),
                endpoint: default_ollama_endpoint(),
            },
            TranslationProvider::Anthropic => Self {
                provider_type: "anthropic".to_string(),
                model: default_anthropic_model(),
                api_key: String::new(),
                endpoint: default_anthropic_endpoint(),
            },
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Common translation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// System prompt template for LLM providers
    /// Placeholders: {source_language}, {target_language}
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Total attempts per unit of text, first call included
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Base backoff in milliseconds, doubled after every failed attempt
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Shortest cleaned text that is worth sending
    #[serde(default = "default_min_text_length")]
    pub min_text_length: usize,

    /// Share of '.', '-' and '_' above which text counts as formatting
    #[serde(default = "default_formatting_symbol_ratio")]
    pub formatting_symbol_ratio: f64,

    /// Shortest CJK payload worth translating out of formatting-heavy text
    #[serde(default = "default_min_cjk_payload")]
    pub min_cjk_payload: usize,

    /// Request timeout before any length-based extension
    #[serde(default = "default_timeout_base_secs")]
    pub timeout_base_secs: u64,

    /// Seconds added per 100 characters of input
    #[serde(default = "default_timeout_step_secs")]
    pub timeout_step_secs: u64,

    /// Upper bound of the request timeout
    #[serde(default = "default_timeout_max_secs")]
    pub timeout_max_secs: u64,

    /// Temperature parameter for LLM providers (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Reuse translations of identical units within a run
    #[serde(default = "default_true")]
    pub cache_enabled: bool,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            min_text_length: default_min_text_length(),
            formatting_symbol_ratio: default_formatting_symbol_ratio(),
            min_cjk_payload: default_min_cjk_payload(),
            timeout_base_secs: default_timeout_base_secs(),
            timeout_step_secs: default_timeout_step_secs(),
            timeout_max_secs: default_timeout_max_secs(),
            temperature: default_temperature(),
            cache_enabled: true,
        }
    }
}

/// How translated chunks are joined back together
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Space-join every chunk; overlapping context is translated twice
    #[default]
    Concatenate,
    /// Send each overlap span only once, then space-join
    DropOverlap,
}

/// Settings for splitting long pages into translation units
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChunkingConfig {
    /// Maximum characters per chunk
    #[serde(default = "default_max_chunk_length")]
    pub max_length: usize,

    /// Characters of context repeated at the start of the next chunk
    #[serde(default = "default_chunk_overlap")]
    pub overlap: usize,

    /// Extra characters read past `max_length` when looking for a boundary
    #[serde(default = "default_chunk_lookahead")]
    pub lookahead: usize,

    /// Pages up to this many characters are translated in one call
    #[serde(default = "default_chunking_threshold")]
    pub chunking_threshold: usize,

    /// Merge behaviour for chunk translations
    #[serde(default)]
    pub merge_strategy: MergeStrategy,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_length: default_max_chunk_length(),
            overlap: default_chunk_overlap(),
            lookahead: default_chunk_lookahead(),
            chunking_threshold: default_chunking_threshold(),
            merge_strategy: MergeStrategy::default(),
        }
    }
}

/// Thresholds for the table-of-contents and table heuristics
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ClassifierConfig {
    #[serde(default = "default_toc_dot_ratio")]
    pub toc_dot_ratio: f64,
    #[serde(default = "default_toc_dash_ratio")]
    pub toc_dash_ratio: f64,
    #[serde(default = "default_toc_page_marker_count")]
    pub toc_page_marker_count: usize,
    #[serde(default = "default_toc_deep_number_count")]
    pub toc_deep_number_count: usize,
    #[serde(default = "default_table_border_chars")]
    pub table_border_chars: usize,
    /// Lines within this fraction of the mean length count as uniform
    #[serde(default = "default_uniform_line_tolerance")]
    pub uniform_line_tolerance: f64,
    /// Fraction of uniform lines needed to call a block tabular
    #[serde(default = "default_uniform_line_share")]
    pub uniform_line_share: f64,
    #[serde(default = "default_uniform_min_lines")]
    pub uniform_min_lines: usize,
    /// Whitespace-separated cells a line needs to count as a table row
    #[serde(default = "default_uniform_min_cells")]
    pub uniform_min_cells: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            toc_dot_ratio: default_toc_dot_ratio(),
            toc_dash_ratio: default_toc_dash_ratio(),
            toc_page_marker_count: default_toc_page_marker_count(),
            toc_deep_number_count: default_toc_deep_number_count(),
            table_border_chars: default_table_border_chars(),
            uniform_line_tolerance: default_uniform_line_tolerance(),
            uniform_line_share: default_uniform_line_share(),
            uniform_min_lines: default_uniform_min_lines(),
            uniform_min_cells: default_uniform_min_cells(),
        }
    }
}

/// Sleeps inserted between provider calls to stay under informal rate limits
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PacingConfig {
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,
    #[serde(default = "default_chunk_delay_ms")]
    pub chunk_delay_ms: u64,
    #[serde(default = "default_toc_item_delay_ms")]
    pub toc_item_delay_ms: u64,
    /// Translate at most this many TOC items per page, None for all
    #[serde(default)]
    pub max_toc_items: Option<usize>,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            page_delay_ms: default_page_delay_ms(),
            chunk_delay_ms: default_chunk_delay_ms(),
            toc_item_delay_ms: default_toc_item_delay_ms(),
            max_toc_items: None,
        }
    }
}

impl PacingConfig {
    /// No delays at all, for tests and dry runs
    pub fn none() -> Self {
        Self {
            page_delay_ms: 0,
            chunk_delay_ms: 0,
            toc_item_delay_ms: 0,
            max_toc_items: None,
        }
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    pub fn chunk_delay(&self) -> Duration {
        Duration::from_millis(self.chunk_delay_ms)
    }

    pub fn toc_item_delay(&self) -> Duration {
        Duration::from_millis(self.toc_item_delay_ms)
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_retry_count() -> u32 {
    5
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_min_text_length() -> usize {
    5
}

fn default_formatting_symbol_ratio() -> f64 {
    0.25
}

fn default_min_cjk_payload() -> usize {
    10
}

fn default_timeout_base_secs() -> u64 {
    30
}

fn default_timeout_step_secs() -> u64 {
    10
}

fn default_timeout_max_secs() -> u64 {
    180
}

fn default_temperature() -> f32 {
    0.3
}

fn default_true() -> bool {
    true
}

fn default_max_chunk_length() -> usize {
    800
}

fn default_chunk_overlap() -> usize {
    100
}

fn default_chunk_lookahead() -> usize {
    200
}

fn default_chunking_threshold() -> usize {
    1000
}

fn default_toc_dot_ratio() -> f64 {
    0.15
}

fn default_toc_dash_ratio() -> f64 {
    0.10
}

fn default_toc_page_marker_count() -> usize {
    10
}

fn default_toc_deep_number_count() -> usize {
    15
}

fn default_table_border_chars() -> usize {
    5
}

fn default_uniform_line_tolerance() -> f64 {
    0.3
}

fn default_uniform_line_share() -> f64 {
    0.6
}

fn default_uniform_min_lines() -> usize {
    3
}

fn default_uniform_min_cells() -> usize {
    2
}

fn default_page_delay_ms() -> u64 {
    2000
}

fn default_chunk_delay_ms() -> u64 {
    1000
}

fn default_toc_item_delay_ms() -> u64 {
    500
}

fn default_google_endpoint() -> String {
    "https://translate.googleapis.com".to_string()
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_anthropic_endpoint() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_ollama_model() -> String {
    "qwen2.5:7b".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-haiku-20240307".to_string()
}

fn default_system_prompt() -> String {
    "You are a professional translator. Translate the following text from {source_language} to {target_language}. Keep section numbers and page numbers unchanged. Only respond with the translated text.".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.source_language != "auto" {
            crate::language_utils::get_language_name(&self.source_language)?;
        }
        crate::language_utils::get_language_name(&self.target_language)?;

        if self.translation.provider == TranslationProvider::Anthropic
            && self.translation.get_api_key().is_empty()
        {
            return Err(anyhow!("Translation API key is required for Anthropic provider"));
        }

        if self.translation.common.retry_count == 0 {
            return Err(anyhow!("retry_count must allow at least one attempt"));
        }

        if self.chunking.max_length == 0 {
            return Err(anyhow!("chunking.max_length must be greater than zero"));
        }

        if self.chunking.overlap >= self.chunking.max_length {
            return Err(anyhow!(
                "chunking.overlap ({}) must be smaller than chunking.max_length ({})",
                self.chunking.overlap,
                self.chunking.max_length
            ));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: "auto".to_string(),
            target_language: "en".to_string(),
            translation: TranslationConfig::default(),
            chunking: ChunkingConfig::default(),
            classifier: ClassifierConfig::default(),
            pacing: PacingConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.provider)
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: &TranslationProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers.iter().find(|p| p.provider_type == provider_str)
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        match self.provider {
            TranslationProvider::Google => String::new(),
            TranslationProvider::Ollama => default_ollama_model(),
            TranslationProvider::Anthropic => default_anthropic_model(),
        }
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        self.get_active_provider_config()
            .map(|p| p.api_key.clone())
            .unwrap_or_default()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        match self.provider {
            TranslationProvider::Google => default_google_endpoint(),
            TranslationProvider::Ollama => default_ollama_endpoint(),
            TranslationProvider::Anthropic => default_anthropic_endpoint(),
        }
    }

    /// Override the model of the active provider, adding its entry if missing
    pub fn set_model(&mut self, model: &str) {
        let provider = self.provider.clone();
        let provider_str = provider.to_lowercase_string();
        match self.available_providers.iter_mut().find(|p| p.provider_type == provider_str) {
            Some(provider_config) => provider_config.model = model.to_string(),
            None => {
                let mut provider_config = ProviderConfig::new(provider);
                provider_config.model = model.to_string();
                self.available_providers.push(provider_config);
            }
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            available_providers: vec![
                ProviderConfig::new(TranslationProvider::Google),
                ProviderConfig::new(TranslationProvider::Ollama),
                ProviderConfig::new(TranslationProvider::Anthropic),
            ],
            common: TranslationCommonConfig::default(),
        }
    }
}
