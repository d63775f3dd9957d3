/*!
 * Core translation client.
 *
 * `TranslationClient` sends one unit of text to the configured provider and
 * turns every possible result into a `TranslationOutcome`. It never returns an
 * error and never panics: exhausted retries, empty replies and a provider that
 * cannot even be loaded all come back as typed failures.
 *
 * Each attempt opens a fresh provider connection through the
 * `ProviderFactory`; failed attempts are separated by exponential backoff.
 */

use log::{debug, error, warn};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{Config, TranslationCommonConfig};
use crate::errors::{ProviderError, TranslationFailure};
use crate::providers::{ProviderFactory, TranslateRequest};

use super::cache::{truncate_text, TranslationCache};
use super::sanitizer::{TextSanitizer, PLACEHOLDER_MARKER};

/// Bounded retries with pure exponential backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, first call included
    pub max_attempts: u32,
    /// Wait after the first failed attempt
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn from_config(common: &TranslationCommonConfig) -> Self {
        Self::new(common.retry_count, Duration::from_millis(common.retry_backoff_ms))
    }

    /// Wait after failed attempt number `attempt` (1-based): base * 2^(attempt-1)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// Every wait slept when all attempts fail
    pub fn delays(&self) -> Vec<Duration> {
        (1..self.max_attempts).map(|attempt| self.delay_for(attempt)).collect()
    }
}

/// Request timeout that grows with input length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutBudget {
    pub base: Duration,
    /// Added per full 100 characters
    pub step: Duration,
    pub max: Duration,
}

impl Default for TimeoutBudget {
    fn default() -> Self {
        Self {
            base: Duration::from_secs(30),
            step: Duration::from_secs(10),
            max: Duration::from_secs(180),
        }
    }
}

impl TimeoutBudget {
    pub fn from_config(common: &TranslationCommonConfig) -> Self {
        Self {
            base: Duration::from_secs(common.timeout_base_secs),
            step: Duration::from_secs(common.timeout_step_secs),
            max: Duration::from_secs(common.timeout_max_secs),
        }
    }

    /// min(base + floor(chars / 100) * step, max)
    pub fn for_length(&self, chars: usize) -> Duration {
        let steps = u32::try_from(chars / 100).unwrap_or(u32::MAX);
        self.base.saturating_add(self.step.saturating_mul(steps)).min(self.max)
    }
}

/// What one translation call cost
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallStats {
    /// Provider calls made
    pub attempts: u32,
    /// Backoff sleeps, in order
    pub backoff: Vec<Duration>,
    /// Timeout handed to each connection
    pub timeout: Duration,
    /// Answer came from the cache
    pub cached: bool,
}

impl CallStats {
    pub fn total_backoff(&self) -> Duration {
        self.backoff.iter().sum()
    }
}

/// Result of translating one unit of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    Translated(String),
    Failed(TranslationFailure),
}

impl TranslationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Translated(_))
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Translated(text) => Some(text),
            Self::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&TranslationFailure> {
        match self {
            Self::Translated(_) => None,
            Self::Failed(failure) => Some(failure),
        }
    }

    /// Text stored in reports: the translation, or the bracketed failure marker
    pub fn render(&self) -> String {
        match self {
            Self::Translated(text) => text.clone(),
            Self::Failed(failure) => failure.to_string(),
        }
    }

    pub fn into_result(self) -> Result<String, TranslationFailure> {
        match self {
            Self::Translated(text) => Ok(text),
            Self::Failed(failure) => Err(failure),
        }
    }
}

impl From<TranslationFailure> for TranslationOutcome {
    fn from(failure: TranslationFailure) -> Self {
        Self::Failed(failure)
    }
}

/// Retrying, fail-closed wrapper around a provider
#[derive(Debug, Clone)]
pub struct TranslationClient {
    factory: Arc<dyn ProviderFactory>,
    policy: RetryPolicy,
    budget: TimeoutBudget,
    min_text_length: usize,
    source_language: String,
    target_language: String,
    cache: Option<TranslationCache>,
}

impl TranslationClient {
    pub fn new(
        factory: Arc<dyn ProviderFactory>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            factory,
            policy: RetryPolicy::default(),
            budget: TimeoutBudget::default(),
            min_text_length: 5,
            source_language: source_language.into(),
            target_language: target_language.into(),
            cache: None,
        }
    }

    /// Client configured from the application config
    pub fn from_config(factory: Arc<dyn ProviderFactory>, config: &Config) -> Self {
        let common = &config.translation.common;
        let client = Self::new(factory, &config.source_language, &config.target_language)
            .with_policy(RetryPolicy::from_config(common))
            .with_budget(TimeoutBudget::from_config(common))
            .with_min_text_length(common.min_text_length);

        if common.cache_enabled {
            client.with_cache(TranslationCache::new())
        } else {
            client
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_budget(mut self, budget: TimeoutBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_min_text_length(mut self, min_text_length: usize) -> Self {
        self.min_text_length = min_text_length;
        self
    }

    pub fn with_cache(mut self, cache: TranslationCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn budget(&self) -> &TimeoutBudget {
        &self.budget
    }

    pub fn cache(&self) -> Option<&TranslationCache> {
        self.cache.as_ref()
    }

    pub fn provider_name(&self) -> String {
        self.factory.name()
    }

    /// Validate, clean and translate raw text
    pub async fn translate<'a>(&self, text: impl Into<Option<&'a str>>) -> TranslationOutcome {
        self.translate_with_stats(text).await.0
    }

    pub async fn translate_with_stats<'a>(
        &self,
        text: impl Into<Option<&'a str>>,
    ) -> (TranslationOutcome, CallStats) {
        match self.precheck(text.into()) {
            Ok(cleaned) => self.translate_unit(&cleaned).await,
            Err(failure) => (failure.into(), CallStats::default()),
        }
    }

    /// Input validation shared by every entry point; yields the cleaned text
    pub fn precheck(&self, text: Option<&str>) -> Result<String, TranslationFailure> {
        let raw = match text {
            Some(raw) if !raw.trim().is_empty() && raw.trim() != PLACEHOLDER_MARKER => raw,
            _ => return Err(TranslationFailure::InvalidInput),
        };

        let cleaned = TextSanitizer::clean_str(raw);
        if cleaned.is_empty() {
            return Err(TranslationFailure::NoValidText);
        }

        if cleaned.chars().count() < self.min_text_length {
            return Err(TranslationFailure::TooShort { text: cleaned });
        }

        Ok(cleaned)
    }

    /// Send already validated text through the retry loop.
    ///
    /// No length check happens here, so short units such as TOC titles can
    /// use the same retry machinery.
    pub async fn translate_unit(&self, text: &str) -> (TranslationOutcome, CallStats) {
        let timeout = self.budget.for_length(text.chars().count());
        let mut stats = CallStats {
            timeout,
            ..CallStats::default()
        };

        if let Some(cached) = self
            .cache
            .as_ref()
            .and_then(|cache| cache.get(text, &self.source_language, &self.target_language))
        {
            stats.cached = true;
            return (TranslationOutcome::Translated(cached), stats);
        }

        let request = TranslateRequest::new(text, &self.source_language, &self.target_language);

        for attempt in 1..=self.policy.max_attempts {
            stats.attempts = attempt;

            let provider = match self.factory.connect(timeout) {
                Ok(provider) => provider,
                Err(ProviderError::Unavailable(reason)) => {
                    error!("{} provider unavailable: {}", self.factory.name(), reason);
                    return (TranslationFailure::ProviderUnavailable { reason }.into(), stats);
                }
                Err(e) => {
                    warn!("Attempt {}/{}: could not connect: {}", attempt, self.policy.max_attempts, e);
                    self.backoff(attempt, &mut stats).await;
                    continue;
                }
            };

            match provider.complete(request.clone()).await {
                Ok(response) => match response.usable_text() {
                    Some(translated) => {
                        let translated = translated.trim().to_string();
                        debug!(
                            "Translated '{}' on attempt {}",
                            truncate_text(text, 30),
                            attempt
                        );
                        if let Some(cache) = &self.cache {
                            cache.store(text, &self.source_language, &self.target_language, &translated);
                        }
                        return (TranslationOutcome::Translated(translated), stats);
                    }
                    None => {
                        warn!("Attempt {}/{}: empty response", attempt, self.policy.max_attempts);
                    }
                },
                Err(e) => {
                    warn!("Attempt {}/{} failed: {}", attempt, self.policy.max_attempts, e);
                }
            }

            self.backoff(attempt, &mut stats).await;
        }

        error!(
            "Giving up on '{}' after {} attempts",
            truncate_text(text, 30),
            self.policy.max_attempts
        );
        let failure = TranslationFailure::RetriesExhausted {
            attempts: self.policy.max_attempts,
        };
        (failure.into(), stats)
    }

    // No sleep after the final attempt
    async fn backoff(&self, attempt: u32, stats: &mut CallStats) {
        if attempt >= self.policy.max_attempts {
            return;
        }
        let delay = self.policy.delay_for(attempt);
        stats.backoff.push(delay);
        tokio::time::sleep(delay).await;
    }
}
