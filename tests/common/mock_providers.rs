/*!
 * Mock provider helpers for testing
 *
 * Builds translation clients on top of the library's mock factory so tests
 * never make external API calls.
 */

use std::sync::Arc;
use std::time::Duration;

use pagewise::app_config::Config;
use pagewise::translation::{RetryPolicy, TranslationClient};

pub use pagewise::providers::mock::{MockBehavior, MockCounters, MockProvider, MockProviderFactory};

/// Client with the default five attempts and no cache
pub fn client_for(factory: &MockProviderFactory) -> TranslationClient {
    TranslationClient::new(Arc::new(factory.clone()), "zh", "en")
}

/// Client with `attempts` attempts and no backoff wait
pub fn quick_client_for(factory: &MockProviderFactory, attempts: u32) -> TranslationClient {
    client_for(factory).with_policy(RetryPolicy::new(attempts, Duration::ZERO))
}

/// Client configured like a real run
pub fn configured_client_for(factory: &MockProviderFactory, config: &Config) -> TranslationClient {
    TranslationClient::from_config(Arc::new(factory.clone()), config)
}

/// Custom response that replaces Han text with a fixed English word
pub fn english_only(text: &str) -> String {
    if text.chars().any(|c| ('\u{4e00}'..='\u{9fff}').contains(&c)) {
        "Translated".to_string()
    } else {
        text.to_string()
    }
}
