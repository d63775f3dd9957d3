/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockBehavior::Working` - Always succeeds with a tagged translation
 * - `MockBehavior::FailFirst` - Fails a fixed number of calls, then succeeds
 * - `MockBehavior::Failing` - Always fails with an error
 *
 * `MockProviderFactory` hands out connections that share one set of counters,
 * so tests can see how many connections and requests a run needed.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{Provider, ProviderFactory, TranslateRequest, TranslateResponse};

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a proper translation
    Working,
    /// Answers with whitespace only
    Empty,
    /// Answers without any payload
    Null,
    /// Always fails with an error
    Failing,
    /// Fails the first `failures` requests, then works
    FailFirst { failures: usize },
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Simulates slow response (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Counters shared by every connection of one factory
#[derive(Debug, Default)]
pub struct MockCounters {
    connections: AtomicUsize,
    requests: AtomicUsize,
    received: Mutex<Vec<String>>,
}

impl MockCounters {
    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Texts received so far, in call order
    pub fn received(&self) -> Vec<String> {
        self.received.lock().clone()
    }
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Timeout given at connect time
    timeout: Duration,
    counters: Arc<MockCounters>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&str) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            timeout: Duration::from_secs(30),
            counters: Arc::new(MockCounters::default()),
            custom_response: None,
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Set a custom response generator
    pub fn with_custom_response(mut self, generator: fn(&str) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Default translation used by working mocks
    pub fn tag_translation(text: &str) -> String {
        format!("[EN] {}", text)
    }

    fn translate(&self, text: &str) -> String {
        match self.custom_response {
            Some(generator) => generator(text),
            None => Self::tag_translation(text),
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(&self, request: TranslateRequest) -> Result<TranslateResponse, ProviderError> {
        let count = self.counters.requests.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.received.lock().push(request.text.clone());

        match self.behavior {
            MockBehavior::Working => Ok(TranslateResponse::with_text(self.translate(&request.text))),
            MockBehavior::Empty => Ok(TranslateResponse::with_text("   ")),
            MockBehavior::Null => Ok(TranslateResponse { text: None }),
            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 503,
                message: "Simulated provider failure".to_string(),
            }),
            MockBehavior::FailFirst { failures } => {
                if count <= failures {
                    Err(ProviderError::ConnectionError(format!("Simulated failure {} of {}", count, failures)))
                } else {
                    Ok(TranslateResponse::with_text(self.translate(&request.text)))
                }
            }
            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && count % fail_every == 0 {
                    Err(ProviderError::RequestFailed(format!("Simulated intermittent failure on request {}", count)))
                } else {
                    Ok(TranslateResponse::with_text(self.translate(&request.text)))
                }
            }
            MockBehavior::Slow { delay_ms } => {
                let delay = Duration::from_millis(delay_ms);
                if delay > self.timeout {
                    tokio::time::sleep(self.timeout).await;
                    return Err(ProviderError::ConnectionError(format!(
                        "Request timed out after {}s",
                        self.timeout.as_secs()
                    )));
                }
                tokio::time::sleep(delay).await;
                Ok(TranslateResponse::with_text(self.translate(&request.text)))
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError("Mock provider is down".to_string())),
            _ => Ok(()),
        }
    }
}

/// Factory producing mock connections with shared counters
#[derive(Debug, Clone)]
pub struct MockProviderFactory {
    behavior: MockBehavior,
    counters: Arc<MockCounters>,
    custom_response: Option<fn(&str) -> String>,
    /// Reason to refuse every connection, simulating a provider that cannot load
    unavailable: Option<String>,
    /// Timeouts requested by each `connect` call
    timeouts: Arc<Mutex<Vec<Duration>>>,
}

impl MockProviderFactory {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            counters: Arc::new(MockCounters::default()),
            custom_response: None,
            unavailable: None,
            timeouts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// A factory whose connections can never be opened
    pub fn unavailable(reason: impl Into<String>) -> Self {
        let mut factory = Self::new(MockBehavior::Working);
        factory.unavailable = Some(reason.into());
        factory
    }

    pub fn with_custom_response(mut self, generator: fn(&str) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    pub fn counters(&self) -> Arc<MockCounters> {
        Arc::clone(&self.counters)
    }

    /// Timeouts passed to `connect`, in call order
    pub fn timeouts(&self) -> Vec<Duration> {
        self.timeouts.lock().clone()
    }

    pub fn shared(self) -> Arc<dyn ProviderFactory> {
        Arc::new(self)
    }
}

impl ProviderFactory for MockProviderFactory {
    fn connect(&self, timeout: Duration) -> Result<Box<dyn Provider>, ProviderError> {
        self.timeouts.lock().push(timeout);
        if let Some(reason) = &self.unavailable {
            return Err(ProviderError::Unavailable(reason.clone()));
        }

        self.counters.connections.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockProvider {
            behavior: self.behavior,
            timeout,
            counters: Arc::clone(&self.counters),
            custom_response: self.custom_response,
        }))
    }

    fn name(&self) -> String {
        "Mock".to_string()
    }
}
