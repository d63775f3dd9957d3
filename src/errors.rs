/*!
 * Error types for the pagewise application.
 *
 * Provider and I/O failures use the thiserror crate for ergonomic error
 * definitions. Translation failures are not raised: they are values carried by
 * `TranslationOutcome` so a single bad page never aborts a run.
 */

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The provider could not be loaded or initialized at all
    #[error("Provider unavailable: {0}")]
    Unavailable(String),
}

impl ProviderError {
    /// Map an HTTP status and body to the matching provider error
    pub fn from_status(status_code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ApiError { status_code, message },
        }
    }
}

/// Reasons a unit of text did not come back translated.
///
/// `Display` renders the bracketed marker that report readers know from
/// earlier runs (`[Translation failed after 5 attempts]`). Code should branch
/// on the variant, not on that rendering.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TranslationFailure {
    /// Null, placeholder or blank text reached the translator
    #[error("[Error: Invalid input]")]
    InvalidInput,

    /// The sanitizer reduced the input to nothing
    #[error("[Error: No valid text after cleaning]")]
    NoValidText,

    /// Input below the minimum translatable length
    #[error("[Skipped: Too short - '{text}']")]
    TooShort {
        /// The residual text, kept for diagnosis
        text: String,
    },

    /// Formatting-heavy content whose meaningful payload was too short
    #[error("[Skipped: Mostly formatting - {preview}...]")]
    MostlyFormatting {
        /// Leading part of the cleaned text
        preview: String,
    },

    /// All retry attempts were used up
    #[error("[Translation failed after {attempts} attempts]")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
    },

    /// The translation dependency could not be loaded or initialized
    #[error("[Error: Provider unavailable - {reason}]")]
    ProviderUnavailable {
        /// Why the provider could not be reached
        reason: String,
    },
}

impl TranslationFailure {
    /// Whether the unit was deliberately not sent to the provider
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput | Self::NoValidText | Self::TooShort { .. } | Self::MostlyFormatting { .. }
        )
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Malformed page input
    #[error("Input error: {0}")]
    Input(String),

    /// Error from configuration loading or validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::Input(error.to_string())
    }
}
