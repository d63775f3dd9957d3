/*!
 * Tests for error types
 */

use pagewise::errors::{AppError, ProviderError, TranslationFailure};

#[test]
fn test_from_status_shouldClassifyCommonCodes() {
    assert!(matches!(ProviderError::from_status(401, "bad key"), ProviderError::AuthenticationError(_)));
    assert!(matches!(ProviderError::from_status(403, "forbidden"), ProviderError::AuthenticationError(_)));
    assert!(matches!(ProviderError::from_status(429, "slow down"), ProviderError::RateLimitExceeded(_)));
    assert_eq!(
        ProviderError::from_status(500, "boom"),
        ProviderError::ApiError {
            status_code: 500,
            message: "boom".to_string()
        }
    );
}

#[test]
fn test_provider_error_display_shouldIncludeDetails() {
    let err = ProviderError::ApiError {
        status_code: 503,
        message: "overloaded".to_string(),
    };
    assert_eq!(err.to_string(), "API responded with error: 503 - overloaded");
}

#[test]
fn test_translation_failure_display_shouldRenderMarkers() {
    assert_eq!(TranslationFailure::InvalidInput.to_string(), "[Error: Invalid input]");
    assert_eq!(TranslationFailure::NoValidText.to_string(), "[Error: No valid text after cleaning]");
    assert_eq!(
        TranslationFailure::TooShort { text: "概述".to_string() }.to_string(),
        "[Skipped: Too short - '概述']"
    );
    assert_eq!(
        TranslationFailure::MostlyFormatting { preview: "-----".to_string() }.to_string(),
        "[Skipped: Mostly formatting - -----...]"
    );
    assert_eq!(
        TranslationFailure::RetriesExhausted { attempts: 5 }.to_string(),
        "[Translation failed after 5 attempts]"
    );
    assert_eq!(
        TranslationFailure::ProviderUnavailable { reason: "no key".to_string() }.to_string(),
        "[Error: Provider unavailable - no key]"
    );
}

#[test]
fn test_translation_failure_is_skip_shouldExcludeHardFailures() {
    assert!(TranslationFailure::InvalidInput.is_skip());
    assert!(TranslationFailure::TooShort { text: String::new() }.is_skip());
    assert!(!TranslationFailure::RetriesExhausted { attempts: 5 }.is_skip());
    assert!(!TranslationFailure::ProviderUnavailable { reason: String::new() }.is_skip());
}

#[test]
fn test_translation_failure_serde_shouldUseKindTag() {
    let failure = TranslationFailure::MostlyFormatting { preview: "....".to_string() };
    let json = serde_json::to_string(&failure).unwrap();
    assert_eq!(json, r#"{"kind":"mostly_formatting","preview":"...."}"#);

    let back: TranslationFailure = serde_json::from_str(&json).unwrap();
    assert_eq!(back, failure);
}

#[test]
fn test_app_error_from_provider_error_shouldWrap() {
    let err: AppError = ProviderError::ConnectionError("refused".to_string()).into();
    assert_eq!(err.to_string(), "Provider error: Connection error: refused");

    let io: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(io, AppError::File(_)));
}
