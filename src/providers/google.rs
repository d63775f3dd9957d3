use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde_json::Value;

use crate::errors::ProviderError;
use crate::language_utils;
use crate::providers::{http_client, send_error, Provider, TranslateRequest, TranslateResponse};

/// Client for the public Google web translation endpoint (`client=gtx`)
#[derive(Debug)]
pub struct GoogleTranslate {
    /// HTTP client for API requests
    client: Client,
    /// Base URL, e.g. https://translate.googleapis.com
    endpoint: String,
}

impl GoogleTranslate {
    /// Create a new client whose requests time out after `timeout`
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http_client(timeout)?,
            endpoint: endpoint.into(),
        })
    }

    fn api_url(&self) -> String {
        format!("{}/translate_a/single", self.endpoint.trim_end_matches('/'))
    }

    /// Pull the translated sentences out of the nested array reply.
    ///
    /// The reply looks like `[[["Hello","你好",...],["World","世界",...]],...]`;
    /// a null first element means the endpoint had nothing to say.
    pub fn parse_response(body: &str) -> Result<Option<String>, ProviderError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| ProviderError::ParseError(format!("Google reply is not JSON: {}", e)))?;

        let segments = match value.get(0) {
            Some(Value::Array(segments)) => segments,
            Some(Value::Null) | None => return Ok(None),
            Some(other) => {
                return Err(ProviderError::ParseError(format!(
                    "Unexpected Google reply shape: {}",
                    other
                )));
            }
        };

        let text: String = segments
            .iter()
            .filter_map(|segment| segment.get(0).and_then(Value::as_str))
            .collect();

        Ok(Some(text))
    }
}

#[async_trait]
impl Provider for GoogleTranslate {
    async fn complete(&self, request: TranslateRequest) -> Result<TranslateResponse, ProviderError> {
        let source = language_utils::provider_language_code(&request.source_language)
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        let target = language_utils::provider_language_code(&request.target_language)
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        debug!("Google request: {} chars, {} -> {}", request.text.chars().count(), source, target);

        // Long pages exceed URL limits, so the text goes in the form body
        let response = self
            .client
            .post(self.api_url())
            .query(&[("client", "gtx"), ("sl", source.as_str()), ("tl", target.as_str()), ("dt", "t")])
            .form(&[("q", request.text.as_str())])
            .send()
            .await
            .map_err(|e| send_error("Google", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::ParseError(format!("Failed to read Google reply: {}", e)))?;

        if !status.is_success() {
            error!("Google translate error ({}): {}", status, body);
            return Err(ProviderError::from_status(status.as_u16(), body));
        }

        Ok(TranslateResponse {
            text: Self::parse_response(&body)?,
        })
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.complete(TranslateRequest::new("测试", "auto", "en")).await?;
        Ok(())
    }
}
