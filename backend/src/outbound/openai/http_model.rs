//! Reqwest-backed completion model adapter.
//!
//! Decoding parameters are fixed here so repeated requests differ only in
//! prompt content. Credential failures map to the fatal `Configuration`
//! variant; throttling maps to the retryable `Busy` variant.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::dto::{ChatCompletionRequestDto, ChatCompletionResponseDto, ChatMessageDto};
use crate::domain::ports::{CompletionModel, CompletionModelError, CompletionRequest};

const DEFAULT_TIMEOUT_SECONDS: u64 = 60;
const MODEL: &str = "gpt-4o";
const MAX_TOKENS: u32 = 2000;
const TEMPERATURE: f32 = 0.7;
const COMPLETIONS_PATH: &str = "v1/chat/completions";

/// Provider API key, wiped from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a raw key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Completion model adapter for an OpenAI-compatible endpoint.
#[derive(Clone)]
pub struct OpenAiHttpModel {
    client: Client,
    base: Url,
    api_key: ApiKey,
}

impl OpenAiHttpModel {
    /// Build an adapter with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: Url, api_key: ApiKey) -> Result<Self, reqwest::Error> {
        Self::with_timeout(base, api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECONDS))
    }

    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_timeout(
        base: Url,
        api_key: ApiKey,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base,
            api_key,
        })
    }
}

fn map_transport_error(error: reqwest::Error) -> CompletionModelError {
    if error.is_timeout() {
        CompletionModelError::timeout("completion request timed out")
    } else {
        CompletionModelError::transport(format!("completion request failed: {error}"))
    }
}

fn map_status_error(status: StatusCode) -> CompletionModelError {
    match status {
        StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE => {
            CompletionModelError::busy(format!("provider returned {status}"))
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            CompletionModelError::configuration(format!("provider rejected credentials: {status}"))
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            CompletionModelError::timeout(format!("provider returned {status}"))
        }
        other => CompletionModelError::transport(format!("provider returned {other}")),
    }
}

#[async_trait]
impl CompletionModel for OpenAiHttpModel {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionModelError> {
        let url = self.base.join(COMPLETIONS_PATH).map_err(|err| {
            CompletionModelError::configuration(format!("invalid completions endpoint: {err}"))
        })?;

        let payload = ChatCompletionRequestDto {
            model: MODEL,
            messages: vec![
                ChatMessageDto {
                    role: "system",
                    content: &request.system,
                },
                ChatMessageDto {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key.0)
            .json(&payload)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(map_status_error(status));
        }

        let decoded: ChatCompletionResponseDto = response.json().await.map_err(|err| {
            CompletionModelError::decode(format!("invalid completion JSON payload: {err}"))
        })?;

        decoded
            .into_content()
            .ok_or_else(|| CompletionModelError::decode("completion response had no content"))
    }
}
