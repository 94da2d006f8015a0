//! Port for the external completion model (LLM text generation).

use async_trait::async_trait;

/// A single completion request with fixed decoding parameters.
///
/// Temperature and the output-token ceiling are held constant by the
/// adapter so repeated requests differ only in prompt content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// System instruction reinforcing tone.
    pub system: String,
    /// The user prompt.
    pub prompt: String,
}

/// Errors raised by completion model adapters.
///
/// `Busy` is the retryable condition surfaced to callers; `Configuration`
/// is fatal and must never be exposed verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompletionModelError {
    /// The provider is throttling or overloaded; the caller may retry.
    #[error("completion model busy: {message}")]
    Busy { message: String },
    /// The provider rejected our credentials or configuration.
    #[error("completion model misconfigured: {message}")]
    Configuration { message: String },
    /// The request timed out.
    #[error("completion model timed out: {message}")]
    Timeout { message: String },
    /// Transport-level failure reaching the provider.
    #[error("completion model transport failed: {message}")]
    Transport { message: String },
    /// The provider response could not be decoded.
    #[error("completion model payload invalid: {message}")]
    Decode { message: String },
}

impl CompletionModelError {
    /// Create a busy error with the given message.
    pub fn busy(message: impl Into<String>) -> Self {
        Self::Busy {
            message: message.into(),
        }
    }

    /// Create a configuration error with the given message.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a timeout error with the given message.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Create a transport error with the given message.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a decode error with the given message.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// Port wrapping the LLM completion API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Produce markdown release note content for the given request.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionModelError>;
}
