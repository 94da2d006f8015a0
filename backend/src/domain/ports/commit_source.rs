//! Port for the external commit source (GitHub REST behind an adapter).

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{AccessToken, Commit, RepoRef, Repository};

/// Errors raised by commit source adapters.
///
/// `ReconnectRequired` is the distinguished condition the frontend routes
/// to the re-authentication flow; everything else is transient.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommitSourceError {
    /// The credential is expired, revoked, or lacks access.
    #[error("commit source access denied: {message}")]
    ReconnectRequired { message: String },
    /// The upstream is throttling requests.
    #[error("commit source rate limited: {message}")]
    RateLimited { message: String },
    /// The request timed out.
    #[error("commit source timed out: {message}")]
    Timeout { message: String },
    /// Transport-level failure reaching the upstream.
    #[error("commit source transport failed: {message}")]
    Transport { message: String },
    /// The upstream response could not be decoded.
    #[error("commit source payload invalid: {message}")]
    Decode { message: String },
}

impl CommitSourceError {
    /// Create a reconnect-required error with the given message.
    pub fn reconnect_required(message: impl Into<String>) -> Self {
        Self::ReconnectRequired {
            message: message.into(),
        }
    }

    /// Create a rate-limited error with the given message.
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
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

/// Port wrapping the code-hosting provider's API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommitSource: Send + Sync {
    /// Repositories visible to the credential, most recently updated first.
    async fn list_repositories(
        &self,
        token: &AccessToken,
    ) -> Result<Vec<Repository>, CommitSourceError>;

    /// A bounded page of commits for a repository, optionally since a
    /// timestamp.
    async fn list_commits(
        &self,
        token: &AccessToken,
        repository: &RepoRef,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Commit>, CommitSourceError>;

    /// Repository metadata, used to re-validate tracked repositories.
    async fn get_repository(
        &self,
        token: &AccessToken,
        repository: &RepoRef,
    ) -> Result<Repository, CommitSourceError>;
}
