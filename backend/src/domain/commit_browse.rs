//! Browsing the user's GitHub repositories and commits ahead of
//! generation. Read-only; never touches credits.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::account_service::require_account;
use crate::domain::ports::{AccountRepository, CommitSource, CommitSourceError};
use crate::domain::{AccessToken, Account, AccountId, Commit, Error, RepoRef, Repository};

const TOKEN_MISSING: &str =
    "GitHub access token not found. Please reconnect your GitHub account.";

pub(crate) fn map_commit_source_error(error: CommitSourceError) -> Error {
    match error {
        CommitSourceError::ReconnectRequired { .. } => Error::unauthorized(
            "GitHub authorization expired. Please reconnect your GitHub account.",
        ),
        CommitSourceError::RateLimited { .. } => {
            Error::rate_limited("GitHub rate limit exceeded. Please try again later.")
        }
        CommitSourceError::Timeout { .. } | CommitSourceError::Transport { .. } => {
            Error::service_unavailable("GitHub is unreachable. Please try again.")
        }
        CommitSourceError::Decode { message } => {
            Error::internal(format!("unexpected GitHub response: {message}"))
        }
    }
}

fn require_token(account: &Account) -> Result<&AccessToken, Error> {
    account
        .access_token
        .as_ref()
        .ok_or_else(|| Error::invalid_request(TOKEN_MISSING))
}

/// Lists repositories and commit history on behalf of a logged-in user.
#[derive(Clone)]
pub struct CommitBrowseService {
    accounts: Arc<dyn AccountRepository>,
    source: Arc<dyn CommitSource>,
}

impl CommitBrowseService {
    pub fn new(accounts: Arc<dyn AccountRepository>, source: Arc<dyn CommitSource>) -> Self {
        Self { accounts, source }
    }

    /// Repositories visible to the account's stored token.
    pub async fn repositories(&self, account_id: &AccountId) -> Result<Vec<Repository>, Error> {
        let account = require_account(&self.accounts, account_id).await?;
        let token = require_token(&account)?;
        self.source
            .list_repositories(token)
            .await
            .map_err(map_commit_source_error)
    }

    /// Commits on the repository's main branch, optionally bounded below.
    pub async fn commits(
        &self,
        account_id: &AccountId,
        repository: &RepoRef,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Commit>, Error> {
        let account = require_account(&self.accounts, account_id).await?;
        let token = require_token(&account)?;
        self.source
            .list_commits(token, repository, since)
            .await
            .map_err(map_commit_source_error)
    }
}

#[cfg(test)]
#[path = "commit_browse_tests.rs"]
mod tests;
