//! Reqwest-backed GitHub source adapter.
//!
//! Owns transport details only: URL building, authentication headers, HTTP
//! status mapping, and JSON decoding into domain records.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, StatusCode, Url, header};

use super::dto::{CommitDto, RepositoryDto};
use crate::domain::ports::{CommitSource, CommitSourceError};
use crate::domain::{AccessToken, Commit, RepoRef, Repository};

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const USER_AGENT: &str = "shipnotes-backend/0.1";
const ACCEPT: &str = "application/vnd.github.v3+json";
const PAGE_SIZE: &str = "100";

/// GitHub source adapter speaking REST v3 against a configurable base URL.
#[derive(Clone)]
pub struct GithubHttpSource {
    client: Client,
    base: Url,
}

impl GithubHttpSource {
    /// Build an adapter with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: Url) -> Result<Self, reqwest::Error> {
        Self::with_timeout(base, Duration::from_secs(DEFAULT_TIMEOUT_SECONDS))
    }

    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_timeout(base: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url, CommitSourceError> {
        self.base
            .join(path)
            .map_err(|err| CommitSourceError::transport(format!("invalid endpoint path: {err}")))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        token: &AccessToken,
        query: &[(&str, String)],
    ) -> Result<T, CommitSourceError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(token.expose())
            .header(header::ACCEPT, ACCEPT)
            .header(header::USER_AGENT, USER_AGENT)
            .query(query)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(map_status_error(status));
        }

        response.json::<T>().await.map_err(|err| {
            CommitSourceError::decode(format!("invalid GitHub JSON payload: {err}"))
        })
    }
}

fn map_transport_error(error: reqwest::Error) -> CommitSourceError {
    if error.is_timeout() {
        CommitSourceError::timeout("GitHub request timed out")
    } else {
        CommitSourceError::transport(format!("GitHub request failed: {error}"))
    }
}

fn map_status_error(status: StatusCode) -> CommitSourceError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
            CommitSourceError::reconnect_required(format!("GitHub returned {status}"))
        }
        StatusCode::TOO_MANY_REQUESTS => {
            CommitSourceError::rate_limited("GitHub API rate limit exceeded")
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            CommitSourceError::timeout(format!("GitHub returned {status}"))
        }
        other => CommitSourceError::transport(format!("GitHub returned {other}")),
    }
}

#[async_trait]
impl CommitSource for GithubHttpSource {
    async fn list_repositories(
        &self,
        token: &AccessToken,
    ) -> Result<Vec<Repository>, CommitSourceError> {
        let url = self.endpoint("user/repos")?;
        let query = [
            ("per_page", PAGE_SIZE.to_owned()),
            ("sort", "updated".to_owned()),
            ("type", "all".to_owned()),
        ];
        let repos: Vec<RepositoryDto> = self.get_json(url, token, &query).await?;
        Ok(repos.into_iter().map(RepositoryDto::into_domain).collect())
    }

    async fn list_commits(
        &self,
        token: &AccessToken,
        repository: &RepoRef,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Commit>, CommitSourceError> {
        let url = self.endpoint(&format!(
            "repos/{}/{}/commits",
            repository.owner(),
            repository.name()
        ))?;
        let mut query = vec![("per_page", PAGE_SIZE.to_owned())];
        if let Some(since) = since {
            query.push(("since", since.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }
        let commits: Vec<CommitDto> = self.get_json(url, token, &query).await?;
        Ok(commits.into_iter().map(CommitDto::into_domain).collect())
    }

    async fn get_repository(
        &self,
        token: &AccessToken,
        repository: &RepoRef,
    ) -> Result<Repository, CommitSourceError> {
        let url = self.endpoint(&format!(
            "repos/{}/{}",
            repository.owner(),
            repository.name()
        ))?;
        let repo: RepositoryDto = self.get_json(url, token, &[]).await?;
        Ok(repo.into_domain())
    }
}
