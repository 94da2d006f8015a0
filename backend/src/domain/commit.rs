//! Commit source value objects shared by ports and services.

use chrono::{DateTime, Utc};

/// A candidate repository visible to the account's credential.
#[derive(Debug, Clone, PartialEq)]
pub struct Repository {
    pub id: i64,
    pub name: String,
    /// `owner/repo` form.
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub default_branch: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub private: bool,
    pub owner_login: String,
    pub owner_avatar_url: Option<String>,
}

/// A commit retrieved from the commit source.
#[derive(Debug, Clone, PartialEq)]
pub struct Commit {
    pub sha: String,
    pub message: String,
    pub author_name: String,
    pub author_email: Option<String>,
    pub authored_at: DateTime<Utc>,
    pub html_url: Option<String>,
    pub additions: Option<i64>,
    pub deletions: Option<i64>,
}

/// A commit selected by the caller as generation input.
///
/// Carries the minimum the prompt needs: hash, message, author, timestamp,
/// and an optional change-size statistic.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedCommit {
    pub sha: String,
    pub message: String,
    pub author_name: String,
    pub authored_at: DateTime<Utc>,
    pub additions: Option<i64>,
    pub deletions: Option<i64>,
}

impl SelectedCommit {
    /// Hash truncated to seven characters for prompt rendering.
    pub fn short_sha(&self) -> &str {
        let end = self
            .sha
            .char_indices()
            .nth(7)
            .map_or(self.sha.len(), |(idx, _)| idx);
        &self.sha[..end]
    }

    /// Compact `+adds/-dels` summary, or `N/A` without statistics.
    pub fn change_summary(&self) -> String {
        match (self.additions, self.deletions) {
            (None, None) => "N/A".to_owned(),
            (additions, deletions) => format!(
                "+{}/-{}",
                additions.unwrap_or_default(),
                deletions.unwrap_or_default()
            ),
        }
    }
}
