//! DTOs for decoding GitHub REST payloads.
//!
//! The adapter decodes into these transport DTOs first, then maps into the
//! domain's `Repository` and `Commit` records in one pass.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::{Commit, Repository};

#[derive(Debug, Deserialize)]
pub(super) struct RepositoryDto {
    pub(super) id: i64,
    pub(super) name: String,
    pub(super) full_name: String,
    pub(super) description: Option<String>,
    pub(super) html_url: String,
    pub(super) default_branch: Option<String>,
    pub(super) updated_at: Option<DateTime<Utc>>,
    pub(super) private: bool,
    pub(super) owner: Option<RepositoryOwnerDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RepositoryOwnerDto {
    pub(super) login: String,
    pub(super) avatar_url: Option<String>,
}

impl RepositoryDto {
    pub(super) fn into_domain(self) -> Repository {
        let (owner_login, owner_avatar_url) = match self.owner {
            Some(owner) => (owner.login, owner.avatar_url),
            None => (String::new(), None),
        };
        Repository {
            id: self.id,
            name: self.name,
            full_name: self.full_name,
            description: self.description,
            html_url: self.html_url,
            default_branch: self.default_branch.unwrap_or_else(|| "main".to_owned()),
            updated_at: self.updated_at,
            private: self.private,
            owner_login,
            owner_avatar_url,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct CommitDto {
    pub(super) sha: String,
    pub(super) commit: CommitDetailDto,
    pub(super) html_url: Option<String>,
    pub(super) stats: Option<CommitStatsDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CommitDetailDto {
    pub(super) message: String,
    pub(super) author: Option<CommitAuthorDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CommitAuthorDto {
    pub(super) name: Option<String>,
    pub(super) email: Option<String>,
    pub(super) date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CommitStatsDto {
    pub(super) additions: Option<i64>,
    pub(super) deletions: Option<i64>,
}

impl CommitDto {
    pub(super) fn into_domain(self) -> Commit {
        let author = self.commit.author;
        let (author_name, author_email, authored_at) = match author {
            Some(author) => (
                author.name.unwrap_or_else(|| "unknown".to_owned()),
                author.email,
                author.date.unwrap_or_else(Utc::now),
            ),
            None => ("unknown".to_owned(), None, Utc::now()),
        };
        let (additions, deletions) = match self.stats {
            Some(stats) => (stats.additions, stats.deletions),
            None => (None, None),
        };
        Commit {
            sha: self.sha,
            message: self.commit.message,
            author_name,
            author_email,
            authored_at,
            html_url: self.html_url,
            additions,
            deletions,
        }
    }
}
