//! Projects: tracked repositories with a public slug.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::AccountId;

/// Opaque project identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(Uuid);

impl ProjectId {
    /// Wrap an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Borrow the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// External repository reference in `owner/repo` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    owner: String,
    name: String,
}

/// Error raised when a repository reference is not `owner/repo`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid repository format; expected 'owner/repo'")]
pub struct RepoRefParseError;

impl RepoRef {
    /// Repository owner (user or organisation).
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for RepoRef {
    type Err = RepoRefParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.split_once('/') {
            Some((owner, name))
                if !owner.trim().is_empty()
                    && !name.trim().is_empty()
                    && !name.contains('/') =>
            {
                Ok(Self {
                    owner: owner.trim().to_owned(),
                    name: name.trim().to_owned(),
                })
            }
            _ => Err(RepoRefParseError),
        }
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A tracked repository plus its public identity.
///
/// ## Invariants
/// - `slug` is globally unique and derived from `name`.
/// - A given `(account, repository)` pair maps to at most one project.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: ProjectId,
    pub account_id: AccountId,
    pub name: String,
    pub slug: String,
    pub repository: RepoRef,
    pub repository_url: String,
    pub description: Option<String>,
    /// Disconnected repositories stay soft-disabled rather than deleted.
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[test]
    fn parses_owner_and_repo() {
        let repo: RepoRef = "octocat/hello-world".parse().expect("valid reference");
        assert_eq!(repo.owner(), "octocat");
        assert_eq!(repo.name(), "hello-world");
        assert_eq!(repo.to_string(), "octocat/hello-world");
    }

    #[rstest]
    #[case("no-slash")]
    #[case("/repo")]
    #[case("owner/")]
    #[case("owner/repo/extra")]
    #[case(" / ")]
    fn rejects_malformed_references(#[case] value: &str) {
        assert!(value.parse::<RepoRef>().is_err());
    }
}
