//! Release notes and their draft/published lifecycle.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{AccountId, ProjectId};

/// Opaque release note identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(Uuid);

impl NoteId {
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

impl std::fmt::Display for NoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a release note. Draft is the only legal creation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteStatus {
    Draft,
    Published,
}

/// Error raised for status strings outside `draft`/`published`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid status; must be 'draft' or 'published'")]
pub struct NoteStatusParseError;

impl FromStr for NoteStatus {
    type Err = NoteStatusParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            _ => Err(NoteStatusParseError),
        }
    }
}

impl std::fmt::Display for NoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => f.write_str("draft"),
            Self::Published => f.write_str("published"),
        }
    }
}

/// A generated or hand-written release note.
///
/// ## Invariants
/// - `published_at` is set exactly once, on the first transition to
///   [`NoteStatus::Published`], and never cleared afterwards.
/// - `view_count` only grows, and only while the note is published.
/// - `commits` records the generation input hashes; empty for manual notes.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub id: NoteId,
    pub account_id: AccountId,
    pub project_id: ProjectId,
    pub title: String,
    /// Markdown body.
    pub content: String,
    pub version: Option<String>,
    pub status: NoteStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub commits: Vec<String>,
    pub view_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Compute the `published_at` stamp for an update to `requested` status.
    ///
    /// Returns a fresh timestamp only for the first transition into
    /// published; republishing keeps the original value.
    pub fn publish_stamp(
        &self,
        requested: Option<NoteStatus>,
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        match requested {
            Some(NoteStatus::Published) if self.status != NoteStatus::Published => Some(now),
            _ => self.published_at,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use chrono::Duration;

    use super::*;

    fn draft() -> Note {
        let now = Utc::now();
        Note {
            id: NoteId::random(),
            account_id: AccountId::random(),
            project_id: ProjectId::random(),
            title: "Latest Updates".to_owned(),
            content: "## Improvements".to_owned(),
            version: None,
            status: NoteStatus::Draft,
            published_at: None,
            commits: vec!["abc1234".to_owned()],
            view_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn first_publish_stamps_now() {
        let note = draft();
        let now = Utc::now();
        assert_eq!(note.publish_stamp(Some(NoteStatus::Published), now), Some(now));
    }

    #[test]
    fn republishing_keeps_original_stamp() {
        let mut note = draft();
        let first = Utc::now() - Duration::hours(2);
        note.status = NoteStatus::Published;
        note.published_at = Some(first);

        let stamp = note.publish_stamp(Some(NoteStatus::Published), Utc::now());
        assert_eq!(stamp, Some(first));
    }

    #[test]
    fn plain_saves_leave_stamp_untouched() {
        let note = draft();
        assert_eq!(note.publish_stamp(None, Utc::now()), None);
        assert_eq!(note.publish_stamp(Some(NoteStatus::Draft), Utc::now()), None);
    }

    #[test]
    fn parses_status_strings() {
        assert_eq!("draft".parse::<NoteStatus>(), Ok(NoteStatus::Draft));
        assert_eq!("published".parse::<NoteStatus>(), Ok(NoteStatus::Published));
        assert!("archived".parse::<NoteStatus>().is_err());
    }
}
