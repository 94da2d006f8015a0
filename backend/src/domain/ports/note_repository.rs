//! Port for release note persistence, lifecycle writes, and projections.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{AccountId, Note, NoteId, NoteStatus, ProjectId};

/// Errors raised by note repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NoteRepositoryError {
    /// Repository connection could not be established.
    #[error("note repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("note repository query failed: {message}")]
    Query { message: String },
}

impl NoteRepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Fields for creating a draft note.
#[derive(Debug, Clone)]
pub struct NewNote {
    pub account_id: AccountId,
    pub project_id: ProjectId,
    pub title: String,
    pub content: String,
    pub version: Option<String>,
    pub commits: Vec<String>,
}

/// Owner-editable fields applied atomically by [`NoteRepository::update`].
#[derive(Debug, Clone)]
pub struct NoteUpdate {
    pub title: String,
    pub content: String,
    pub status: NoteStatus,
    /// Stamp computed by the service; `None` never clears an existing value.
    pub published_at: Option<DateTime<Utc>>,
}

/// Optional filters for listing an account's notes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoteFilter {
    pub project_id: Option<ProjectId>,
    pub status: Option<NoteStatus>,
}

/// Port for writing notes and reading note projections.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Persist a new draft note.
    async fn insert(&self, note: &NewNote) -> Result<Note, NoteRepositoryError>;

    /// Find a note owned by the given account.
    async fn find_for_account(
        &self,
        note_id: &NoteId,
        account_id: &AccountId,
    ) -> Result<Option<Note>, NoteRepositoryError>;

    /// List an account's notes, newest first.
    async fn list_for_account(
        &self,
        account_id: &AccountId,
        filter: NoteFilter,
    ) -> Result<Vec<Note>, NoteRepositoryError>;

    /// Apply an owner edit; returns the updated note or `None` when the
    /// note does not exist for this account.
    async fn update(
        &self,
        note_id: &NoteId,
        account_id: &AccountId,
        update: &NoteUpdate,
    ) -> Result<Option<Note>, NoteRepositoryError>;

    /// Delete a note owned by the account; `false` when absent.
    async fn delete_for_account(
        &self,
        note_id: &NoteId,
        account_id: &AccountId,
    ) -> Result<bool, NoteRepositoryError>;

    /// Atomically increment the view count of a published note.
    ///
    /// Returns `false` when the note is absent or not published; draft
    /// notes are never counted.
    async fn record_view(&self, note_id: &NoteId) -> Result<bool, NoteRepositoryError>;

    /// Published notes for a project, most recent first, bounded by `limit`
    /// and optionally restricted to those published since a timestamp.
    async fn list_published(
        &self,
        project_id: &ProjectId,
        since: Option<DateTime<Utc>>,
        limit: Option<i64>,
    ) -> Result<Vec<Note>, NoteRepositoryError>;
}

/// Fixture implementation for tests that do not exercise notes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureNoteRepository;

#[async_trait]
impl NoteRepository for FixtureNoteRepository {
    async fn insert(&self, note: &NewNote) -> Result<Note, NoteRepositoryError> {
        let now = Utc::now();
        Ok(Note {
            id: NoteId::random(),
            account_id: note.account_id,
            project_id: note.project_id,
            title: note.title.clone(),
            content: note.content.clone(),
            version: note.version.clone(),
            status: NoteStatus::Draft,
            published_at: None,
            commits: note.commits.clone(),
            view_count: 0,
            created_at: now,
            updated_at: now,
        })
    }

    async fn find_for_account(
        &self,
        _note_id: &NoteId,
        _account_id: &AccountId,
    ) -> Result<Option<Note>, NoteRepositoryError> {
        Ok(None)
    }

    async fn list_for_account(
        &self,
        _account_id: &AccountId,
        _filter: NoteFilter,
    ) -> Result<Vec<Note>, NoteRepositoryError> {
        Ok(Vec::new())
    }

    async fn update(
        &self,
        _note_id: &NoteId,
        _account_id: &AccountId,
        _update: &NoteUpdate,
    ) -> Result<Option<Note>, NoteRepositoryError> {
        Ok(None)
    }

    async fn delete_for_account(
        &self,
        _note_id: &NoteId,
        _account_id: &AccountId,
    ) -> Result<bool, NoteRepositoryError> {
        Ok(false)
    }

    async fn record_view(&self, _note_id: &NoteId) -> Result<bool, NoteRepositoryError> {
        Ok(false)
    }

    async fn list_published(
        &self,
        _project_id: &ProjectId,
        _since: Option<DateTime<Utc>>,
        _limit: Option<i64>,
    ) -> Result<Vec<Note>, NoteRepositoryError> {
        Ok(Vec::new())
    }
}
