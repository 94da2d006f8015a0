//! Note lifecycle service: owner edits, publishing, listing, deletion.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::ports::{NoteFilter, NoteRepository, NoteRepositoryError, NoteUpdate};
use crate::domain::{AccountId, Error, Note, NoteId, NoteStatus};

fn map_note_repository_error(error: NoteRepositoryError) -> Error {
    match error {
        NoteRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("note store unavailable: {message}"))
        }
        NoteRepositoryError::Query { message } => {
            Error::internal(format!("note store error: {message}"))
        }
    }
}

/// Owner-supplied fields for a save or publish.
#[derive(Debug, Clone)]
pub struct UpdateNoteRequest {
    pub title: String,
    pub content: String,
    /// `None` keeps the stored status.
    pub status: Option<NoteStatus>,
}

/// Service over owner-facing note operations.
///
/// Ownership failures are folded into `NotFound` so non-owners cannot
/// confirm a note's existence.
#[derive(Clone)]
pub struct NoteService {
    notes: Arc<dyn NoteRepository>,
}

impl NoteService {
    /// Create a new service over the note repository.
    pub fn new(notes: Arc<dyn NoteRepository>) -> Self {
        Self { notes }
    }

    /// Fetch one owned note.
    pub async fn get(&self, account_id: &AccountId, note_id: &NoteId) -> Result<Note, Error> {
        self.notes
            .find_for_account(note_id, account_id)
            .await
            .map_err(map_note_repository_error)?
            .ok_or_else(|| Error::not_found("Patch note not found"))
    }

    /// List owned notes, optionally filtered by project and status.
    pub async fn list(
        &self,
        account_id: &AccountId,
        filter: NoteFilter,
    ) -> Result<Vec<Note>, Error> {
        self.notes
            .list_for_account(account_id, filter)
            .await
            .map_err(map_note_repository_error)
    }

    /// Save or publish an owned note.
    ///
    /// The first transition into published stamps `published_at`; this is
    /// the only write path that may set it, and republishing is a no-op on
    /// the field.
    pub async fn update(
        &self,
        account_id: &AccountId,
        note_id: &NoteId,
        request: UpdateNoteRequest,
    ) -> Result<Note, Error> {
        if request.title.trim().is_empty() || request.content.trim().is_empty() {
            return Err(Error::invalid_request("Title and content are required"));
        }

        let note = self
            .notes
            .find_for_account(note_id, account_id)
            .await
            .map_err(map_note_repository_error)?
            .ok_or_else(|| Error::not_found("Patch note not found"))?;

        let published_at = note.publish_stamp(request.status, Utc::now());
        let update = NoteUpdate {
            title: request.title,
            content: request.content,
            status: request.status.unwrap_or(note.status),
            published_at,
        };

        self.notes
            .update(note_id, account_id, &update)
            .await
            .map_err(map_note_repository_error)?
            .ok_or_else(|| Error::not_found("Patch note not found"))
    }

    /// Delete an owned note. No cascading effects.
    pub async fn delete(&self, account_id: &AccountId, note_id: &NoteId) -> Result<(), Error> {
        let deleted = self
            .notes
            .delete_for_account(note_id, account_id)
            .await
            .map_err(map_note_repository_error)?;
        if deleted {
            Ok(())
        } else {
            Err(Error::not_found("Patch note not found"))
        }
    }
}

#[cfg(test)]
#[path = "note_service_tests.rs"]
mod tests;
