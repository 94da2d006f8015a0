//! Note generation: the credit-gated pipeline from selected commits to a
//! persisted draft.
//!
//! Order of effects mirrors the product contract: gate on credits, call the
//! model, persist the draft, then debit. The debit is a single conditional
//! decrement at the store so concurrent generations can never drive a
//! balance negative; the model is never invoked for an account that failed
//! the gate.

use std::sync::Arc;

use tracing::{error, warn};

use crate::domain::account_service::{map_account_repository_error, require_account};
use crate::domain::ports::{
    AccountRepository, CompletionModel, CompletionModelError, CompletionRequest, NewNote,
    NoteRepository, NoteRepositoryError, ProjectRepository, ProjectRepositoryError,
};
use crate::domain::release_prompt::{DEFAULT_NOTE_TITLE, SYSTEM_INSTRUCTION, build_prompt};
use crate::domain::{AccountId, Error, Note, ProjectId, SelectedCommit, UNLIMITED_CREDITS};

fn map_project_repository_error(error: ProjectRepositoryError) -> Error {
    match error {
        ProjectRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("project store unavailable: {message}"))
        }
        other => Error::internal(format!("project store error: {other}")),
    }
}

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

fn map_completion_error(error: CompletionModelError) -> Error {
    match error {
        CompletionModelError::Busy { .. } | CompletionModelError::Timeout { .. } => {
            warn!(cause = %error, "completion model busy");
            Error::upstream_busy("AI service is currently busy. Please try again in a moment.")
        }
        CompletionModelError::Configuration { message } => {
            // The cause stays server-side; callers get a generic failure.
            error!(cause = %message, "completion model configuration error");
            Error::internal("AI service configuration error. Please contact support.")
        }
        CompletionModelError::Transport { message } | CompletionModelError::Decode { message } => {
            error!(cause = %message, "completion model request failed");
            Error::internal("Failed to generate release notes. Please try again.")
        }
    }
}

/// A freshly generated draft plus the caller's remaining balance.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedNote {
    pub note: Note,
    /// `-1` communicates "unlimited" for unmetered accounts.
    pub credits_remaining: i32,
}

/// Orchestrates commit selection into a persisted draft note.
#[derive(Clone)]
pub struct NoteGenerationService {
    accounts: Arc<dyn AccountRepository>,
    projects: Arc<dyn ProjectRepository>,
    notes: Arc<dyn NoteRepository>,
    model: Arc<dyn CompletionModel>,
}

impl NoteGenerationService {
    /// Create a new service over its collaborating ports.
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        projects: Arc<dyn ProjectRepository>,
        notes: Arc<dyn NoteRepository>,
        model: Arc<dyn CompletionModel>,
    ) -> Self {
        Self {
            accounts,
            projects,
            notes,
            model,
        }
    }

    /// Generate and persist a draft note from the selected commits,
    /// consuming one credit unless the account is unmetered.
    pub async fn generate(
        &self,
        account_id: &AccountId,
        project_id: &ProjectId,
        selected_commits: &[SelectedCommit],
        title: Option<String>,
    ) -> Result<GeneratedNote, Error> {
        if selected_commits.is_empty() {
            return Err(Error::invalid_request(
                "Project ID and selected commits are required",
            ));
        }

        let account = require_account(&self.accounts, account_id).await?;
        if !account.can_generate() {
            return Err(Error::credits_exhausted());
        }

        // Ownership is enforced by the scoped query; absent and not-owned
        // are indistinguishable to the caller.
        let project = self
            .projects
            .find_for_account(project_id, account_id)
            .await
            .map_err(map_project_repository_error)?
            .ok_or_else(|| Error::not_found("Project not found"))?;

        let content = self
            .model
            .complete(&CompletionRequest {
                system: SYSTEM_INSTRUCTION.to_owned(),
                prompt: build_prompt(&project, selected_commits, title.as_deref()),
            })
            .await
            .map_err(map_completion_error)?;

        let note = self
            .notes
            .insert(&NewNote {
                account_id: account.id,
                project_id: project.id,
                title: title.unwrap_or_else(|| DEFAULT_NOTE_TITLE.to_owned()),
                content,
                version: None,
                commits: selected_commits
                    .iter()
                    .map(|commit| commit.sha.clone())
                    .collect(),
            })
            .await
            .map_err(map_note_repository_error)?;

        let credits_remaining = if account.unmetered {
            UNLIMITED_CREDITS
        } else {
            let balance = self
                .accounts
                .debit_credit(account_id)
                .await
                .map_err(map_account_repository_error)?;
            balance.unwrap_or_else(|| {
                warn!(account = %account_id, "account vanished before credit debit");
                0
            })
        };

        Ok(GeneratedNote {
            note,
            credits_remaining,
        })
    }
}

#[cfg(test)]
#[path = "note_generation_tests.rs"]
mod tests;
