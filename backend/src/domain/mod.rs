//! Core business logic, independent of HTTP and storage.
//!
//! Entities and value types live in the flat modules here; all I/O goes
//! through the traits in [`ports`], so every service in this module is
//! testable against mocks or the in-memory fixtures.

pub mod account;
pub mod account_service;
pub mod changelog_service;
pub mod commit;
pub mod commit_browse;
pub mod error;
pub mod feedback;
pub mod feedback_service;
pub mod note;
pub mod note_generation;
pub mod note_service;
pub mod ports;
pub mod project;
pub mod project_service;
pub mod release_prompt;
pub mod slug;

pub use account::{
    AccessToken, Account, AccountId, CreditStatus, LoginProfile, CREDIT_ALLOWANCE,
    UNLIMITED_CREDITS,
};
pub use account_service::AccountService;
pub use changelog_service::{ChangelogPage, ChangelogService, WidgetData};
pub use commit::{Commit, Repository, SelectedCommit};
pub use commit_browse::CommitBrowseService;
pub use error::{Error, ErrorCode};
pub use feedback::{FeedbackAnswers, FeedbackSubmission, RequestMeta};
pub use feedback_service::{CreditsReset, FeedbackService};
pub use note::{Note, NoteId, NoteStatus};
pub use note_generation::{GeneratedNote, NoteGenerationService};
pub use note_service::{NoteService, UpdateNoteRequest};
pub use project::{Project, ProjectId, RepoRef};
pub use project_service::{ProjectService, ProjectUpdate};
