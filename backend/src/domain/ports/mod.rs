//! Domain ports: async traits implemented by outbound adapters.
//!
//! Services depend only on these traits; persistence, GitHub, and OpenAI
//! details live behind them. Each port carries its own error enum so the
//! core never depends on a specific client's error shape.

pub mod account_repository;
pub mod commit_source;
pub mod completion_model;
pub mod feedback_repository;
pub mod note_repository;
pub mod project_repository;

pub use account_repository::{
    AccountRepository, AccountRepositoryError, FixtureAccountRepository,
};
pub use commit_source::{CommitSource, CommitSourceError};
pub use completion_model::{CompletionModel, CompletionModelError, CompletionRequest};
pub use feedback_repository::{
    FeedbackInsertOutcome, FeedbackRepository, FeedbackRepositoryError, FixtureFeedbackRepository,
    NewFeedbackSubmission,
};
pub use note_repository::{
    FixtureNoteRepository, NewNote, NoteFilter, NoteRepository, NoteRepositoryError, NoteUpdate,
};
pub use project_repository::{
    FixtureProjectRepository, NewProject, ProjectRepository, ProjectRepositoryError,
};

#[cfg(test)]
pub use account_repository::MockAccountRepository;
#[cfg(test)]
pub use commit_source::MockCommitSource;
#[cfg(test)]
pub use completion_model::MockCompletionModel;
#[cfg(test)]
pub use feedback_repository::MockFeedbackRepository;
#[cfg(test)]
pub use note_repository::MockNoteRepository;
#[cfg(test)]
pub use project_repository::MockProjectRepository;
