//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and remain testable without I/O. The services
//! themselves are cheap clones over `Arc`ed ports.

use crate::domain::{
    AccountService, ChangelogService, CommitBrowseService, FeedbackService, NoteGenerationService,
    NoteService, ProjectService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: AccountService,
    pub browse: CommitBrowseService,
    pub changelog: ChangelogService,
    pub feedback: FeedbackService,
    pub generation: NoteGenerationService,
    pub notes: NoteService,
    pub projects: ProjectService,
}
