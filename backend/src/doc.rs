//! OpenAPI documentation configuration.
//!
//! Generates the document served by Swagger UI in debug builds.
//! Public endpoints (widget, changelog page, view counting) override the
//! default session-cookie security requirement with `security([])`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::auth::LoginRequest;
use crate::inbound::http::credits::CreditsResponse;
use crate::inbound::http::dto::{
    AccountDto, CommitDto, FeedbackSubmissionDto, NoteDto, ProjectDto, RepositoryDto,
};
use crate::inbound::http::feedback::{CreditsResetDto, FeedbackRequest, FeedbackResponse};
use crate::inbound::http::generate::{GenerateRequest, GenerateResponse, SelectedCommitDto};
use crate::inbound::http::github::{CommitsResponse, RepositoriesResponse};
use crate::inbound::http::patch_notes::UpdateRequest;
use crate::inbound::http::projects::{ChangeRepositoryRequest, CreateRequest, EditRequest};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/auth/session.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "ShipNotes backend API",
        description = "HTTP interface for commit browsing, release note generation, \
                       and public changelog delivery."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::start_session,
        crate::inbound::http::auth::current_session,
        crate::inbound::http::auth::end_session,
        crate::inbound::http::github::list_repositories,
        crate::inbound::http::github::list_commits,
        crate::inbound::http::generate::generate,
        crate::inbound::http::patch_notes::list_notes,
        crate::inbound::http::patch_notes::get_note,
        crate::inbound::http::patch_notes::update_note,
        crate::inbound::http::patch_notes::delete_note,
        crate::inbound::http::patch_notes::record_view,
        crate::inbound::http::projects::create_project,
        crate::inbound::http::projects::list_projects,
        crate::inbound::http::projects::get_project,
        crate::inbound::http::projects::edit_project,
        crate::inbound::http::projects::delete_project,
        crate::inbound::http::projects::change_repository,
        crate::inbound::http::projects::reconnect_repository,
        crate::inbound::http::projects::disconnect_repository,
        crate::inbound::http::credits::get_credits,
        crate::inbound::http::feedback::submit_feedback,
        crate::inbound::http::feedback::list_feedback,
        crate::inbound::http::widget::widget,
        crate::inbound::http::changelog::changelog_page,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        AccountDto,
        ProjectDto,
        NoteDto,
        RepositoryDto,
        CommitDto,
        FeedbackSubmissionDto,
        LoginRequest,
        GenerateRequest,
        GenerateResponse,
        SelectedCommitDto,
        UpdateRequest,
        CreateRequest,
        EditRequest,
        ChangeRepositoryRequest,
        CreditsResponse,
        RepositoriesResponse,
        CommitsResponse,
        FeedbackRequest,
        FeedbackResponse,
        CreditsResetDto,
    )),
    tags(
        (name = "auth", description = "Login session management"),
        (name = "github", description = "Repository and commit browsing"),
        (name = "generation", description = "Release note generation"),
        (name = "patch-notes", description = "Note lifecycle"),
        (name = "projects", description = "Project management"),
        (name = "credits", description = "Credit balance"),
        (name = "feedback", description = "Feedback and credit resets"),
        (name = "public", description = "Unauthenticated changelog surfaces"),
        (name = "health", description = "Probes")
    )
)]
pub struct ApiDoc;
