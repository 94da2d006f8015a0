//! Release note generation endpoint.
//!
//! ```text
//! POST /api/openai/generate  Turn selected commits into a draft note
//! ```
//!
//! Consumes one credit per successful generation; exhausted accounts get
//! 403 with a redirect hint towards the feedback form.

use actix_web::{HttpResponse, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ProjectId, SelectedCommit};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::NoteDto;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// One commit chosen in the picker, echoing the GitHub listing fields.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectedCommitDto {
    pub sha: String,
    pub message: String,
    pub author_name: String,
    pub authored_at: DateTime<Utc>,
    #[serde(default)]
    pub additions: Option<i64>,
    #[serde(default)]
    pub deletions: Option<i64>,
}

impl From<SelectedCommitDto> for SelectedCommit {
    fn from(dto: SelectedCommitDto) -> Self {
        Self {
            sha: dto.sha,
            message: dto.message,
            author_name: dto.author_name,
            authored_at: dto.authored_at,
            additions: dto.additions,
            deletions: dto.deletions,
        }
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[schema(value_type = String, format = Uuid)]
    pub project_id: ProjectId,
    pub selected_commits: Vec<SelectedCommitDto>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub patch_note: NoteDto,
    /// `-1` means unlimited.
    pub credits_remaining: i32,
}

#[utoipa::path(
    post,
    path = "/api/openai/generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Draft note generated", body = GenerateResponse),
        (status = 400, description = "Missing project or commits", body = crate::domain::Error),
        (status = 401, description = "No session", body = crate::domain::Error),
        (status = 403, description = "No credits remaining", body = crate::domain::Error),
        (status = 404, description = "Project not found", body = crate::domain::Error),
        (status = 429, description = "AI service busy", body = crate::domain::Error)
    ),
    tags = ["generation"],
    operation_id = "generatePatchNote"
)]
#[post("/openai/generate")]
pub async fn generate(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<GenerateRequest>,
) -> ApiResult<HttpResponse> {
    let account_id = session.require_account_id()?;
    let request = payload.into_inner();

    let commits: Vec<SelectedCommit> = request
        .selected_commits
        .into_iter()
        .map(SelectedCommit::from)
        .collect();

    let generated = state
        .generation
        .generate(&account_id, &request.project_id, &commits, request.title)
        .await?;

    Ok(HttpResponse::Ok().json(GenerateResponse {
        patch_note: NoteDto::from(&generated.note),
        credits_remaining: generated.credits_remaining,
    }))
}
