//! Patch note CRUD and public view tracking.
//!
//! ```text
//! GET    /api/patch-notes            List the session's notes
//! GET    /api/patch-notes/{id}       Fetch one owned note
//! PUT    /api/patch-notes/{id}       Save or publish an owned note
//! DELETE /api/patch-notes/{id}       Delete an owned note
//! POST   /api/patch-notes/{id}/view  Count a public view (no session)
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::Deserialize;

use crate::domain::{NoteId, ProjectId, UpdateNoteRequest};
use crate::domain::ports::NoteFilter;
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::NoteDto;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_status, parse_uuid};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default)]
    project_id: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/patch-notes",
    params(
        ("projectId" = Option<String>, Query, description = "Filter by project id"),
        ("status" = Option<String>, Query, description = "Filter by status: draft or published")
    ),
    responses(
        (status = 200, description = "The session's notes, newest first", body = [NoteDto]),
        (status = 401, description = "No session", body = crate::domain::Error)
    ),
    tags = ["patch-notes"],
    operation_id = "listPatchNotes"
)]
#[get("/patch-notes")]
pub async fn list_notes(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListQuery>,
) -> ApiResult<HttpResponse> {
    let account_id = session.require_account_id()?;
    let filter = NoteFilter {
        project_id: query
            .project_id
            .as_deref()
            .map(|raw| parse_uuid("projectId", raw).map(ProjectId::from_uuid))
            .transpose()?,
        status: query
            .status
            .as_deref()
            .map(|raw| parse_status("status", raw))
            .transpose()?,
    };

    let notes = state.notes.list(&account_id, filter).await?;
    let payload: Vec<NoteDto> = notes.iter().map(NoteDto::from).collect();
    Ok(HttpResponse::Ok().json(payload))
}

#[utoipa::path(
    get,
    path = "/api/patch-notes/{noteId}",
    params(("noteId" = String, Path, description = "Note id")),
    responses(
        (status = 200, description = "The note", body = NoteDto),
        (status = 401, description = "No session", body = crate::domain::Error),
        (status = 404, description = "Note not found", body = crate::domain::Error)
    ),
    tags = ["patch-notes"],
    operation_id = "getPatchNote"
)]
#[get("/patch-notes/{note_id}")]
pub async fn get_note(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let account_id = session.require_account_id()?;
    let note_id = NoteId::from_uuid(parse_uuid("noteId", &path.into_inner())?);
    let note = state.notes.get(&account_id, &note_id).await?;
    Ok(HttpResponse::Ok().json(NoteDto::from(&note)))
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    pub title: String,
    pub content: String,
    /// `draft` or `published`; omitted keeps the stored status.
    #[serde(default)]
    pub status: Option<String>,
}

#[utoipa::path(
    put,
    path = "/api/patch-notes/{noteId}",
    params(("noteId" = String, Path, description = "Note id")),
    request_body = UpdateRequest,
    responses(
        (status = 200, description = "The updated note", body = NoteDto),
        (status = 400, description = "Missing title or content", body = crate::domain::Error),
        (status = 401, description = "No session", body = crate::domain::Error),
        (status = 404, description = "Note not found", body = crate::domain::Error)
    ),
    tags = ["patch-notes"],
    operation_id = "updatePatchNote"
)]
#[put("/patch-notes/{note_id}")]
pub async fn update_note(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateRequest>,
) -> ApiResult<HttpResponse> {
    let account_id = session.require_account_id()?;
    let note_id = NoteId::from_uuid(parse_uuid("noteId", &path.into_inner())?);
    let request = payload.into_inner();

    let status = request
        .status
        .as_deref()
        .map(|raw| parse_status("status", raw))
        .transpose()?;

    let note = state
        .notes
        .update(
            &account_id,
            &note_id,
            UpdateNoteRequest {
                title: request.title,
                content: request.content,
                status,
            },
        )
        .await?;
    Ok(HttpResponse::Ok().json(NoteDto::from(&note)))
}

#[utoipa::path(
    delete,
    path = "/api/patch-notes/{noteId}",
    params(("noteId" = String, Path, description = "Note id")),
    responses(
        (status = 204, description = "Note deleted"),
        (status = 401, description = "No session", body = crate::domain::Error),
        (status = 404, description = "Note not found", body = crate::domain::Error)
    ),
    tags = ["patch-notes"],
    operation_id = "deletePatchNote"
)]
#[delete("/patch-notes/{note_id}")]
pub async fn delete_note(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let account_id = session.require_account_id()?;
    let note_id = NoteId::from_uuid(parse_uuid("noteId", &path.into_inner())?);
    state.notes.delete(&account_id, &note_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    post,
    path = "/api/patch-notes/{noteId}/view",
    params(("noteId" = String, Path, description = "Note id")),
    responses(
        (status = 204, description = "View counted"),
        (status = 404, description = "Published note not found", body = crate::domain::Error)
    ),
    security([]),
    tags = ["patch-notes"],
    operation_id = "recordPatchNoteView"
)]
#[post("/patch-notes/{note_id}/view")]
pub async fn record_view(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let note_id = NoteId::from_uuid(parse_uuid("noteId", &path.into_inner())?);
    state.changelog.record_view(&note_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
