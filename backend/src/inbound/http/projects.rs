//! Project CRUD and repository connection management.
//!
//! ```text
//! POST   /api/projects                      Create a project
//! GET    /api/projects                      List the session's projects
//! GET    /api/projects/{id}                 Fetch one project
//! PUT    /api/projects/{id}                 Rename / edit description
//! DELETE /api/projects/{id}                 Delete with its notes
//! PUT    /api/projects/{id}/repository      Point at a different repository
//! PATCH  /api/projects/{id}/repository      Reconnect the stored repository
//! DELETE /api/projects/{id}/repository      Disconnect (soft-disable)
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::Deserialize;

use crate::domain::{Error, ProjectId, ProjectUpdate};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::ProjectDto;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_repo_ref, parse_uuid};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    pub name: String,
    /// Repository in `owner/repo` form.
    pub repository: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/projects",
    request_body = CreateRequest,
    responses(
        (status = 201, description = "Project created", body = ProjectDto),
        (status = 400, description = "Invalid name or repository", body = crate::domain::Error),
        (status = 401, description = "No session", body = crate::domain::Error),
        (status = 409, description = "Slug or repository already taken", body = crate::domain::Error)
    ),
    tags = ["projects"],
    operation_id = "createProject"
)]
#[post("/projects")]
pub async fn create_project(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateRequest>,
) -> ApiResult<HttpResponse> {
    let account_id = session.require_account_id()?;
    let request = payload.into_inner();
    let repository = parse_repo_ref("repository", &request.repository)?;

    let project = state
        .projects
        .create(&account_id, &request.name, repository, request.description)
        .await?;
    Ok(HttpResponse::Created().json(ProjectDto::from(&project)))
}

#[utoipa::path(
    get,
    path = "/api/projects",
    responses(
        (status = 200, description = "The session's projects", body = [ProjectDto]),
        (status = 401, description = "No session", body = crate::domain::Error)
    ),
    tags = ["projects"],
    operation_id = "listProjects"
)]
#[get("/projects")]
pub async fn list_projects(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let account_id = session.require_account_id()?;
    let projects = state.projects.list(&account_id).await?;
    let payload: Vec<ProjectDto> = projects.iter().map(ProjectDto::from).collect();
    Ok(HttpResponse::Ok().json(payload))
}

#[utoipa::path(
    get,
    path = "/api/projects/{projectId}",
    params(("projectId" = String, Path, description = "Project id")),
    responses(
        (status = 200, description = "The project", body = ProjectDto),
        (status = 401, description = "No session", body = crate::domain::Error),
        (status = 404, description = "Project not found", body = crate::domain::Error)
    ),
    tags = ["projects"],
    operation_id = "getProject"
)]
#[get("/projects/{project_id}")]
pub async fn get_project(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let account_id = session.require_account_id()?;
    let project_id = ProjectId::from_uuid(parse_uuid("projectId", &path.into_inner())?);
    let project = state.projects.get(&account_id, &project_id).await?;
    Ok(HttpResponse::Ok().json(ProjectDto::from(&project)))
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditRequest {
    #[serde(default)]
    pub name: Option<String>,
    /// Present-but-null clears the description.
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub description: Option<Option<String>>,
}

fn deserialize_nullable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Some(Option::<String>::deserialize(deserializer)?))
}

#[utoipa::path(
    put,
    path = "/api/projects/{projectId}",
    params(("projectId" = String, Path, description = "Project id")),
    request_body = EditRequest,
    responses(
        (status = 200, description = "The updated project", body = ProjectDto),
        (status = 401, description = "No session", body = crate::domain::Error),
        (status = 404, description = "Project not found", body = crate::domain::Error),
        (status = 409, description = "Renamed slug already taken", body = crate::domain::Error)
    ),
    tags = ["projects"],
    operation_id = "editProject"
)]
#[put("/projects/{project_id}")]
pub async fn edit_project(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<EditRequest>,
) -> ApiResult<HttpResponse> {
    let account_id = session.require_account_id()?;
    let project_id = ProjectId::from_uuid(parse_uuid("projectId", &path.into_inner())?);
    let request = payload.into_inner();

    let project = state
        .projects
        .update(
            &account_id,
            &project_id,
            ProjectUpdate {
                name: request.name,
                description: request.description,
            },
        )
        .await?;
    Ok(HttpResponse::Ok().json(ProjectDto::from(&project)))
}

#[utoipa::path(
    delete,
    path = "/api/projects/{projectId}",
    params(("projectId" = String, Path, description = "Project id")),
    responses(
        (status = 204, description = "Project and its notes deleted"),
        (status = 401, description = "No session", body = crate::domain::Error),
        (status = 404, description = "Project not found", body = crate::domain::Error)
    ),
    tags = ["projects"],
    operation_id = "deleteProject"
)]
#[delete("/projects/{project_id}")]
pub async fn delete_project(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let account_id = session.require_account_id()?;
    let project_id = ProjectId::from_uuid(parse_uuid("projectId", &path.into_inner())?);
    state.projects.delete(&account_id, &project_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRepositoryRequest {
    /// Repository in `owner/repo` form.
    pub repository: String,
}

async fn session_token(
    state: &HttpState,
    session: &SessionContext,
) -> ApiResult<(crate::domain::AccountId, crate::domain::AccessToken)> {
    let account_id = session.require_account_id()?;
    let account = state.accounts.account(&account_id).await?;
    let token = account.access_token.clone().ok_or_else(|| {
        Error::invalid_request(
            "GitHub access token not found. Please reconnect your GitHub account.",
        )
    })?;
    Ok((account_id, token))
}

#[utoipa::path(
    put,
    path = "/api/projects/{projectId}/repository",
    params(("projectId" = String, Path, description = "Project id")),
    request_body = ChangeRepositoryRequest,
    responses(
        (status = 200, description = "Repository changed", body = ProjectDto),
        (status = 400, description = "Repository not accessible", body = crate::domain::Error),
        (status = 401, description = "No session", body = crate::domain::Error),
        (status = 404, description = "Project not found", body = crate::domain::Error)
    ),
    tags = ["projects"],
    operation_id = "changeProjectRepository"
)]
#[put("/projects/{project_id}/repository")]
pub async fn change_repository(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ChangeRepositoryRequest>,
) -> ApiResult<HttpResponse> {
    let project_id = ProjectId::from_uuid(parse_uuid("projectId", &path.into_inner())?);
    let repository = parse_repo_ref("repository", &payload.repository)?;
    let (account_id, token) = session_token(&state, &session).await?;

    let project = state
        .projects
        .change_repository(&account_id, &project_id, &token, repository)
        .await?;
    Ok(HttpResponse::Ok().json(ProjectDto::from(&project)))
}

#[utoipa::path(
    patch,
    path = "/api/projects/{projectId}/repository",
    params(("projectId" = String, Path, description = "Project id")),
    responses(
        (status = 200, description = "Repository reconnected", body = ProjectDto),
        (status = 400, description = "Repository not accessible", body = crate::domain::Error),
        (status = 401, description = "No session", body = crate::domain::Error),
        (status = 404, description = "Project not found", body = crate::domain::Error)
    ),
    tags = ["projects"],
    operation_id = "reconnectProjectRepository"
)]
#[patch("/projects/{project_id}/repository")]
pub async fn reconnect_repository(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let project_id = ProjectId::from_uuid(parse_uuid("projectId", &path.into_inner())?);
    let (account_id, token) = session_token(&state, &session).await?;

    let project = state
        .projects
        .reconnect_repository(&account_id, &project_id, &token)
        .await?;
    Ok(HttpResponse::Ok().json(ProjectDto::from(&project)))
}

#[utoipa::path(
    delete,
    path = "/api/projects/{projectId}/repository",
    params(("projectId" = String, Path, description = "Project id")),
    responses(
        (status = 200, description = "Repository disconnected", body = ProjectDto),
        (status = 401, description = "No session", body = crate::domain::Error),
        (status = 404, description = "Project not found", body = crate::domain::Error)
    ),
    tags = ["projects"],
    operation_id = "disconnectProjectRepository"
)]
#[delete("/projects/{project_id}/repository")]
pub async fn disconnect_repository(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let account_id = session.require_account_id()?;
    let project_id = ProjectId::from_uuid(parse_uuid("projectId", &path.into_inner())?);
    let project = state
        .projects
        .disconnect_repository(&account_id, &project_id)
        .await?;
    Ok(HttpResponse::Ok().json(ProjectDto::from(&project)))
}
