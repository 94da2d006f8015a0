//! GitHub browsing endpoints used by the commit picker.
//!
//! ```text
//! GET /api/github/repositories            List repositories for the session
//! GET /api/github/commits?repository=...  List commits on the main branch
//! ```

use actix_web::{HttpResponse, get, web};
use serde::{Deserialize, Serialize};

use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{CommitDto, RepositoryDto};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_repo_ref, parse_timestamp};

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RepositoriesResponse {
    pub repositories: Vec<RepositoryDto>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CommitsResponse {
    pub commits: Vec<CommitDto>,
    pub count: usize,
}

#[utoipa::path(
    get,
    path = "/api/github/repositories",
    responses(
        (status = 200, description = "Repositories visible to the stored token", body = RepositoriesResponse),
        (status = 401, description = "No session or GitHub authorization expired", body = crate::domain::Error),
        (status = 429, description = "GitHub rate limit exceeded", body = crate::domain::Error)
    ),
    tags = ["github"],
    operation_id = "listRepositories"
)]
#[get("/github/repositories")]
pub async fn list_repositories(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let account_id = session.require_account_id()?;
    let repositories = state.browse.repositories(&account_id).await?;
    Ok(HttpResponse::Ok().json(RepositoriesResponse {
        repositories: repositories.iter().map(RepositoryDto::from).collect(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct CommitsQuery {
    repository: String,
    #[serde(default)]
    since: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/github/commits",
    params(
        ("repository" = String, Query, description = "Repository in owner/repo form"),
        ("since" = Option<String>, Query, description = "RFC 3339 lower bound on commit time")
    ),
    responses(
        (status = 200, description = "Commits on the main branch, newest first", body = CommitsResponse),
        (status = 400, description = "Malformed repository or timestamp", body = crate::domain::Error),
        (status = 401, description = "No session or GitHub authorization expired", body = crate::domain::Error)
    ),
    tags = ["github"],
    operation_id = "listCommits"
)]
#[get("/github/commits")]
pub async fn list_commits(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<CommitsQuery>,
) -> ApiResult<HttpResponse> {
    let account_id = session.require_account_id()?;
    let repository = parse_repo_ref("repository", &query.repository)?;
    let since = query
        .since
        .as_deref()
        .map(|raw| parse_timestamp("since", raw))
        .transpose()?;

    let commits = state.browse.commits(&account_id, &repository, since).await?;
    let payload: Vec<CommitDto> = commits.iter().map(CommitDto::from).collect();
    Ok(HttpResponse::Ok().json(CommitsResponse {
        count: payload.len(),
        commits: payload,
    }))
}
