//! Login session endpoints.
//!
//! ```text
//! POST   /api/auth/session  Sync a verified OAuth login and start a session
//! GET    /api/auth/session  Fetch the logged-in account
//! DELETE /api/auth/session  Log out
//! ```
//!
//! The OAuth dance itself happens upstream; this adapter receives the
//! already-verified GitHub profile, upserts the account, and issues the
//! session cookie.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::Deserialize;

use crate::domain::{AccessToken, LoginProfile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::AccountDto;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Verified GitHub profile delivered by the OAuth frontend.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Stable numeric GitHub user id, as a string.
    pub github_user_id: String,
    pub username: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// OAuth access token with `repo` scope.
    pub access_token: String,
    pub email: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/session",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Account synced and session started", body = AccountDto),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 503, description = "Account store unavailable", body = crate::domain::Error)
    ),
    tags = ["auth"],
    operation_id = "startSession"
)]
#[post("/auth/session")]
pub async fn start_session(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    let account = state
        .accounts
        .sync_login(&LoginProfile {
            github_user_id: request.github_user_id,
            github_username: request.username,
            github_avatar_url: request.avatar_url,
            access_token: AccessToken::new(request.access_token),
            email: request.email,
        })
        .await?;

    session.persist_account(&account.id)?;
    Ok(HttpResponse::Ok().json(AccountDto::from(&account)))
}

#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "The logged-in account", body = AccountDto),
        (status = 401, description = "No session", body = crate::domain::Error)
    ),
    tags = ["auth"],
    operation_id = "currentSession"
)]
#[get("/auth/session")]
pub async fn current_session(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let account_id = session.require_account_id()?;
    let account = state.accounts.account(&account_id).await?;
    Ok(HttpResponse::Ok().json(AccountDto::from(&account)))
}

#[utoipa::path(
    delete,
    path = "/api/auth/session",
    responses((status = 204, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "endSession"
)]
#[delete("/auth/session")]
pub async fn end_session(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}
