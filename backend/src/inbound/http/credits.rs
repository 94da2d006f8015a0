//! Credit balance endpoint for the dashboard.
//!
//! ```text
//! GET /api/user/credits  Remaining generation credits
//! ```

use actix_web::{HttpResponse, get, web};
use serde::Serialize;

use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreditsResponse {
    /// `-1` means unlimited.
    pub credits: i32,
    pub unlimited: bool,
}

#[utoipa::path(
    get,
    path = "/api/user/credits",
    responses(
        (status = 200, description = "Remaining credits", body = CreditsResponse),
        (status = 401, description = "No session", body = crate::domain::Error),
        (status = 404, description = "Account not found", body = crate::domain::Error)
    ),
    tags = ["credits"],
    operation_id = "getCredits"
)]
#[get("/user/credits")]
pub async fn get_credits(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let account_id = session.require_account_id()?;
    let status = state.accounts.credit_status(&account_id).await?;
    Ok(HttpResponse::Ok().json(CreditsResponse {
        credits: status.remaining,
        unlimited: status.unmetered,
    }))
}
