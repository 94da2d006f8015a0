//! Feedback submission and history endpoints.
//!
//! ```text
//! POST /api/feedback  Submit the survey, resetting credits to the ceiling
//! GET  /api/feedback  The session's recent submissions
//! ```

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{FeedbackAnswers, RequestMeta};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::FeedbackSubmissionDto;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    /// "What's the #1 feature you'd add?"
    pub desired_feature: String,
    /// "What almost stopped you from trying the product?"
    pub barrier: String,
    /// "How do you currently share product updates?"
    pub current_method: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CreditsResetDto {
    pub before: i32,
    pub after: i32,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    pub credits_reset: CreditsResetDto,
}

fn request_meta(request: &HttpRequest) -> RequestMeta {
    RequestMeta {
        ip_address: request
            .connection_info()
            .realip_remote_addr()
            .map(str::to_owned),
        user_agent: request
            .headers()
            .get(actix_web::http::header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned),
    }
}

#[utoipa::path(
    post,
    path = "/api/feedback",
    request_body = FeedbackRequest,
    responses(
        (status = 200, description = "Credits reset", body = FeedbackResponse),
        (status = 400, description = "Answer too short/long or balance already full", body = crate::domain::Error),
        (status = 401, description = "No session", body = crate::domain::Error),
        (status = 429, description = "Cooldown in effect", body = crate::domain::Error)
    ),
    tags = ["feedback"],
    operation_id = "submitFeedback"
)]
#[post("/feedback")]
pub async fn submit_feedback(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
    payload: web::Json<FeedbackRequest>,
) -> ApiResult<HttpResponse> {
    let account_id = session.require_account_id()?;
    let body = payload.into_inner();

    let reset = state
        .feedback
        .submit(
            &account_id,
            FeedbackAnswers {
                desired_feature: body.desired_feature,
                barrier: body.barrier,
                current_method: body.current_method,
            },
            request_meta(&request),
        )
        .await?;

    Ok(HttpResponse::Ok().json(FeedbackResponse {
        credits_reset: CreditsResetDto {
            before: reset.before,
            after: reset.after,
        },
    }))
}

#[utoipa::path(
    get,
    path = "/api/feedback",
    responses(
        (status = 200, description = "Recent submissions, newest first", body = [FeedbackSubmissionDto]),
        (status = 401, description = "No session", body = crate::domain::Error)
    ),
    tags = ["feedback"],
    operation_id = "listFeedback"
)]
#[get("/feedback")]
pub async fn list_feedback(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let account_id = session.require_account_id()?;
    let submissions = state.feedback.history(&account_id).await?;
    let payload: Vec<FeedbackSubmissionDto> =
        submissions.iter().map(FeedbackSubmissionDto::from).collect();
    Ok(HttpResponse::Ok().json(payload))
}
