//! Embeddable widget endpoint.
//!
//! ```text
//! GET     /api/widget/{projectSlug}  Widget payload (public, CORS *)
//! OPTIONS /api/widget/{projectSlug}  Preflight for cross-origin embeds
//! ```
//!
//! Served to third-party pages, so responses carry a wildcard CORS policy
//! and a short shared cache lifetime instead of the session middleware.

use actix_web::http::header;
use actix_web::{HttpResponse, get, route, web};
use serde::Deserialize;

use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

const CACHE_POLICY: &str = "public, max-age=300";

fn cors_headers(response: &mut actix_web::HttpResponseBuilder) -> &mut actix_web::HttpResponseBuilder {
    response
        .insert_header((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .insert_header((header::ACCESS_CONTROL_ALLOW_METHODS, "GET, OPTIONS"))
        .insert_header((header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"))
}

#[derive(Debug, Deserialize)]
pub struct WidgetQuery {
    #[serde(default)]
    days: Option<i64>,
    #[serde(default)]
    limit: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/widget/{projectSlug}",
    params(
        ("projectSlug" = String, Path, description = "Public project slug"),
        ("days" = Option<i64>, Query, description = "Lookback window in days (default 30)"),
        ("limit" = Option<i64>, Query, description = "Maximum updates returned (default 3)")
    ),
    responses(
        (status = 200, description = "Widget payload"),
        (status = 404, description = "Project unknown or inactive", body = crate::domain::Error)
    ),
    security([]),
    tags = ["public"],
    operation_id = "getWidget"
)]
#[get("/api/widget/{slug}")]
pub async fn widget(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<WidgetQuery>,
) -> ApiResult<HttpResponse> {
    let data = state
        .changelog
        .widget(&path.into_inner(), query.days, query.limit)
        .await?;

    let mut response = HttpResponse::Ok();
    cors_headers(&mut response).insert_header((header::CACHE_CONTROL, CACHE_POLICY));
    Ok(response.json(data))
}

#[route("/api/widget/{slug}", method = "OPTIONS")]
pub async fn widget_preflight() -> HttpResponse {
    let mut response = HttpResponse::NoContent();
    cors_headers(&mut response);
    response.finish()
}
