//! Hosted public changelog page.
//!
//! ```text
//! GET /{projectSlug}  Server-rendered HTML listing published notes
//! ```
//!
//! Rendered without a template engine; the page is a single column of
//! published notes, newest first, with all user content HTML-escaped.

use actix_web::{HttpResponse, get, web};
use std::fmt::Write;

use crate::domain::Note;
use crate::domain::changelog_service::ChangelogPage;
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn render_note(html: &mut String, note: &Note) {
    let _ = write!(html, "<article class=\"note\"><h2>{}</h2>", escape_html(&note.title));
    if let Some(published_at) = note.published_at {
        let _ = write!(
            html,
            "<time datetime=\"{}\">{}</time>",
            published_at.to_rfc3339(),
            published_at.format("%-d %B %Y"),
        );
    }
    let _ = write!(html, "<pre>{}</pre></article>", escape_html(&note.content));
}

fn render_page(page: &ChangelogPage) -> String {
    let mut html = String::from("<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\">");
    let _ = write!(
        html,
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{} - Changelog</title></head><body><main>",
        escape_html(&page.project.name)
    );
    let _ = write!(html, "<h1>{}</h1>", escape_html(&page.project.name));
    if let Some(description) = &page.project.description {
        let _ = write!(html, "<p>{}</p>", escape_html(description));
    }
    if page.notes.is_empty() {
        html.push_str("<p>No updates published yet.</p>");
    } else {
        for note in &page.notes {
            render_note(&mut html, note);
        }
    }
    html.push_str("</main></body></html>");
    html
}

#[utoipa::path(
    get,
    path = "/{projectSlug}",
    params(("projectSlug" = String, Path, description = "Public project slug")),
    responses(
        (status = 200, description = "Changelog page", content_type = "text/html"),
        (status = 404, description = "Unknown project", body = crate::domain::Error)
    ),
    security([]),
    tags = ["public"],
    operation_id = "getChangelogPage"
)]
#[get("/{slug}")]
pub async fn changelog_page(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let page = state.changelog.changelog_page(&path.into_inner()).await?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(render_page(&page)))
}
