//! Shared validation helpers for inbound HTTP adapters.

use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{Error, NoteStatus, RepoRef};

fn field_error(field: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field }))
}

/// Parse a UUID path or query parameter.
pub(crate) fn parse_uuid(field: &str, raw: &str) -> Result<Uuid, Error> {
    raw.parse::<Uuid>()
        .map_err(|_| field_error(field, format!("{field} must be a valid UUID")))
}

/// Parse an `owner/repo` reference from a query or body field.
pub(crate) fn parse_repo_ref(field: &str, raw: &str) -> Result<RepoRef, Error> {
    raw.parse::<RepoRef>()
        .map_err(|_| field_error(field, "Repository must be in 'owner/repo' format"))
}

/// Parse a note status from its query or body representation.
pub(crate) fn parse_status(field: &str, raw: &str) -> Result<NoteStatus, Error> {
    raw.parse::<NoteStatus>()
        .map_err(|_| field_error(field, "Status must be 'draft' or 'published'"))
}

/// Parse an RFC 3339 timestamp.
pub(crate) fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|stamp| stamp.with_timezone(&Utc))
        .map_err(|_| field_error(field, format!("{field} must be an RFC 3339 timestamp")))
}
