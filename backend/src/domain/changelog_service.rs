//! Public changelog surfaces: view counting, the embeddable widget
//! payload, and the hosted changelog page data.
//!
//! Everything here is unauthenticated and keyed by project slug, so the
//! queries never see an account id and only published notes are visible.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;

use crate::domain::ports::{NoteRepository, NoteRepositoryError, ProjectRepository};
use crate::domain::project_service::map_project_repository_error;
use crate::domain::{Error, Note, NoteId, Project};

/// Default lookback window for the widget, in days.
pub const WIDGET_DEFAULT_DAYS: i64 = 30;
/// Default number of updates the widget shows.
pub const WIDGET_DEFAULT_LIMIT: i64 = 3;
/// Summaries are truncated to this many characters.
const SUMMARY_LEN: usize = 120;

pub(crate) fn map_note_repository_error(error: NoteRepositoryError) -> Error {
    match error {
        NoteRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("note store unavailable: {message}"))
        }
        NoteRepositoryError::Query { message } => {
            Error::internal(format!("note store error: {message}"))
        }
    }
}

/// Truncate note content to a widget-sized summary.
fn summarise(content: &str) -> String {
    if content.chars().count() <= SUMMARY_LEN {
        return content.to_owned();
    }
    let cut: String = content.chars().take(SUMMARY_LEN).collect();
    format!("{cut}...")
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetProject {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetStats {
    pub total_updates: usize,
    pub period: String,
    pub has_new_updates: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetUpdate {
    pub id: NoteId,
    pub title: String,
    pub published_at: Option<chrono::DateTime<Utc>>,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetLinks {
    pub changelog: String,
    pub widget: String,
}

/// Payload served to the embeddable widget script.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetData {
    pub project: WidgetProject,
    pub stats: WidgetStats,
    pub recent_updates: Vec<WidgetUpdate>,
    pub links: WidgetLinks,
}

/// A project together with its published notes, for the hosted page.
#[derive(Debug, Clone)]
pub struct ChangelogPage {
    pub project: Project,
    pub notes: Vec<Note>,
}

/// Read-side service for the public changelog and widget endpoints.
#[derive(Clone)]
pub struct ChangelogService {
    projects: Arc<dyn ProjectRepository>,
    notes: Arc<dyn NoteRepository>,
    base_url: String,
}

impl ChangelogService {
    /// `base_url` is the public origin used to build share links, without
    /// a trailing slash.
    pub fn new(
        projects: Arc<dyn ProjectRepository>,
        notes: Arc<dyn NoteRepository>,
        base_url: String,
    ) -> Self {
        Self {
            projects,
            notes,
            base_url,
        }
    }

    /// Count one view of a published note. Unpublished and unknown notes
    /// both report not found so drafts stay invisible.
    pub async fn record_view(&self, note_id: &NoteId) -> Result<(), Error> {
        let counted = self
            .notes
            .record_view(note_id)
            .await
            .map_err(map_note_repository_error)?;
        if counted {
            Ok(())
        } else {
            Err(Error::not_found("Published patch note not found"))
        }
    }

    /// Build the widget payload for a project's public slug.
    pub async fn widget(
        &self,
        slug: &str,
        days: Option<i64>,
        limit: Option<i64>,
    ) -> Result<WidgetData, Error> {
        let days = days.unwrap_or(WIDGET_DEFAULT_DAYS).max(1);
        let limit = limit.unwrap_or(WIDGET_DEFAULT_LIMIT).max(1);

        let project = self
            .projects
            .find_active_by_slug(slug)
            .await
            .map_err(map_project_repository_error)?
            .ok_or_else(|| Error::not_found("Project not found"))?;

        let since = Utc::now() - Duration::days(days);
        let recent = self
            .notes
            .list_published(&project.id, Some(since), Some(limit))
            .await
            .map_err(map_note_repository_error)?;

        let updates: Vec<WidgetUpdate> = recent
            .iter()
            .map(|note| WidgetUpdate {
                id: note.id,
                title: note.title.clone(),
                published_at: note.published_at,
                summary: summarise(&note.content),
            })
            .collect();

        Ok(WidgetData {
            project: WidgetProject {
                name: project.name.clone(),
                slug: project.slug.clone(),
                description: project.description.clone(),
            },
            stats: WidgetStats {
                total_updates: updates.len(),
                period: format!("{days} days"),
                has_new_updates: !updates.is_empty(),
            },
            recent_updates: updates,
            links: WidgetLinks {
                changelog: format!("{}/{}", self.base_url, project.slug),
                widget: format!("{}/api/widget/{}", self.base_url, project.slug),
            },
        })
    }

    /// All published notes for the hosted changelog page, newest first.
    pub async fn changelog_page(&self, slug: &str) -> Result<ChangelogPage, Error> {
        let project = self
            .projects
            .find_by_slug(slug)
            .await
            .map_err(map_project_repository_error)?
            .ok_or_else(|| Error::not_found("Project not found"))?;

        let notes = self
            .notes
            .list_published(&project.id, None, None)
            .await
            .map_err(map_note_repository_error)?;

        Ok(ChangelogPage { project, notes })
    }
}

#[cfg(test)]
#[path = "changelog_service_tests.rs"]
mod tests;
