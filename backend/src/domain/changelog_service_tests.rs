//! Unit tests for the public widget, changelog page, and view counting.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ports::{MockNoteRepository, MockProjectRepository};
use crate::domain::{AccountId, ErrorCode, NoteStatus, ProjectId};

const BASE_URL: &str = "https://shipnotes.example";

fn project(slug: &str, active: bool) -> Project {
    let now = Utc::now();
    Project {
        id: ProjectId::random(),
        account_id: AccountId::random(),
        name: "ShipNotes".to_owned(),
        slug: slug.to_owned(),
        repository: "octocat/shipnotes".parse().expect("valid reference"),
        repository_url: "https://github.com/octocat/shipnotes".to_owned(),
        description: Some("Release notes on autopilot".to_owned()),
        active,
        created_at: now,
        updated_at: now,
    }
}

fn published_note(project_id: ProjectId, content: &str) -> Note {
    let now = Utc::now();
    Note {
        id: NoteId::random(),
        account_id: AccountId::random(),
        project_id,
        title: "Latest Updates".to_owned(),
        content: content.to_owned(),
        version: None,
        status: NoteStatus::Published,
        published_at: Some(now),
        commits: Vec::new(),
        view_count: 0,
        created_at: now,
        updated_at: now,
    }
}

fn service(
    projects: MockProjectRepository,
    notes: MockNoteRepository,
) -> ChangelogService {
    ChangelogService::new(Arc::new(projects), Arc::new(notes), BASE_URL.to_owned())
}

#[rstest]
#[tokio::test]
async fn record_view_counts_published_notes() {
    let projects = MockProjectRepository::new();
    let mut notes = MockNoteRepository::new();
    notes.expect_record_view().times(1).returning(|_| Ok(true));

    let result = service(projects, notes).record_view(&NoteId::random()).await;
    assert!(result.is_ok());
}

#[rstest]
#[tokio::test]
async fn record_view_of_draft_or_missing_note_is_not_found() {
    let projects = MockProjectRepository::new();
    let mut notes = MockNoteRepository::new();
    notes.expect_record_view().returning(|_| Ok(false));

    let err = service(projects, notes)
        .record_view(&NoteId::random())
        .await
        .expect_err("drafts are invisible");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn widget_applies_defaults_and_builds_links() {
    let active = project("shipnotes", true);
    let project_id = active.id;

    let mut projects = MockProjectRepository::new();
    projects
        .expect_find_active_by_slug()
        .withf(|slug| slug == "shipnotes")
        .returning(move |_| Ok(Some(active.clone())));
    let mut notes = MockNoteRepository::new();
    notes
        .expect_list_published()
        .withf(move |pid, since, limit| {
            *pid == project_id && since.is_some() && *limit == Some(WIDGET_DEFAULT_LIMIT)
        })
        .times(1)
        .returning(move |_, _, _| Ok(vec![published_note(project_id, "Short update")]));

    let data = service(projects, notes)
        .widget("shipnotes", None, None)
        .await
        .expect("widget resolves");
    assert_eq!(data.project.slug, "shipnotes");
    assert_eq!(data.stats.total_updates, 1);
    assert_eq!(data.stats.period, "30 days");
    assert!(data.stats.has_new_updates);
    assert_eq!(data.recent_updates[0].summary, "Short update");
    assert_eq!(data.links.changelog, format!("{BASE_URL}/shipnotes"));
    assert_eq!(data.links.widget, format!("{BASE_URL}/api/widget/shipnotes"));
}

#[rstest]
#[tokio::test]
async fn widget_truncates_long_summaries() {
    let active = project("shipnotes", true);
    let project_id = active.id;
    let long_content = "x".repeat(200);

    let mut projects = MockProjectRepository::new();
    projects
        .expect_find_active_by_slug()
        .returning(move |_| Ok(Some(active.clone())));
    let mut notes = MockNoteRepository::new();
    notes
        .expect_list_published()
        .returning(move |_, _, _| Ok(vec![published_note(project_id, &long_content)]));

    let data = service(projects, notes)
        .widget("shipnotes", None, None)
        .await
        .expect("widget resolves");
    let summary = &data.recent_updates[0].summary;
    assert_eq!(summary.chars().count(), 123);
    assert!(summary.ends_with("..."));
}

#[rstest]
#[tokio::test]
async fn widget_for_unknown_or_inactive_slug_is_not_found() {
    let mut projects = MockProjectRepository::new();
    projects
        .expect_find_active_by_slug()
        .returning(|_| Ok(None));
    let notes = MockNoteRepository::new();

    let err = service(projects, notes)
        .widget("ghost", None, None)
        .await
        .expect_err("unknown slug fails");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn widget_with_no_recent_updates_reports_none() {
    let active = project("shipnotes", true);

    let mut projects = MockProjectRepository::new();
    projects
        .expect_find_active_by_slug()
        .returning(move |_| Ok(Some(active.clone())));
    let mut notes = MockNoteRepository::new();
    notes
        .expect_list_published()
        .withf(|_, _, limit| *limit == Some(5))
        .returning(|_, _, _| Ok(Vec::new()));

    let data = service(projects, notes)
        .widget("shipnotes", Some(7), Some(5))
        .await
        .expect("widget resolves");
    assert_eq!(data.stats.total_updates, 0);
    assert_eq!(data.stats.period, "7 days");
    assert!(!data.stats.has_new_updates);
}

#[rstest]
#[tokio::test]
async fn changelog_page_lists_all_published_notes() {
    let stored = project("shipnotes", false);
    let project_id = stored.id;

    let mut projects = MockProjectRepository::new();
    projects
        .expect_find_by_slug()
        .withf(|slug| slug == "shipnotes")
        .returning(move |_| Ok(Some(stored.clone())));
    let mut notes = MockNoteRepository::new();
    notes
        .expect_list_published()
        .withf(|_, since, limit| since.is_none() && limit.is_none())
        .returning(move |_, _, _| {
            Ok(vec![
                published_note(project_id, "Second"),
                published_note(project_id, "First"),
            ])
        });

    let page = service(projects, notes)
        .changelog_page("shipnotes")
        .await
        .expect("page resolves");
    assert_eq!(page.notes.len(), 2);
    assert_eq!(page.project.slug, "shipnotes");
}
