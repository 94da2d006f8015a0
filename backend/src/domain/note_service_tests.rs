//! Unit tests for owner-facing note edits, publishing, and deletion.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ports::MockNoteRepository;
use crate::domain::{ErrorCode, ProjectId};

fn note(status: NoteStatus, published_at: Option<chrono::DateTime<Utc>>) -> Note {
    let now = Utc::now();
    Note {
        id: NoteId::random(),
        account_id: AccountId::random(),
        project_id: ProjectId::random(),
        title: "Latest Updates".to_owned(),
        content: "## Improvements".to_owned(),
        version: None,
        status,
        published_at,
        commits: vec!["abc1234".to_owned()],
        view_count: 0,
        created_at: now,
        updated_at: now,
    }
}

fn request(status: Option<NoteStatus>) -> UpdateNoteRequest {
    UpdateNoteRequest {
        title: "Latest Updates".to_owned(),
        content: "## Improvements\n- snappier".to_owned(),
        status,
    }
}

#[rstest]
#[case("", "content")]
#[case("title", "")]
#[case("   ", "content")]
#[tokio::test]
async fn blank_title_or_content_is_rejected(#[case] title: &str, #[case] content: &str) {
    let mut notes = MockNoteRepository::new();
    notes.expect_find_for_account().times(0);

    let service = NoteService::new(Arc::new(notes));
    let err = service
        .update(
            &AccountId::random(),
            &NoteId::random(),
            UpdateNoteRequest {
                title: title.to_owned(),
                content: content.to_owned(),
                status: None,
            },
        )
        .await
        .expect_err("blank fields fail");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn first_publish_stamps_published_at() {
    let stored = note(NoteStatus::Draft, None);
    let stored_id = stored.id;
    let owner = stored.account_id;

    let mut notes = MockNoteRepository::new();
    notes
        .expect_find_for_account()
        .returning(move |_, _| Ok(Some(stored.clone())));
    notes
        .expect_update()
        .withf(|_, _, update| {
            update.status == NoteStatus::Published && update.published_at.is_some()
        })
        .times(1)
        .returning(move |_, _, update| {
            let mut updated = note(update.status, update.published_at);
            updated.id = stored_id;
            Ok(Some(updated))
        });

    let service = NoteService::new(Arc::new(notes));
    let updated = service
        .update(&owner, &stored_id, request(Some(NoteStatus::Published)))
        .await
        .expect("publish succeeds");
    assert_eq!(updated.status, NoteStatus::Published);
    assert!(updated.published_at.is_some());
}

#[rstest]
#[tokio::test]
async fn republishing_preserves_original_stamp() {
    let first_publish = Utc::now() - chrono::Duration::hours(3);
    let stored = note(NoteStatus::Published, Some(first_publish));
    let stored_id = stored.id;
    let owner = stored.account_id;

    let mut notes = MockNoteRepository::new();
    notes
        .expect_find_for_account()
        .returning(move |_, _| Ok(Some(stored.clone())));
    notes
        .expect_update()
        .withf(move |_, _, update| update.published_at == Some(first_publish))
        .times(1)
        .returning(move |_, _, update| Ok(Some(note(update.status, update.published_at))));

    let service = NoteService::new(Arc::new(notes));
    service
        .update(&owner, &stored_id, request(Some(NoteStatus::Published)))
        .await
        .expect("republish succeeds");
}

#[rstest]
#[tokio::test]
async fn plain_save_keeps_status_and_stamp() {
    let stored = note(NoteStatus::Draft, None);
    let stored_id = stored.id;
    let owner = stored.account_id;

    let mut notes = MockNoteRepository::new();
    notes
        .expect_find_for_account()
        .returning(move |_, _| Ok(Some(stored.clone())));
    notes
        .expect_update()
        .withf(|_, _, update| {
            update.status == NoteStatus::Draft && update.published_at.is_none()
        })
        .times(1)
        .returning(move |_, _, update| Ok(Some(note(update.status, update.published_at))));

    let service = NoteService::new(Arc::new(notes));
    service
        .update(&owner, &stored_id, request(None))
        .await
        .expect("save succeeds");
}

#[rstest]
#[tokio::test]
async fn updating_someone_elses_note_is_not_found() {
    let mut notes = MockNoteRepository::new();
    notes.expect_find_for_account().returning(|_, _| Ok(None));
    notes.expect_update().times(0);

    let service = NoteService::new(Arc::new(notes));
    let err = service
        .update(&AccountId::random(), &NoteId::random(), request(None))
        .await
        .expect_err("foreign note fails");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn delete_of_missing_note_is_not_found() {
    let mut notes = MockNoteRepository::new();
    notes
        .expect_delete_for_account()
        .returning(|_, _| Ok(false));

    let service = NoteService::new(Arc::new(notes));
    let err = service
        .delete(&AccountId::random(), &NoteId::random())
        .await
        .expect_err("missing note fails");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn list_passes_filter_through() {
    let owner = AccountId::random();
    let project = ProjectId::random();

    let mut notes = MockNoteRepository::new();
    notes
        .expect_list_for_account()
        .withf(move |aid, filter| {
            *aid == owner
                && filter.project_id == Some(project)
                && filter.status == Some(NoteStatus::Published)
        })
        .times(1)
        .returning(|_, _| Ok(Vec::new()));

    let service = NoteService::new(Arc::new(notes));
    let listed = service
        .list(
            &owner,
            NoteFilter {
                project_id: Some(project),
                status: Some(NoteStatus::Published),
            },
        )
        .await
        .expect("list succeeds");
    assert!(listed.is_empty());
}
