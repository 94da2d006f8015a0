//! Unit tests for project lifecycle and repository connection management.

use std::sync::Arc;

use chrono::Utc;
use rstest::rstest;

use super::*;
use crate::domain::ports::{MockCommitSource, MockProjectRepository};
use crate::domain::{ErrorCode, Repository};

fn owned_project(account_id: AccountId, active: bool) -> Project {
    let now = Utc::now();
    Project {
        id: ProjectId::random(),
        account_id,
        name: "My App".to_owned(),
        slug: "my-app".to_owned(),
        repository: "octocat/my-app".parse().expect("valid reference"),
        repository_url: "https://github.com/octocat/my-app".to_owned(),
        description: None,
        active,
        created_at: now,
        updated_at: now,
    }
}

fn repository_meta() -> Repository {
    Repository {
        id: 1,
        name: "my-app".to_owned(),
        full_name: "octocat/my-app".to_owned(),
        description: None,
        html_url: "https://github.com/octocat/my-app".to_owned(),
        default_branch: "main".to_owned(),
        updated_at: Some(Utc::now()),
        private: false,
        owner_login: "octocat".to_owned(),
        owner_avatar_url: None,
    }
}

fn from_new(new: &NewProject) -> Project {
    let now = Utc::now();
    Project {
        id: ProjectId::random(),
        account_id: new.account_id,
        name: new.name.clone(),
        slug: new.slug.clone(),
        repository: new.repository.clone(),
        repository_url: new.repository_url.clone(),
        description: new.description.clone(),
        active: true,
        created_at: now,
        updated_at: now,
    }
}

fn service(projects: MockProjectRepository, source: MockCommitSource) -> ProjectService {
    ProjectService::new(Arc::new(projects), Arc::new(source))
}

#[rstest]
#[tokio::test]
async fn create_derives_slug_and_repository_url() {
    let mut projects = MockProjectRepository::new();
    projects
        .expect_insert()
        .withf(|new| {
            new.slug == "my-app"
                && new.name == "My App"
                && new.repository_url == "https://github.com/octocat/my-app"
        })
        .times(1)
        .returning(|new| Ok(from_new(new)));

    let created = service(projects, MockCommitSource::new())
        .create(
            &AccountId::random(),
            "  My App  ",
            "octocat/my-app".parse().expect("valid reference"),
            None,
        )
        .await
        .expect("create succeeds");
    assert_eq!(created.slug, "my-app");
    assert!(created.active);
}

#[rstest]
#[tokio::test]
async fn create_with_unusable_name_is_rejected() {
    let mut projects = MockProjectRepository::new();
    projects.expect_insert().times(0);

    let err = service(projects, MockCommitSource::new())
        .create(
            &AccountId::random(),
            "!!!",
            "octocat/my-app".parse().expect("valid reference"),
            None,
        )
        .await
        .expect_err("unslugifiable name fails");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn colliding_slug_on_create_is_a_conflict() {
    let mut projects = MockProjectRepository::new();
    projects
        .expect_insert()
        .returning(|_| Err(ProjectRepositoryError::duplicate_slug("my-app")));

    let err = service(projects, MockCommitSource::new())
        .create(
            &AccountId::random(),
            "My App",
            "octocat/my-app".parse().expect("valid reference"),
            None,
        )
        .await
        .expect_err("taken slug fails");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert!(err.message().contains("already exists"));
}

#[rstest]
#[tokio::test]
async fn rename_reslugs_and_reports_conflicts() {
    let owner = AccountId::random();
    let stored = owned_project(owner, true);
    let project_id = stored.id;

    let mut projects = MockProjectRepository::new();
    projects
        .expect_find_for_account()
        .returning(move |_, _| Ok(Some(stored.clone())));
    projects
        .expect_update()
        .withf(|project| project.slug == "new-name")
        .returning(|_| Err(ProjectRepositoryError::duplicate_slug("new-name")));

    let err = service(projects, MockCommitSource::new())
        .update(
            &owner,
            &project_id,
            ProjectUpdate {
                name: Some("New Name".to_owned()),
                description: None,
            },
        )
        .await
        .expect_err("taken slug fails");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert!(err.message().contains("choose a different name"));
}

#[rstest]
#[tokio::test]
async fn change_repository_verifies_access_first() {
    let owner = AccountId::random();
    let stored = owned_project(owner, true);
    let project_id = stored.id;

    let mut projects = MockProjectRepository::new();
    projects
        .expect_find_for_account()
        .returning(move |_, _| Ok(Some(stored.clone())));
    projects
        .expect_update()
        .withf(|project| {
            project.repository.to_string() == "octocat/other"
                && project.repository_url == "https://github.com/octocat/other"
                && project.active
        })
        .times(1)
        .returning(|project| Ok(project.clone()));
    let mut source = MockCommitSource::new();
    source
        .expect_get_repository()
        .withf(|_, repo| repo.to_string() == "octocat/other")
        .times(1)
        .returning(|_, _| Ok(repository_meta()));

    let updated = service(projects, source)
        .change_repository(
            &owner,
            &project_id,
            &AccessToken::new("gho_secret"),
            "octocat/other".parse().expect("valid reference"),
        )
        .await
        .expect("change succeeds");
    assert_eq!(updated.repository.to_string(), "octocat/other");
}

#[rstest]
#[tokio::test]
async fn inaccessible_repository_rejects_the_change() {
    let owner = AccountId::random();
    let stored = owned_project(owner, true);
    let project_id = stored.id;

    let mut projects = MockProjectRepository::new();
    projects
        .expect_find_for_account()
        .returning(move |_, _| Ok(Some(stored.clone())));
    projects.expect_update().times(0);
    let mut source = MockCommitSource::new();
    source
        .expect_get_repository()
        .returning(|_, _| Err(CommitSourceError::reconnect_required("404 from GitHub")));

    let err = service(projects, source)
        .change_repository(
            &owner,
            &project_id,
            &AccessToken::new("gho_secret"),
            "octocat/ghost".parse().expect("valid reference"),
        )
        .await
        .expect_err("inaccessible repository fails");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert!(err.message().contains("Repository not accessible"));
}

#[rstest]
#[tokio::test]
async fn disconnect_soft_disables_without_validation() {
    let owner = AccountId::random();
    let stored = owned_project(owner, true);
    let project_id = stored.id;

    let mut projects = MockProjectRepository::new();
    projects
        .expect_find_for_account()
        .returning(move |_, _| Ok(Some(stored.clone())));
    projects
        .expect_update()
        .withf(|project| !project.active)
        .times(1)
        .returning(|project| Ok(project.clone()));
    let mut source = MockCommitSource::new();
    source.expect_get_repository().times(0);

    let updated = service(projects, source)
        .disconnect_repository(&owner, &project_id)
        .await
        .expect("disconnect succeeds");
    assert!(!updated.active);
}

#[rstest]
#[tokio::test]
async fn reconnect_revalidates_the_stored_repository() {
    let owner = AccountId::random();
    let stored = owned_project(owner, false);
    let project_id = stored.id;

    let mut projects = MockProjectRepository::new();
    projects
        .expect_find_for_account()
        .returning(move |_, _| Ok(Some(stored.clone())));
    projects
        .expect_update()
        .withf(|project| project.active)
        .times(1)
        .returning(|project| Ok(project.clone()));
    let mut source = MockCommitSource::new();
    source
        .expect_get_repository()
        .withf(|_, repo| repo.to_string() == "octocat/my-app")
        .times(1)
        .returning(|_, _| Ok(repository_meta()));

    let updated = service(projects, source)
        .reconnect_repository(&owner, &project_id, &AccessToken::new("gho_secret"))
        .await
        .expect("reconnect succeeds");
    assert!(updated.active);
}

#[rstest]
#[tokio::test]
async fn delete_of_unowned_project_is_not_found() {
    let mut projects = MockProjectRepository::new();
    projects
        .expect_delete_with_notes()
        .returning(|_, _| Ok(false));

    let err = service(projects, MockCommitSource::new())
        .delete(&AccountId::random(), &ProjectId::random())
        .await
        .expect_err("unowned project fails");
    assert_eq!(err.code(), ErrorCode::NotFound);
}
