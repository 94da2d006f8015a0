//! Shared fixtures for backend integration tests.
//!
//! Provides in-memory implementations of the repository ports plus stub
//! GitHub and completion adapters, so full request flows run in-process
//! without PostgreSQL or network access.

use std::sync::{Arc, Mutex};

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::Key;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header;
use actix_web::{App, test, web};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use shipnotes::domain::feedback::window_bucket;
use shipnotes::domain::ports::{
    AccountRepository, AccountRepositoryError, CommitSource, CommitSourceError, CompletionModel,
    CompletionModelError, CompletionRequest, FeedbackInsertOutcome, FeedbackRepository,
    FeedbackRepositoryError, NewFeedbackSubmission, NewNote, NewProject, NoteFilter,
    NoteRepository, NoteRepositoryError, NoteUpdate, ProjectRepository, ProjectRepositoryError,
};
use shipnotes::domain::{
    AccessToken, Account, AccountId, AccountService, ChangelogService, Commit, CommitBrowseService,
    FeedbackService, FeedbackSubmission, LoginProfile, Note, NoteGenerationService, NoteId,
    NoteService, NoteStatus, Project, ProjectId, ProjectService, RepoRef, Repository,
    CREDIT_ALLOWANCE,
};
use shipnotes::inbound::http::state::HttpState;

pub const TEST_BASE_URL: &str = "http://localhost:8080";

/// In-memory account store keyed like the database upsert.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: Mutex<Vec<Account>>,
}

impl InMemoryAccountRepository {
    /// Overwrite the balance of every stored account; tests use a single
    /// login so this targets exactly one row.
    pub fn set_balance(&self, balance: i32) {
        let mut accounts = self.accounts.lock().expect("account lock");
        for account in accounts.iter_mut() {
            account.credit_balance = balance;
        }
    }

    pub fn balance(&self) -> Option<i32> {
        let accounts = self.accounts.lock().expect("account lock");
        accounts.first().map(|account| account.credit_balance)
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_id(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        let accounts = self.accounts.lock().expect("account lock");
        Ok(accounts.iter().find(|a| a.id == *account_id).cloned())
    }

    async fn upsert_login(
        &self,
        profile: &LoginProfile,
    ) -> Result<Account, AccountRepositoryError> {
        let mut accounts = self.accounts.lock().expect("account lock");
        let now = Utc::now();
        if let Some(existing) = accounts
            .iter_mut()
            .find(|a| a.github_user_id == profile.github_user_id)
        {
            existing.github_username = profile.github_username.clone();
            existing.github_avatar_url = profile.github_avatar_url.clone();
            existing.access_token = Some(profile.access_token.clone());
            existing.email = profile.email.clone();
            existing.updated_at = now;
            return Ok(existing.clone());
        }
        let account = Account {
            id: AccountId::random(),
            github_user_id: profile.github_user_id.clone(),
            github_username: profile.github_username.clone(),
            github_avatar_url: profile.github_avatar_url.clone(),
            access_token: Some(profile.access_token.clone()),
            email: profile.email.clone(),
            credit_balance: CREDIT_ALLOWANCE,
            unmetered: false,
            created_at: now,
            updated_at: now,
        };
        accounts.push(account.clone());
        Ok(account)
    }

    async fn debit_credit(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<i32>, AccountRepositoryError> {
        let mut accounts = self.accounts.lock().expect("account lock");
        let Some(account) = accounts.iter_mut().find(|a| a.id == *account_id) else {
            return Ok(None);
        };
        if account.credit_balance > 0 {
            account.credit_balance -= 1;
        }
        Ok(Some(account.credit_balance))
    }

    async fn reset_credits(
        &self,
        account_id: &AccountId,
        ceiling: i32,
    ) -> Result<bool, AccountRepositoryError> {
        let mut accounts = self.accounts.lock().expect("account lock");
        match accounts.iter_mut().find(|a| a.id == *account_id) {
            Some(account) => {
                account.credit_balance = ceiling;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// In-memory project store enforcing the database uniqueness constraints.
///
/// Holds the shared note store so project deletion cascades exactly like
/// the transactional database adapter.
pub struct InMemoryProjectRepository {
    projects: Mutex<Vec<Project>>,
    notes: Arc<InMemoryNoteRepository>,
}

impl InMemoryProjectRepository {
    pub fn new(notes: Arc<InMemoryNoteRepository>) -> Self {
        Self {
            projects: Mutex::new(Vec::new()),
            notes,
        }
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn insert(&self, project: &NewProject) -> Result<Project, ProjectRepositoryError> {
        let mut projects = self.projects.lock().expect("project lock");
        if projects.iter().any(|p| p.slug == project.slug) {
            return Err(ProjectRepositoryError::duplicate_slug(project.slug.clone()));
        }
        if projects
            .iter()
            .any(|p| p.account_id == project.account_id && p.repository == project.repository)
        {
            return Err(ProjectRepositoryError::duplicate_repository(
                project.repository.to_string(),
            ));
        }
        let now = Utc::now();
        let created = Project {
            id: ProjectId::random(),
            account_id: project.account_id,
            name: project.name.clone(),
            slug: project.slug.clone(),
            repository: project.repository.clone(),
            repository_url: project.repository_url.clone(),
            description: project.description.clone(),
            active: true,
            created_at: now,
            updated_at: now,
        };
        projects.push(created.clone());
        Ok(created)
    }

    async fn find_for_account(
        &self,
        project_id: &ProjectId,
        account_id: &AccountId,
    ) -> Result<Option<Project>, ProjectRepositoryError> {
        let projects = self.projects.lock().expect("project lock");
        Ok(projects
            .iter()
            .find(|p| p.id == *project_id && p.account_id == *account_id)
            .cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Project>, ProjectRepositoryError> {
        let projects = self.projects.lock().expect("project lock");
        Ok(projects.iter().find(|p| p.slug == slug).cloned())
    }

    async fn find_active_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Project>, ProjectRepositoryError> {
        let projects = self.projects.lock().expect("project lock");
        Ok(projects.iter().find(|p| p.slug == slug && p.active).cloned())
    }

    async fn list_for_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<Project>, ProjectRepositoryError> {
        let projects = self.projects.lock().expect("project lock");
        let mut owned: Vec<Project> = projects
            .iter()
            .filter(|p| p.account_id == *account_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(owned)
    }

    async fn update(&self, project: &Project) -> Result<Project, ProjectRepositoryError> {
        let mut projects = self.projects.lock().expect("project lock");
        if projects
            .iter()
            .any(|p| p.id != project.id && p.slug == project.slug)
        {
            return Err(ProjectRepositoryError::duplicate_slug(project.slug.clone()));
        }
        let stored = projects
            .iter_mut()
            .find(|p| p.id == project.id && p.account_id == project.account_id)
            .ok_or_else(|| ProjectRepositoryError::query("project vanished during update"))?;
        *stored = Project {
            updated_at: Utc::now(),
            ..project.clone()
        };
        Ok(stored.clone())
    }

    async fn delete_with_notes(
        &self,
        project_id: &ProjectId,
        account_id: &AccountId,
    ) -> Result<bool, ProjectRepositoryError> {
        let mut projects = self.projects.lock().expect("project lock");
        let before = projects.len();
        projects.retain(|p| !(p.id == *project_id && p.account_id == *account_id));
        if projects.len() == before {
            return Ok(false);
        }
        let mut notes = self.notes.notes.lock().expect("note lock");
        notes.retain(|n| n.project_id != *project_id);
        Ok(true)
    }
}

/// In-memory note store mirroring the published-only view counting.
#[derive(Default)]
pub struct InMemoryNoteRepository {
    notes: Mutex<Vec<Note>>,
}

impl InMemoryNoteRepository {
    pub fn view_count(&self, note_id: &NoteId) -> Option<i32> {
        let notes = self.notes.lock().expect("note lock");
        notes.iter().find(|n| n.id == *note_id).map(|n| n.view_count)
    }
}

#[async_trait]
impl NoteRepository for InMemoryNoteRepository {
    async fn insert(&self, note: &NewNote) -> Result<Note, NoteRepositoryError> {
        let mut notes = self.notes.lock().expect("note lock");
        let now = Utc::now();
        let created = Note {
            id: NoteId::random(),
            account_id: note.account_id,
            project_id: note.project_id,
            title: note.title.clone(),
            content: note.content.clone(),
            version: note.version.clone(),
            status: NoteStatus::Draft,
            published_at: None,
            commits: note.commits.clone(),
            view_count: 0,
            created_at: now,
            updated_at: now,
        };
        notes.push(created.clone());
        Ok(created)
    }

    async fn find_for_account(
        &self,
        note_id: &NoteId,
        account_id: &AccountId,
    ) -> Result<Option<Note>, NoteRepositoryError> {
        let notes = self.notes.lock().expect("note lock");
        Ok(notes
            .iter()
            .find(|n| n.id == *note_id && n.account_id == *account_id)
            .cloned())
    }

    async fn list_for_account(
        &self,
        account_id: &AccountId,
        filter: NoteFilter,
    ) -> Result<Vec<Note>, NoteRepositoryError> {
        let notes = self.notes.lock().expect("note lock");
        let mut owned: Vec<Note> = notes
            .iter()
            .filter(|n| n.account_id == *account_id)
            .filter(|n| filter.project_id.is_none_or(|id| n.project_id == id))
            .filter(|n| filter.status.is_none_or(|status| n.status == status))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn update(
        &self,
        note_id: &NoteId,
        account_id: &AccountId,
        update: &NoteUpdate,
    ) -> Result<Option<Note>, NoteRepositoryError> {
        let mut notes = self.notes.lock().expect("note lock");
        let Some(note) = notes
            .iter_mut()
            .find(|n| n.id == *note_id && n.account_id == *account_id)
        else {
            return Ok(None);
        };
        note.title = update.title.clone();
        note.content = update.content.clone();
        note.status = update.status;
        if update.published_at.is_some() {
            note.published_at = update.published_at;
        }
        note.updated_at = Utc::now();
        Ok(Some(note.clone()))
    }

    async fn delete_for_account(
        &self,
        note_id: &NoteId,
        account_id: &AccountId,
    ) -> Result<bool, NoteRepositoryError> {
        let mut notes = self.notes.lock().expect("note lock");
        let before = notes.len();
        notes.retain(|n| !(n.id == *note_id && n.account_id == *account_id));
        Ok(notes.len() < before)
    }

    async fn record_view(&self, note_id: &NoteId) -> Result<bool, NoteRepositoryError> {
        let mut notes = self.notes.lock().expect("note lock");
        match notes
            .iter_mut()
            .find(|n| n.id == *note_id && n.status == NoteStatus::Published)
        {
            Some(note) => {
                note.view_count += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_published(
        &self,
        project_id: &ProjectId,
        since: Option<DateTime<Utc>>,
        limit: Option<i64>,
    ) -> Result<Vec<Note>, NoteRepositoryError> {
        let notes = self.notes.lock().expect("note lock");
        let mut published: Vec<Note> = notes
            .iter()
            .filter(|n| n.project_id == *project_id && n.status == NoteStatus::Published)
            .filter(|n| n.published_at.is_some())
            .filter(|n| match since {
                Some(since) => n.published_at.is_some_and(|at| at >= since),
                None => true,
            })
            .cloned()
            .collect();
        published.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        if let Some(limit) = limit {
            published.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        Ok(published)
    }
}

/// In-memory feedback store with the same window-bucket cooldown key as
/// the database.
#[derive(Default)]
pub struct InMemoryFeedbackRepository {
    submissions: Mutex<Vec<(i64, FeedbackSubmission)>>,
}

impl InMemoryFeedbackRepository {
    /// Age every stored submission, as if the cooldown had elapsed.
    pub fn backdate_all(&self, by: Duration) {
        let mut submissions = self.submissions.lock().expect("feedback lock");
        for (bucket, submission) in submissions.iter_mut() {
            submission.created_at -= by;
            *bucket = window_bucket(submission.created_at);
        }
    }
}

#[async_trait]
impl FeedbackRepository for InMemoryFeedbackRepository {
    async fn has_submission_since(
        &self,
        account_id: &AccountId,
        since: DateTime<Utc>,
    ) -> Result<bool, FeedbackRepositoryError> {
        let submissions = self.submissions.lock().expect("feedback lock");
        Ok(submissions
            .iter()
            .any(|(_, s)| s.account_id == *account_id && s.created_at >= since))
    }

    async fn insert_in_window(
        &self,
        submission: &NewFeedbackSubmission,
    ) -> Result<FeedbackInsertOutcome, FeedbackRepositoryError> {
        let mut submissions = self.submissions.lock().expect("feedback lock");
        let now = Utc::now();
        let bucket = window_bucket(now);
        if submissions
            .iter()
            .any(|(b, s)| s.account_id == submission.account_id && *b == bucket)
        {
            return Ok(FeedbackInsertOutcome::DuplicateWindow);
        }
        let stored = FeedbackSubmission {
            id: Uuid::new_v4(),
            account_id: submission.account_id,
            account_email: submission.account_email.clone(),
            desired_feature: submission.desired_feature.clone(),
            barrier: submission.barrier.clone(),
            current_method: submission.current_method.clone(),
            credits_before_reset: submission.credits_before_reset,
            credits_after_reset: submission.credits_after_reset,
            ip_address: submission.ip_address.clone(),
            user_agent: submission.user_agent.clone(),
            created_at: now,
        };
        submissions.push((bucket, stored.clone()));
        Ok(FeedbackInsertOutcome::Inserted(stored))
    }

    async fn list_recent(
        &self,
        account_id: &AccountId,
        limit: i64,
    ) -> Result<Vec<FeedbackSubmission>, FeedbackRepositoryError> {
        let submissions = self.submissions.lock().expect("feedback lock");
        let mut owned: Vec<FeedbackSubmission> = submissions
            .iter()
            .filter(|(_, s)| s.account_id == *account_id)
            .map(|(_, s)| s.clone())
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        owned.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(owned)
    }
}

/// Commit source stub serving one fixed repository and commit page.
pub struct StubCommitSource;

fn stub_repository(repository: &RepoRef) -> Repository {
    Repository {
        id: 1,
        name: repository.name().to_owned(),
        full_name: repository.to_string(),
        description: Some("test repository".to_owned()),
        html_url: format!("https://github.com/{repository}"),
        default_branch: "main".to_owned(),
        updated_at: Some(Utc::now()),
        private: false,
        owner_login: repository.owner().to_owned(),
        owner_avatar_url: None,
    }
}

#[async_trait]
impl CommitSource for StubCommitSource {
    async fn list_repositories(
        &self,
        _token: &AccessToken,
    ) -> Result<Vec<Repository>, CommitSourceError> {
        let repo: RepoRef = "octocat/shipnotes".parse().map_err(|_| {
            CommitSourceError::decode("stub repository reference is malformed")
        })?;
        Ok(vec![stub_repository(&repo)])
    }

    async fn list_commits(
        &self,
        _token: &AccessToken,
        _repository: &RepoRef,
        _since: Option<DateTime<Utc>>,
    ) -> Result<Vec<Commit>, CommitSourceError> {
        Ok(vec![Commit {
            sha: "abc1234def5678".to_owned(),
            message: "fix: trim input".to_owned(),
            author_name: "Octo Cat".to_owned(),
            author_email: Some("octo@example.com".to_owned()),
            authored_at: Utc::now(),
            html_url: None,
            additions: Some(12),
            deletions: Some(3),
        }])
    }

    async fn get_repository(
        &self,
        _token: &AccessToken,
        repository: &RepoRef,
    ) -> Result<Repository, CommitSourceError> {
        Ok(stub_repository(repository))
    }
}

/// Completion model stub echoing a fixed markdown document.
pub struct StubCompletionModel;

#[async_trait]
impl CompletionModel for StubCompletionModel {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, CompletionModelError> {
        Ok(
            "# Release Notes - Latest Updates\n\n## New Features\n- Trimmed input handling\n"
                .to_owned(),
        )
    }
}

/// Handles onto the shared in-memory stores for direct test manipulation.
pub struct TestHandles {
    pub accounts: Arc<InMemoryAccountRepository>,
    pub notes: Arc<InMemoryNoteRepository>,
    pub feedback: Arc<InMemoryFeedbackRepository>,
}

/// Build the HTTP state over fresh in-memory adapters.
pub fn test_state() -> (web::Data<HttpState>, TestHandles) {
    let accounts = Arc::new(InMemoryAccountRepository::default());
    let notes = Arc::new(InMemoryNoteRepository::default());
    let projects = Arc::new(InMemoryProjectRepository::new(notes.clone()));
    let feedback = Arc::new(InMemoryFeedbackRepository::default());
    let source = Arc::new(StubCommitSource);
    let model = Arc::new(StubCompletionModel);

    let state = HttpState {
        accounts: AccountService::new(accounts.clone()),
        browse: CommitBrowseService::new(accounts.clone(), source.clone()),
        changelog: ChangelogService::new(
            projects.clone(),
            notes.clone(),
            TEST_BASE_URL.to_owned(),
        ),
        feedback: FeedbackService::new(accounts.clone(), feedback.clone()),
        generation: NoteGenerationService::new(
            accounts.clone(),
            projects.clone(),
            notes.clone(),
            model,
        ),
        notes: NoteService::new(notes.clone()),
        projects: ProjectService::new(projects, source),
    };

    (
        web::Data::new(state),
        TestHandles {
            accounts,
            notes,
            feedback,
        },
    )
}

/// Spin up an in-process app mirroring the production route layout.
pub async fn spawn_app(
    state: web::Data<HttpState>,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    use shipnotes::inbound::http::{
        auth, changelog, credits, feedback as feedback_routes, generate, github, patch_notes,
        projects as project_routes, widget,
    };

    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();

    test::init_service(
        App::new()
            .app_data(state)
            // Outside the `/api` scope and before it: the scope would
            // otherwise capture the `/api` prefix and 404 these public
            // routes before they are tried.
            .service(widget::widget)
            .service(widget::widget_preflight)
            .service(
                web::scope("/api")
                    .wrap(session)
                    .service(auth::start_session)
                    .service(auth::current_session)
                    .service(auth::end_session)
                    .service(github::list_repositories)
                    .service(github::list_commits)
                    .service(generate::generate)
                    .service(patch_notes::list_notes)
                    .service(patch_notes::get_note)
                    .service(patch_notes::update_note)
                    .service(patch_notes::delete_note)
                    .service(patch_notes::record_view)
                    .service(project_routes::create_project)
                    .service(project_routes::list_projects)
                    .service(project_routes::get_project)
                    .service(project_routes::edit_project)
                    .service(project_routes::delete_project)
                    .service(project_routes::change_repository)
                    .service(project_routes::reconnect_repository)
                    .service(project_routes::disconnect_repository)
                    .service(credits::get_credits)
                    .service(feedback_routes::submit_feedback)
                    .service(feedback_routes::list_feedback),
            )
            .service(changelog::changelog_page),
    )
    .await
}

/// Log in with a fixed GitHub profile and return the session cookie pair.
pub async fn login<S, B>(app: &S) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/auth/session")
            .set_json(serde_json::json!({
                "githubUserId": "42",
                "username": "octocat",
                "accessToken": "gho_testtoken",
                "email": "octo@example.com"
            }))
            .to_request(),
    )
    .await;
    assert!(response.status().is_success(), "login failed");
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::to_owned)
        .expect("session cookie issued")
}

/// Attach the session cookie to a test request builder.
pub fn with_session(request: test::TestRequest, cookie: &str) -> test::TestRequest {
    request.insert_header((header::COOKIE, cookie.to_owned()))
}
