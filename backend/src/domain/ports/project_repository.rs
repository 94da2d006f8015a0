//! Port for project persistence and slug lookups.

use async_trait::async_trait;

use crate::domain::{AccountId, Project, ProjectId, RepoRef};

/// Errors raised by project repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectRepositoryError {
    /// Repository connection could not be established.
    #[error("project repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("project repository query failed: {message}")]
    Query { message: String },
    /// The slug is already taken by another project.
    #[error("project slug '{slug}' is already taken")]
    DuplicateSlug { slug: String },
    /// The account already tracks this repository.
    #[error("repository '{repository}' is already tracked by this account")]
    DuplicateRepository { repository: String },
}

impl ProjectRepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a duplicate-slug error for the given slug.
    pub fn duplicate_slug(slug: impl Into<String>) -> Self {
        Self::DuplicateSlug { slug: slug.into() }
    }

    /// Create a duplicate-repository error for the given reference.
    pub fn duplicate_repository(repository: impl Into<String>) -> Self {
        Self::DuplicateRepository {
            repository: repository.into(),
        }
    }
}

/// Fields for creating a project; ids and timestamps are assigned on insert.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub account_id: AccountId,
    pub name: String,
    pub slug: String,
    pub repository: RepoRef,
    pub repository_url: String,
    pub description: Option<String>,
}

/// Port for writing and reading projects.
///
/// Uniqueness of `slug` and `(account, repository)` is enforced by the
/// adapter atomically on insert/update; callers get the distinguished
/// duplicate variants rather than racing a pre-check.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Insert a new project.
    async fn insert(&self, project: &NewProject) -> Result<Project, ProjectRepositoryError>;

    /// Find a project owned by the given account.
    async fn find_for_account(
        &self,
        project_id: &ProjectId,
        account_id: &AccountId,
    ) -> Result<Option<Project>, ProjectRepositoryError>;

    /// Find a project by public slug regardless of active state.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Project>, ProjectRepositoryError>;

    /// Find an active project by public slug.
    async fn find_active_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Project>, ProjectRepositoryError>;

    /// List an account's projects, most recently updated first.
    async fn list_for_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<Project>, ProjectRepositoryError>;

    /// Persist changed fields of an existing project.
    async fn update(&self, project: &Project) -> Result<Project, ProjectRepositoryError>;

    /// Delete a project and all of its notes; returns `false` when the
    /// project does not exist for this account.
    async fn delete_with_notes(
        &self,
        project_id: &ProjectId,
        account_id: &AccountId,
    ) -> Result<bool, ProjectRepositoryError>;
}

/// Fixture implementation for tests that do not exercise projects.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProjectRepository;

#[async_trait]
impl ProjectRepository for FixtureProjectRepository {
    async fn insert(&self, project: &NewProject) -> Result<Project, ProjectRepositoryError> {
        let now = chrono::Utc::now();
        Ok(Project {
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
        })
    }

    async fn find_for_account(
        &self,
        _project_id: &ProjectId,
        _account_id: &AccountId,
    ) -> Result<Option<Project>, ProjectRepositoryError> {
        Ok(None)
    }

    async fn find_by_slug(&self, _slug: &str) -> Result<Option<Project>, ProjectRepositoryError> {
        Ok(None)
    }

    async fn find_active_by_slug(
        &self,
        _slug: &str,
    ) -> Result<Option<Project>, ProjectRepositoryError> {
        Ok(None)
    }

    async fn list_for_account(
        &self,
        _account_id: &AccountId,
    ) -> Result<Vec<Project>, ProjectRepositoryError> {
        Ok(Vec::new())
    }

    async fn update(&self, project: &Project) -> Result<Project, ProjectRepositoryError> {
        Ok(project.clone())
    }

    async fn delete_with_notes(
        &self,
        _project_id: &ProjectId,
        _account_id: &AccountId,
    ) -> Result<bool, ProjectRepositoryError> {
        Ok(false)
    }
}
