//! Project lifecycle: creation with slug allocation, repository
//! connection management, and cascade deletion.

use std::sync::Arc;

use crate::domain::ports::{
    CommitSource, CommitSourceError, NewProject, ProjectRepository, ProjectRepositoryError,
};
use crate::domain::slug::slugify;
use crate::domain::{AccessToken, AccountId, Error, Project, ProjectId, RepoRef};

const SLUG_TAKEN_ON_CREATE: &str = "A project with this name already exists";
const SLUG_TAKEN_ON_RENAME: &str =
    "Project name already taken. Please choose a different name.";
const REPO_NOT_ACCESSIBLE: &str =
    "Repository not accessible. Please check permissions or repository name.";

pub(crate) fn map_project_repository_error(error: ProjectRepositoryError) -> Error {
    match error {
        ProjectRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("project store unavailable: {message}"))
        }
        ProjectRepositoryError::Query { message } => {
            Error::internal(format!("project store error: {message}"))
        }
        ProjectRepositoryError::DuplicateSlug { .. } => Error::conflict(SLUG_TAKEN_ON_CREATE),
        ProjectRepositoryError::DuplicateRepository { repository } => Error::conflict(format!(
            "Repository {repository} is already connected to another project"
        )),
    }
}

fn repository_url(repository: &RepoRef) -> String {
    format!("https://github.com/{repository}")
}

/// Fields a caller may change on an existing project.
///
/// `description: Some(None)` clears the stored description.
#[derive(Debug, Clone, Default)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

/// Manages projects and the repository link each one carries.
#[derive(Clone)]
pub struct ProjectService {
    projects: Arc<dyn ProjectRepository>,
    source: Arc<dyn CommitSource>,
}

impl ProjectService {
    pub fn new(projects: Arc<dyn ProjectRepository>, source: Arc<dyn CommitSource>) -> Self {
        Self { projects, source }
    }

    /// Create a project, deriving its public slug from the name.
    ///
    /// Slugs are globally unique; two names that normalise to the same
    /// slug collide even across accounts.
    pub async fn create(
        &self,
        account_id: &AccountId,
        name: &str,
        repository: RepoRef,
        description: Option<String>,
    ) -> Result<Project, Error> {
        let name = name.trim();
        let slug =
            slugify(name).ok_or_else(|| Error::invalid_request("Project name is required"))?;

        self.projects
            .insert(&NewProject {
                account_id: *account_id,
                name: name.to_owned(),
                slug,
                repository_url: repository_url(&repository),
                repository,
                description,
            })
            .await
            .map_err(map_project_repository_error)
    }

    pub async fn get(
        &self,
        account_id: &AccountId,
        project_id: &ProjectId,
    ) -> Result<Project, Error> {
        self.projects
            .find_for_account(project_id, account_id)
            .await
            .map_err(map_project_repository_error)?
            .ok_or_else(|| Error::not_found("Project not found"))
    }

    pub async fn list(&self, account_id: &AccountId) -> Result<Vec<Project>, Error> {
        self.projects
            .list_for_account(account_id)
            .await
            .map_err(map_project_repository_error)
    }

    /// Rename a project and, when the name changes, re-derive its slug.
    pub async fn update(
        &self,
        account_id: &AccountId,
        project_id: &ProjectId,
        update: ProjectUpdate,
    ) -> Result<Project, Error> {
        let mut project = self.get(account_id, project_id).await?;

        if let Some(name) = update.name {
            let name = name.trim().to_owned();
            let slug = slugify(&name)
                .ok_or_else(|| Error::invalid_request("Project name is required"))?;
            project.name = name;
            project.slug = slug;
        }
        if let Some(description) = update.description {
            project.description = description;
        }

        self.projects.update(&project).await.map_err(|error| {
            if matches!(error, ProjectRepositoryError::DuplicateSlug { .. }) {
                Error::conflict(SLUG_TAKEN_ON_RENAME)
            } else {
                map_project_repository_error(error)
            }
        })
    }

    /// Point the project at a different repository after checking the
    /// token can actually reach it.
    pub async fn change_repository(
        &self,
        account_id: &AccountId,
        project_id: &ProjectId,
        token: &AccessToken,
        repository: RepoRef,
    ) -> Result<Project, Error> {
        let mut project = self.get(account_id, project_id).await?;
        self.verify_access(token, &repository).await?;

        project.repository_url = repository_url(&repository);
        project.repository = repository;
        project.active = true;
        self.projects
            .update(&project)
            .await
            .map_err(map_project_repository_error)
    }

    /// Pause syncing without forgetting which repository was connected.
    pub async fn disconnect_repository(
        &self,
        account_id: &AccountId,
        project_id: &ProjectId,
    ) -> Result<Project, Error> {
        let mut project = self.get(account_id, project_id).await?;
        project.active = false;
        self.projects
            .update(&project)
            .await
            .map_err(map_project_repository_error)
    }

    /// Resume syncing, re-verifying the stored repository first.
    pub async fn reconnect_repository(
        &self,
        account_id: &AccountId,
        project_id: &ProjectId,
        token: &AccessToken,
    ) -> Result<Project, Error> {
        let mut project = self.get(account_id, project_id).await?;
        let repository = project.repository.clone();
        self.verify_access(token, &repository).await?;

        project.active = true;
        self.projects
            .update(&project)
            .await
            .map_err(map_project_repository_error)
    }

    /// Delete a project and every note under it.
    pub async fn delete(
        &self,
        account_id: &AccountId,
        project_id: &ProjectId,
    ) -> Result<(), Error> {
        let deleted = self
            .projects
            .delete_with_notes(project_id, account_id)
            .await
            .map_err(map_project_repository_error)?;
        if deleted {
            Ok(())
        } else {
            Err(Error::not_found("Project not found"))
        }
    }

    async fn verify_access(&self, token: &AccessToken, repository: &RepoRef) -> Result<(), Error> {
        self.source
            .get_repository(token, repository)
            .await
            .map(|_| ())
            .map_err(|error| match error {
                CommitSourceError::ReconnectRequired { .. } => {
                    Error::invalid_request(REPO_NOT_ACCESSIBLE)
                }
                CommitSourceError::RateLimited { .. } => {
                    Error::rate_limited("GitHub rate limit exceeded. Please try again later.")
                }
                CommitSourceError::Timeout { .. } | CommitSourceError::Transport { .. } => {
                    Error::service_unavailable("GitHub is unreachable. Please try again.")
                }
                CommitSourceError::Decode { message } => {
                    Error::internal(format!("unexpected GitHub response: {message}"))
                }
            })
    }
}

#[cfg(test)]
#[path = "project_service_tests.rs"]
mod tests;
