//! PostgreSQL-backed `ProjectRepository` implementation using Diesel ORM.
//!
//! Slug and per-account repository uniqueness live in database constraints;
//! unique violations are translated into the port's distinguished duplicate
//! variants so the service layer never pre-checks and races.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncConnection, RunQueryDsl, scoped_futures::ScopedFutureExt};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{NewProject, ProjectRepository, ProjectRepositoryError};
use crate::domain::{AccountId, Project, ProjectId, RepoRef};

use super::models::{NewProjectRow, ProjectRow, ProjectUpdateRow};
use super::pool::{DbPool, PoolError};
use super::schema::{patch_notes, projects};

const SLUG_CONSTRAINT: &str = "projects_slug_key";
const REPOSITORY_CONSTRAINT: &str = "projects_account_id_repository_key";

/// Diesel-backed implementation of the `ProjectRepository` port.
#[derive(Clone)]
pub struct DieselProjectRepository {
    pool: DbPool,
}

impl DieselProjectRepository {
    /// Create a new repository over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ProjectRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ProjectRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors, turning constraint violations into duplicate variants.
fn map_write_error(error: diesel::result::Error, row: &NewProjectRow<'_>) -> ProjectRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = &error {
        match info.constraint_name() {
            Some(SLUG_CONSTRAINT) => {
                return ProjectRepositoryError::duplicate_slug(row.slug);
            }
            Some(REPOSITORY_CONSTRAINT) => {
                return ProjectRepositoryError::duplicate_repository(row.repository);
            }
            _ => {}
        }
    }
    map_diesel_error(error)
}

fn map_diesel_error(error: diesel::result::Error) -> ProjectRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "project query failed");
        }
        other => debug!(error = %other, "project query failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ProjectRepositoryError::connection("database connection error")
        }
        _ => ProjectRepositoryError::query("database error"),
    }
}

fn row_to_project(row: ProjectRow) -> Result<Project, ProjectRepositoryError> {
    let repository = RepoRef::from_str(&row.repository).map_err(|_| {
        ProjectRepositoryError::query(format!(
            "stored repository reference '{}' is malformed",
            row.repository
        ))
    })?;
    Ok(Project {
        id: ProjectId::from_uuid(row.id),
        account_id: AccountId::from_uuid(row.account_id),
        name: row.name,
        slug: row.slug,
        repository,
        repository_url: row.repository_url,
        description: row.description,
        active: row.active,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl ProjectRepository for DieselProjectRepository {
    async fn insert(&self, project: &NewProject) -> Result<Project, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let repository = project.repository.to_string();
        let new_row = NewProjectRow {
            id: Uuid::new_v4(),
            account_id: *project.account_id.as_uuid(),
            name: &project.name,
            slug: &project.slug,
            repository: &repository,
            repository_url: &project.repository_url,
            description: project.description.as_deref(),
        };

        let row: ProjectRow = diesel::insert_into(projects::table)
            .values(&new_row)
            .returning(ProjectRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_write_error(err, &new_row))?;

        row_to_project(row)
    }

    async fn find_for_account(
        &self,
        project_id: &ProjectId,
        account_id: &AccountId,
    ) -> Result<Option<Project>, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ProjectRow> = projects::table
            .filter(projects::id.eq(project_id.as_uuid()))
            .filter(projects::account_id.eq(account_id.as_uuid()))
            .select(ProjectRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_project).transpose()
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Project>, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ProjectRow> = projects::table
            .filter(projects::slug.eq(slug))
            .select(ProjectRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_project).transpose()
    }

    async fn find_active_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Project>, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ProjectRow> = projects::table
            .filter(projects::slug.eq(slug))
            .filter(projects::active.eq(true))
            .select(ProjectRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_project).transpose()
    }

    async fn list_for_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<Project>, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ProjectRow> = projects::table
            .filter(projects::account_id.eq(account_id.as_uuid()))
            .order(projects::updated_at.desc())
            .select(ProjectRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_project).collect()
    }

    async fn update(&self, project: &Project) -> Result<Project, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let repository = project.repository.to_string();
        let changes = ProjectUpdateRow {
            name: &project.name,
            slug: &project.slug,
            repository: &repository,
            repository_url: &project.repository_url,
            description: project.description.as_deref(),
            active: project.active,
            updated_at: chrono::Utc::now(),
        };

        let row: ProjectRow = diesel::update(
            projects::table
                .filter(projects::id.eq(project.id.as_uuid()))
                .filter(projects::account_id.eq(project.account_id.as_uuid())),
        )
        .set(&changes)
        .returning(ProjectRow::as_returning())
        .get_result(&mut conn)
        .await
        .map_err(|err| {
            use diesel::result::{DatabaseErrorKind, Error as DieselError};
            if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = &err {
                match info.constraint_name() {
                    Some(SLUG_CONSTRAINT) => {
                        return ProjectRepositoryError::duplicate_slug(project.slug.clone());
                    }
                    Some(REPOSITORY_CONSTRAINT) => {
                        return ProjectRepositoryError::duplicate_repository(repository.clone());
                    }
                    _ => {}
                }
            }
            map_diesel_error(err)
        })?;

        row_to_project(row)
    }

    async fn delete_with_notes(
        &self,
        project_id: &ProjectId,
        account_id: &AccountId,
    ) -> Result<bool, ProjectRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let project_uuid = *project_id.as_uuid();
        let account_uuid = *account_id.as_uuid();

        // Notes and the project go together or not at all.
        let deleted = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    diesel::delete(
                        patch_notes::table
                            .filter(patch_notes::project_id.eq(project_uuid))
                            .filter(patch_notes::account_id.eq(account_uuid)),
                    )
                    .execute(conn)
                    .await?;

                    let affected = diesel::delete(
                        projects::table
                            .filter(projects::id.eq(project_uuid))
                            .filter(projects::account_id.eq(account_uuid)),
                    )
                    .execute(conn)
                    .await?;

                    Ok(affected > 0)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted)
    }
}
