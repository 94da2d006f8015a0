//! PostgreSQL-backed `NoteRepository` implementation using Diesel ORM.
//!
//! View counting is a conditional increment restricted to published notes,
//! so drafts can never accrue views even when their id leaks.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{NewNote, NoteFilter, NoteRepository, NoteRepositoryError, NoteUpdate};
use crate::domain::{AccountId, Note, NoteId, NoteStatus, ProjectId};

use super::models::{NewPatchNoteRow, PatchNoteRow, PatchNoteUpdateRow};
use super::pool::{DbPool, PoolError};
use super::schema::patch_notes;

const PUBLISHED: &str = "published";

/// Diesel-backed implementation of the `NoteRepository` port.
#[derive(Clone)]
pub struct DieselNoteRepository {
    pool: DbPool,
}

impl DieselNoteRepository {
    /// Create a new repository over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> NoteRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            NoteRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> NoteRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "note query failed");
        }
        other => debug!(error = %other, "note query failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            NoteRepositoryError::connection("database connection error")
        }
        _ => NoteRepositoryError::query("database error"),
    }
}

fn row_to_note(row: PatchNoteRow) -> Result<Note, NoteRepositoryError> {
    let status = NoteStatus::from_str(&row.status).map_err(|_| {
        NoteRepositoryError::query(format!("stored note status '{}' is malformed", row.status))
    })?;
    Ok(Note {
        id: NoteId::from_uuid(row.id),
        account_id: AccountId::from_uuid(row.account_id),
        project_id: ProjectId::from_uuid(row.project_id),
        title: row.title,
        content: row.content,
        version: row.version,
        status,
        published_at: row.published_at,
        commits: row.commits,
        view_count: row.view_count,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl NoteRepository for DieselNoteRepository {
    async fn insert(&self, note: &NewNote) -> Result<Note, NoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewPatchNoteRow {
            id: Uuid::new_v4(),
            account_id: *note.account_id.as_uuid(),
            project_id: *note.project_id.as_uuid(),
            title: &note.title,
            content: &note.content,
            version: note.version.as_deref(),
            commits: &note.commits,
        };

        let row: PatchNoteRow = diesel::insert_into(patch_notes::table)
            .values(&new_row)
            .returning(PatchNoteRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_note(row)
    }

    async fn find_for_account(
        &self,
        note_id: &NoteId,
        account_id: &AccountId,
    ) -> Result<Option<Note>, NoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<PatchNoteRow> = patch_notes::table
            .filter(patch_notes::id.eq(note_id.as_uuid()))
            .filter(patch_notes::account_id.eq(account_id.as_uuid()))
            .select(PatchNoteRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_note).transpose()
    }

    async fn list_for_account(
        &self,
        account_id: &AccountId,
        filter: NoteFilter,
    ) -> Result<Vec<Note>, NoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = patch_notes::table
            .filter(patch_notes::account_id.eq(account_id.as_uuid()))
            .order(patch_notes::created_at.desc())
            .select(PatchNoteRow::as_select())
            .into_boxed();

        if let Some(project_id) = filter.project_id {
            query = query.filter(patch_notes::project_id.eq(*project_id.as_uuid()));
        }
        if let Some(status) = filter.status {
            query = query.filter(patch_notes::status.eq(status.to_string()));
        }

        let rows: Vec<PatchNoteRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_note).collect()
    }

    async fn update(
        &self,
        note_id: &NoteId,
        account_id: &AccountId,
        update: &NoteUpdate,
    ) -> Result<Option<Note>, NoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let status = update.status.to_string();
        let changes = PatchNoteUpdateRow {
            title: &update.title,
            content: &update.content,
            status: &status,
            published_at: update.published_at,
            updated_at: Utc::now(),
        };

        let row: Option<PatchNoteRow> = diesel::update(
            patch_notes::table
                .filter(patch_notes::id.eq(note_id.as_uuid()))
                .filter(patch_notes::account_id.eq(account_id.as_uuid())),
        )
        .set(&changes)
        .returning(PatchNoteRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        row.map(row_to_note).transpose()
    }

    async fn delete_for_account(
        &self,
        note_id: &NoteId,
        account_id: &AccountId,
    ) -> Result<bool, NoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::delete(
            patch_notes::table
                .filter(patch_notes::id.eq(note_id.as_uuid()))
                .filter(patch_notes::account_id.eq(account_id.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(affected > 0)
    }

    async fn record_view(&self, note_id: &NoteId) -> Result<bool, NoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::update(
            patch_notes::table
                .filter(patch_notes::id.eq(note_id.as_uuid()))
                .filter(patch_notes::status.eq(PUBLISHED)),
        )
        .set(patch_notes::view_count.eq(patch_notes::view_count + 1))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(affected > 0)
    }

    async fn list_published(
        &self,
        project_id: &ProjectId,
        since: Option<DateTime<Utc>>,
        limit: Option<i64>,
    ) -> Result<Vec<Note>, NoteRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = patch_notes::table
            .filter(patch_notes::project_id.eq(project_id.as_uuid()))
            .filter(patch_notes::status.eq(PUBLISHED))
            .filter(patch_notes::published_at.is_not_null())
            .order(patch_notes::published_at.desc())
            .select(PatchNoteRow::as_select())
            .into_boxed();

        if let Some(since) = since {
            query = query.filter(patch_notes::published_at.ge(since));
        }
        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        let rows: Vec<PatchNoteRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_note).collect()
    }
}
