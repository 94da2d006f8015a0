//! PostgreSQL-backed `FeedbackRepository` implementation using Diesel ORM.
//!
//! The cooldown is backed by the `(account_id, window_bucket)` unique key:
//! an insert into an occupied window affects zero rows and reports
//! `DuplicateWindow` without raising an error.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{
    FeedbackInsertOutcome, FeedbackRepository, FeedbackRepositoryError, NewFeedbackSubmission,
};
use crate::domain::feedback::window_bucket;
use crate::domain::{AccountId, FeedbackSubmission};

use super::models::{FeedbackSubmissionRow, NewFeedbackSubmissionRow};
use super::pool::{DbPool, PoolError};
use super::schema::feedback_submissions;

/// Diesel-backed implementation of the `FeedbackRepository` port.
#[derive(Clone)]
pub struct DieselFeedbackRepository {
    pool: DbPool,
}

impl DieselFeedbackRepository {
    /// Create a new repository over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> FeedbackRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            FeedbackRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> FeedbackRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "feedback query failed");
        }
        other => debug!(error = %other, "feedback query failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            FeedbackRepositoryError::connection("database connection error")
        }
        _ => FeedbackRepositoryError::query("database error"),
    }
}

fn row_to_submission(row: FeedbackSubmissionRow) -> FeedbackSubmission {
    FeedbackSubmission {
        id: row.id,
        account_id: AccountId::from_uuid(row.account_id),
        account_email: row.account_email,
        desired_feature: row.desired_feature,
        barrier: row.barrier,
        current_method: row.current_method,
        credits_before_reset: row.credits_before_reset,
        credits_after_reset: row.credits_after_reset,
        ip_address: row.ip_address,
        user_agent: row.user_agent,
        created_at: row.created_at,
    }
}

#[async_trait]
impl FeedbackRepository for DieselFeedbackRepository {
    async fn has_submission_since(
        &self,
        account_id: &AccountId,
        since: DateTime<Utc>,
    ) -> Result<bool, FeedbackRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let found: Option<Uuid> = feedback_submissions::table
            .filter(feedback_submissions::account_id.eq(account_id.as_uuid()))
            .filter(feedback_submissions::created_at.ge(since))
            .select(feedback_submissions::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(found.is_some())
    }

    async fn insert_in_window(
        &self,
        submission: &NewFeedbackSubmission,
    ) -> Result<FeedbackInsertOutcome, FeedbackRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewFeedbackSubmissionRow {
            id: Uuid::new_v4(),
            account_id: *submission.account_id.as_uuid(),
            account_email: &submission.account_email,
            desired_feature: &submission.desired_feature,
            barrier: &submission.barrier,
            current_method: &submission.current_method,
            credits_before_reset: submission.credits_before_reset,
            credits_after_reset: submission.credits_after_reset,
            ip_address: submission.ip_address.as_deref(),
            user_agent: submission.user_agent.as_deref(),
            window_bucket: window_bucket(Utc::now()),
        };

        let inserted: Option<FeedbackSubmissionRow> =
            diesel::insert_into(feedback_submissions::table)
                .values(&new_row)
                .on_conflict((
                    feedback_submissions::account_id,
                    feedback_submissions::window_bucket,
                ))
                .do_nothing()
                .returning(FeedbackSubmissionRow::as_returning())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(map_diesel_error)?;

        Ok(match inserted {
            Some(row) => FeedbackInsertOutcome::Inserted(row_to_submission(row)),
            None => FeedbackInsertOutcome::DuplicateWindow,
        })
    }

    async fn list_recent(
        &self,
        account_id: &AccountId,
        limit: i64,
    ) -> Result<Vec<FeedbackSubmission>, FeedbackRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<FeedbackSubmissionRow> = feedback_submissions::table
            .filter(feedback_submissions::account_id.eq(account_id.as_uuid()))
            .order(feedback_submissions::created_at.desc())
            .limit(limit)
            .select(FeedbackSubmissionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(row_to_submission).collect())
    }
}
