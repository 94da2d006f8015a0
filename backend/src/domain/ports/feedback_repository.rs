//! Port for append-only feedback submissions and the cooldown check.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{AccountId, FeedbackSubmission};

/// Errors raised by feedback repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedbackRepositoryError {
    /// Repository connection could not be established.
    #[error("feedback repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("feedback repository query failed: {message}")]
    Query { message: String },
}

impl FeedbackRepositoryError {
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
}

/// Fields for one submission; `id` and `created_at` are assigned on insert.
#[derive(Debug, Clone)]
pub struct NewFeedbackSubmission {
    pub account_id: AccountId,
    pub account_email: String,
    pub desired_feature: String,
    pub barrier: String,
    pub current_method: String,
    pub credits_before_reset: i32,
    pub credits_after_reset: i32,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Result of an insert guarded by the unique cooldown window key.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackInsertOutcome {
    /// The submission landed.
    Inserted(FeedbackSubmission),
    /// Another submission already occupies this account's window.
    DuplicateWindow,
}

/// Port for feedback submissions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Whether the account submitted feedback at or after `since`.
    async fn has_submission_since(
        &self,
        account_id: &AccountId,
        since: DateTime<Utc>,
    ) -> Result<bool, FeedbackRepositoryError>;

    /// Insert a submission, atomically refused when the account's cooldown
    /// window is already occupied.
    async fn insert_in_window(
        &self,
        submission: &NewFeedbackSubmission,
    ) -> Result<FeedbackInsertOutcome, FeedbackRepositoryError>;

    /// The account's most recent submissions, newest first.
    async fn list_recent(
        &self,
        account_id: &AccountId,
        limit: i64,
    ) -> Result<Vec<FeedbackSubmission>, FeedbackRepositoryError>;
}

/// Fixture implementation for tests that do not exercise feedback.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureFeedbackRepository;

#[async_trait]
impl FeedbackRepository for FixtureFeedbackRepository {
    async fn has_submission_since(
        &self,
        _account_id: &AccountId,
        _since: DateTime<Utc>,
    ) -> Result<bool, FeedbackRepositoryError> {
        Ok(false)
    }

    async fn insert_in_window(
        &self,
        submission: &NewFeedbackSubmission,
    ) -> Result<FeedbackInsertOutcome, FeedbackRepositoryError> {
        Ok(FeedbackInsertOutcome::Inserted(FeedbackSubmission {
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
            created_at: Utc::now(),
        }))
    }

    async fn list_recent(
        &self,
        _account_id: &AccountId,
        _limit: i64,
    ) -> Result<Vec<FeedbackSubmission>, FeedbackRepositoryError> {
        Ok(Vec::new())
    }
}
