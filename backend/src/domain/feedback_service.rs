//! Feedback submission and the credit reset it earns.
//!
//! This is a deliberate side door around credit scarcity for free-tier
//! users, distinct from billing. The cooldown is per account only; a user
//! with several accounts can reset repeatedly, which product has accepted
//! as a tradeoff.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::warn;

use crate::domain::account_service::{map_account_repository_error, require_account};
use crate::domain::feedback::COOLDOWN_SECONDS;
use crate::domain::ports::{
    AccountRepository, FeedbackInsertOutcome, FeedbackRepository, FeedbackRepositoryError,
    NewFeedbackSubmission,
};
use crate::domain::{
    AccountId, CREDIT_ALLOWANCE, Error, FeedbackAnswers, FeedbackSubmission, RequestMeta,
};

const COOLDOWN_MESSAGE: &str = "You can only submit feedback once every 24 hours";

fn map_feedback_repository_error(error: FeedbackRepositoryError) -> Error {
    match error {
        FeedbackRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("feedback store unavailable: {message}"))
        }
        FeedbackRepositoryError::Query { message } => {
            Error::internal(format!("feedback store error: {message}"))
        }
    }
}

/// Balance snapshot returned after a successful reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreditsReset {
    pub before: i32,
    pub after: i32,
}

/// Accepts survey responses and refills the account's credit balance.
#[derive(Clone)]
pub struct FeedbackService {
    accounts: Arc<dyn AccountRepository>,
    feedback: Arc<dyn FeedbackRepository>,
}

impl FeedbackService {
    /// Create a new service over its collaborating ports.
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        feedback: Arc<dyn FeedbackRepository>,
    ) -> Self {
        Self { accounts, feedback }
    }

    /// Record a survey response and reset the balance to the ceiling.
    ///
    /// Rejected when any answer is too short, when the balance is already
    /// full, or within the rolling 24-hour cooldown. The rolling-window
    /// read is backed by the repository's unique window key, so concurrent
    /// submissions in the same window cannot both land.
    pub async fn submit(
        &self,
        account_id: &AccountId,
        answers: FeedbackAnswers,
        meta: RequestMeta,
    ) -> Result<CreditsReset, Error> {
        let answers = answers.into_validated()?;
        let account = require_account(&self.accounts, account_id).await?;

        if account.credit_balance >= CREDIT_ALLOWANCE {
            return Err(Error::invalid_request(
                "You already have the maximum number of credits",
            ));
        }

        let window_start = Utc::now() - Duration::seconds(COOLDOWN_SECONDS);
        let recently_submitted = self
            .feedback
            .has_submission_since(account_id, window_start)
            .await
            .map_err(map_feedback_repository_error)?;
        if recently_submitted {
            return Err(Error::rate_limited(COOLDOWN_MESSAGE));
        }

        let outcome = self
            .feedback
            .insert_in_window(&NewFeedbackSubmission {
                account_id: account.id,
                account_email: account.email.clone(),
                desired_feature: answers.desired_feature,
                barrier: answers.barrier,
                current_method: answers.current_method,
                credits_before_reset: account.credit_balance,
                credits_after_reset: CREDIT_ALLOWANCE,
                ip_address: meta.ip_address,
                user_agent: meta.user_agent,
            })
            .await
            .map_err(map_feedback_repository_error)?;
        if matches!(outcome, FeedbackInsertOutcome::DuplicateWindow) {
            return Err(Error::rate_limited(COOLDOWN_MESSAGE));
        }

        // Not special-cased for unmetered accounts; the reset is a harmless
        // no-op for them.
        let reset = self
            .accounts
            .reset_credits(account_id, CREDIT_ALLOWANCE)
            .await
            .map_err(map_account_repository_error)?;
        if !reset {
            warn!(account = %account_id, "account vanished before credit reset");
        }

        Ok(CreditsReset {
            before: account.credit_balance,
            after: CREDIT_ALLOWANCE,
        })
    }

    /// The account's ten most recent submissions, newest first.
    pub async fn history(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<FeedbackSubmission>, Error> {
        self.feedback
            .list_recent(account_id, 10)
            .await
            .map_err(map_feedback_repository_error)
    }
}

#[cfg(test)]
#[path = "feedback_service_tests.rs"]
mod tests;
