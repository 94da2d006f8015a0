//! Feedback survey answers and submission records.

use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{AccountId, Error};

/// Minimum trimmed length for every survey answer.
pub const MIN_ANSWER_LEN: usize = 15;

/// Maximum trimmed length for every survey answer.
pub const MAX_ANSWER_LEN: usize = 500;

/// The three required free-text survey answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackAnswers {
    /// "What's the #1 feature you'd add?"
    pub desired_feature: String,
    /// "What almost stopped you from trying the product?"
    pub barrier: String,
    /// "How do you currently share product updates with customers?"
    pub current_method: String,
}

impl FeedbackAnswers {
    /// Validate and trim all answers, naming the first failing field.
    pub fn into_validated(self) -> Result<Self, Error> {
        Ok(Self {
            desired_feature: validate_answer(
                self.desired_feature,
                "desiredFeature",
                "Feature suggestion",
            )?,
            barrier: validate_answer(self.barrier, "barrier", "Barrier description")?,
            current_method: validate_answer(
                self.current_method,
                "currentMethod",
                "Current method description",
            )?,
        })
    }
}

fn validate_answer(raw: String, field: &str, label: &str) -> Result<String, Error> {
    let trimmed = raw.trim();
    if trimmed.chars().count() < MIN_ANSWER_LEN {
        return Err(Error::invalid_request(format!(
            "{label} must be at least {MIN_ANSWER_LEN} characters"
        ))
        .with_details(json!({ "field": field })));
    }
    if trimmed.chars().count() > MAX_ANSWER_LEN {
        return Err(Error::invalid_request(format!(
            "{label} cannot exceed {MAX_ANSWER_LEN} characters"
        ))
        .with_details(json!({ "field": field })));
    }
    Ok(trimmed.to_owned())
}

/// Best-effort request metadata recorded for abuse auditing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// An append-only feedback submission snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackSubmission {
    pub id: Uuid,
    pub account_id: AccountId,
    /// Denormalized for audit queries.
    pub account_email: String,
    pub desired_feature: String,
    pub barrier: String,
    pub current_method: String,
    pub credits_before_reset: i32,
    pub credits_after_reset: i32,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Seconds per cooldown bucket; one rolling day.
pub const COOLDOWN_SECONDS: i64 = 24 * 60 * 60;

/// Epoch-day bucket backing the unique cooldown constraint.
pub fn window_bucket(at: DateTime<Utc>) -> i64 {
    at.timestamp().div_euclid(COOLDOWN_SECONDS)
}
