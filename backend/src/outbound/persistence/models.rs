//! Internal Diesel row structs for database operations.
//!
//! These types exist solely to satisfy Diesel's type requirements for
//! queries and mutations. They never cross into the domain; each
//! repository maps them to domain entities at its boundary.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{accounts, feedback_submissions, patch_notes, projects};

/// Row struct for reading from the accounts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: Uuid,
    pub github_user_id: String,
    pub github_username: String,
    pub github_avatar_url: Option<String>,
    pub github_access_token: Option<String>,
    pub email: String,
    pub credit_balance: i32,
    pub unmetered: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating account records on first login.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accounts)]
pub(crate) struct NewAccountRow<'a> {
    pub id: Uuid,
    pub github_user_id: &'a str,
    pub github_username: &'a str,
    pub github_avatar_url: Option<&'a str>,
    pub github_access_token: Option<&'a str>,
    pub email: &'a str,
    pub credit_balance: i32,
}

/// Row struct for reading from the projects table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProjectRow {
    pub id: Uuid,
    pub account_id: Uuid,
    pub name: String,
    pub slug: String,
    pub repository: String,
    pub repository_url: String,
    pub description: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new project records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = projects)]
pub(crate) struct NewProjectRow<'a> {
    pub id: Uuid,
    pub account_id: Uuid,
    pub name: &'a str,
    pub slug: &'a str,
    pub repository: &'a str,
    pub repository_url: &'a str,
    pub description: Option<&'a str>,
}

/// Changeset struct applying an owner edit to a project.
///
/// `treat_none_as_null` lets an edit clear the description.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = projects)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ProjectUpdateRow<'a> {
    pub name: &'a str,
    pub slug: &'a str,
    pub repository: &'a str,
    pub repository_url: &'a str,
    pub description: Option<&'a str>,
    pub active: bool,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the patch_notes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = patch_notes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PatchNoteRow {
    pub id: Uuid,
    pub account_id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub content: String,
    pub version: Option<String>,
    pub status: String,
    pub published_at: Option<DateTime<Utc>>,
    pub commits: Vec<String>,
    pub view_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating draft notes.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = patch_notes)]
pub(crate) struct NewPatchNoteRow<'a> {
    pub id: Uuid,
    pub account_id: Uuid,
    pub project_id: Uuid,
    pub title: &'a str,
    pub content: &'a str,
    pub version: Option<&'a str>,
    pub commits: &'a [String],
}

/// Changeset struct applying an owner edit to a note.
///
/// `published_at` uses the default `None`-skips behaviour, so an edit can
/// never clear an existing publication stamp.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = patch_notes)]
pub(crate) struct PatchNoteUpdateRow<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub status: &'a str,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the feedback_submissions table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = feedback_submissions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FeedbackSubmissionRow {
    pub id: Uuid,
    pub account_id: Uuid,
    pub account_email: String,
    pub desired_feature: String,
    pub barrier: String,
    pub current_method: String,
    pub credits_before_reset: i32,
    pub credits_after_reset: i32,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    #[expect(dead_code, reason = "cooldown key is write-only after insert")]
    pub window_bucket: i64,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for recording one feedback submission.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = feedback_submissions)]
pub(crate) struct NewFeedbackSubmissionRow<'a> {
    pub id: Uuid,
    pub account_id: Uuid,
    pub account_email: &'a str,
    pub desired_feature: &'a str,
    pub barrier: &'a str,
    pub current_method: &'a str,
    pub credits_before_reset: i32,
    pub credits_after_reset: i32,
    pub ip_address: Option<&'a str>,
    pub user_agent: Option<&'a str>,
    pub window_bucket: i64,
}
