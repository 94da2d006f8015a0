//! Response DTOs shared across HTTP handlers.
//!
//! Domain entities stay transport-agnostic; these wrappers fix the JSON
//! field casing and drop server-only fields such as access tokens.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{
    Account, Commit, FeedbackSubmission, Note, NoteId, Project, ProjectId, Repository,
};

/// Public view of an account. Never carries the access token.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    #[schema(value_type = String, format = Uuid)]
    pub id: uuid::Uuid,
    pub github_username: String,
    pub github_avatar_url: Option<String>,
    pub email: String,
    /// `-1` means unlimited.
    pub credit_balance: i32,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountDto {
    fn from(account: &Account) -> Self {
        Self {
            id: *account.id.as_uuid(),
            github_username: account.github_username.clone(),
            github_avatar_url: account.github_avatar_url.clone(),
            email: account.email.clone(),
            credit_balance: account.reported_balance(),
            created_at: account.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDto {
    #[schema(value_type = String, format = Uuid)]
    pub id: ProjectId,
    pub name: String,
    pub slug: String,
    pub repository: String,
    pub repository_url: String,
    pub description: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Project> for ProjectDto {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id,
            name: project.name.clone(),
            slug: project.slug.clone(),
            repository: project.repository.to_string(),
            repository_url: project.repository_url.clone(),
            description: project.description.clone(),
            active: project.active,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteDto {
    #[schema(value_type = String, format = Uuid)]
    pub id: NoteId,
    #[schema(value_type = String, format = Uuid)]
    pub project_id: ProjectId,
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

impl From<&Note> for NoteDto {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id,
            project_id: note.project_id,
            title: note.title.clone(),
            content: note.content.clone(),
            version: note.version.clone(),
            status: note.status.to_string(),
            published_at: note.published_at,
            commits: note.commits.clone(),
            view_count: note.view_count,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryDto {
    pub id: i64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub default_branch: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub private: bool,
    pub owner_login: String,
    pub owner_avatar_url: Option<String>,
}

impl From<&Repository> for RepositoryDto {
    fn from(repo: &Repository) -> Self {
        Self {
            id: repo.id,
            name: repo.name.clone(),
            full_name: repo.full_name.clone(),
            description: repo.description.clone(),
            html_url: repo.html_url.clone(),
            default_branch: repo.default_branch.clone(),
            updated_at: repo.updated_at,
            private: repo.private,
            owner_login: repo.owner_login.clone(),
            owner_avatar_url: repo.owner_avatar_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommitDto {
    pub sha: String,
    pub message: String,
    pub author_name: String,
    pub author_email: Option<String>,
    pub authored_at: DateTime<Utc>,
    pub html_url: Option<String>,
    pub additions: Option<i64>,
    pub deletions: Option<i64>,
}

impl From<&Commit> for CommitDto {
    fn from(commit: &Commit) -> Self {
        Self {
            sha: commit.sha.clone(),
            message: commit.message.clone(),
            author_name: commit.author_name.clone(),
            author_email: commit.author_email.clone(),
            authored_at: commit.authored_at,
            html_url: commit.html_url.clone(),
            additions: commit.additions,
            deletions: commit.deletions,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSubmissionDto {
    #[schema(value_type = String, format = Uuid)]
    pub id: uuid::Uuid,
    pub desired_feature: String,
    pub barrier: String,
    pub current_method: String,
    pub credits_before_reset: i32,
    pub credits_after_reset: i32,
    pub created_at: DateTime<Utc>,
}

impl From<&FeedbackSubmission> for FeedbackSubmissionDto {
    fn from(submission: &FeedbackSubmission) -> Self {
        Self {
            id: submission.id,
            desired_feature: submission.desired_feature.clone(),
            barrier: submission.barrier.clone(),
            current_method: submission.current_method.clone(),
            credits_before_reset: submission.credits_before_reset,
            credits_after_reset: submission.credits_after_reset,
            created_at: submission.created_at,
        }
    }
}
