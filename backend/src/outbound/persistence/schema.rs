//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; regenerate with
//! `diesel print-schema` after schema changes.

diesel::table! {
    /// GitHub-linked user accounts with their credit balance.
    accounts (id) {
        id -> Uuid,
        /// Stable GitHub user id; upsert key for login sync.
        github_user_id -> Text,
        github_username -> Text,
        github_avatar_url -> Nullable<Text>,
        github_access_token -> Nullable<Text>,
        email -> Text,
        /// Remaining generation credits; non-negative by check constraint.
        credit_balance -> Int4,
        unmetered -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Tracked repositories with their public changelog slug.
    projects (id) {
        id -> Uuid,
        account_id -> Uuid,
        name -> Text,
        /// Globally unique slug backing the public changelog URL.
        slug -> Text,
        /// `owner/repo` reference into the commit source.
        repository -> Text,
        repository_url -> Text,
        description -> Nullable<Text>,
        active -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Generated release notes and their publication state.
    patch_notes (id) {
        id -> Uuid,
        account_id -> Uuid,
        project_id -> Uuid,
        title -> Text,
        content -> Text,
        version -> Nullable<Text>,
        /// Lifecycle state: `draft` or `published`.
        status -> Text,
        /// First-publication stamp; never cleared once set.
        published_at -> Nullable<Timestamptz>,
        /// Source commit hashes recorded at generation time.
        commits -> Array<Text>,
        view_count -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only feedback submissions backing the credit reset.
    feedback_submissions (id) {
        id -> Uuid,
        account_id -> Uuid,
        account_email -> Text,
        desired_feature -> Text,
        barrier -> Text,
        current_method -> Text,
        credits_before_reset -> Int4,
        credits_after_reset -> Int4,
        ip_address -> Nullable<Text>,
        user_agent -> Nullable<Text>,
        /// Epoch-day bucket; unique with account_id to enforce the cooldown.
        window_bucket -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(projects -> accounts (account_id));
diesel::joinable!(patch_notes -> projects (project_id));
diesel::joinable!(feedback_submissions -> accounts (account_id));

diesel::allow_tables_to_appear_in_same_query!(
    accounts,
    projects,
    patch_notes,
    feedback_submissions,
);
