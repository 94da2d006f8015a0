//! Port for account persistence and atomic credit accounting.

use async_trait::async_trait;

use crate::domain::{Account, AccountId, LoginProfile};

/// Errors raised by account repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountRepositoryError {
    /// Repository connection could not be established.
    #[error("account repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("account repository query failed: {message}")]
    Query { message: String },
}

impl AccountRepositoryError {
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

/// Port for reading accounts and mutating their credit balance.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find an account by id.
    async fn find_by_id(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<Account>, AccountRepositoryError>;

    /// Insert or refresh an account from a verified login profile.
    ///
    /// Upsert is keyed by the stable provider user id; username, avatar,
    /// email, and access token are refreshed on every login.
    async fn upsert_login(
        &self,
        profile: &LoginProfile,
    ) -> Result<Account, AccountRepositoryError>;

    /// Atomically decrement the balance if it is positive.
    ///
    /// Returns the post-debit balance, unchanged (clamped at zero) when no
    /// credit was available, or `None` when the account does not exist.
    /// This is a single conditional update so concurrent debits can never
    /// drive the balance negative.
    async fn debit_credit(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<i32>, AccountRepositoryError>;

    /// Set the balance to the given ceiling.
    ///
    /// Returns `false` when the account does not exist.
    async fn reset_credits(
        &self,
        account_id: &AccountId,
        ceiling: i32,
    ) -> Result<bool, AccountRepositoryError>;
}

/// Fixture implementation for tests that do not exercise accounts.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAccountRepository;

#[async_trait]
impl AccountRepository for FixtureAccountRepository {
    async fn find_by_id(
        &self,
        _account_id: &AccountId,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        Ok(None)
    }

    async fn upsert_login(
        &self,
        profile: &LoginProfile,
    ) -> Result<Account, AccountRepositoryError> {
        let now = chrono::Utc::now();
        Ok(Account {
            id: AccountId::random(),
            github_user_id: profile.github_user_id.clone(),
            github_username: profile.github_username.clone(),
            github_avatar_url: profile.github_avatar_url.clone(),
            access_token: Some(profile.access_token.clone()),
            email: profile.email.clone(),
            credit_balance: crate::domain::CREDIT_ALLOWANCE,
            unmetered: false,
            created_at: now,
            updated_at: now,
        })
    }

    async fn debit_credit(
        &self,
        _account_id: &AccountId,
    ) -> Result<Option<i32>, AccountRepositoryError> {
        Ok(None)
    }

    async fn reset_credits(
        &self,
        _account_id: &AccountId,
        _ceiling: i32,
    ) -> Result<bool, AccountRepositoryError> {
        Ok(false)
    }
}
