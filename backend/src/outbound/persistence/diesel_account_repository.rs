//! PostgreSQL-backed `AccountRepository` implementation using Diesel ORM.
//!
//! Login sync is a single upsert keyed by the GitHub user id. Credit debits
//! are a conditional update so the balance can never go negative under
//! concurrent generation requests.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{AccountRepository, AccountRepositoryError};
use crate::domain::{AccessToken, Account, AccountId, LoginProfile};

use super::models::{AccountRow, NewAccountRow};
use super::pool::{DbPool, PoolError};
use super::schema::accounts;

/// Diesel-backed implementation of the `AccountRepository` port.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    /// Create a new repository over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AccountRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            AccountRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> AccountRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "account query failed");
        }
        other => debug!(error = %other, "account query failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            AccountRepositoryError::connection("database connection error")
        }
        _ => AccountRepositoryError::query("database error"),
    }
}

fn row_to_account(row: AccountRow) -> Account {
    Account {
        id: AccountId::from_uuid(row.id),
        github_user_id: row.github_user_id,
        github_username: row.github_username,
        github_avatar_url: row.github_avatar_url,
        access_token: row.github_access_token.map(AccessToken::new),
        email: row.email,
        credit_balance: row.credit_balance,
        unmetered: row.unmetered,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn find_by_id(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<AccountRow> = accounts::table
            .find(account_id.as_uuid())
            .select(AccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_account))
    }

    async fn upsert_login(
        &self,
        profile: &LoginProfile,
    ) -> Result<Account, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewAccountRow {
            id: Uuid::new_v4(),
            github_user_id: &profile.github_user_id,
            github_username: &profile.github_username,
            github_avatar_url: profile.github_avatar_url.as_deref(),
            github_access_token: Some(profile.access_token.expose()),
            email: &profile.email,
            credit_balance: crate::domain::CREDIT_ALLOWANCE,
        };

        // Returning accounts keep their id, balance, and unmetered flag;
        // only the profile fields refresh on every login.
        let row: AccountRow = diesel::insert_into(accounts::table)
            .values(&new_row)
            .on_conflict(accounts::github_user_id)
            .do_update()
            .set((
                accounts::github_username.eq(&profile.github_username),
                accounts::github_avatar_url.eq(profile.github_avatar_url.as_deref()),
                accounts::github_access_token.eq(Some(profile.access_token.expose())),
                accounts::email.eq(&profile.email),
                accounts::updated_at.eq(diesel::dsl::now),
            ))
            .returning(AccountRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(row_to_account(row))
    }

    async fn debit_credit(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<i32>, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Conditional decrement; matches zero rows at zero balance.
        let debited: Option<i32> = diesel::update(
            accounts::table
                .filter(accounts::id.eq(account_id.as_uuid()))
                .filter(accounts::credit_balance.gt(0)),
        )
        .set((
            accounts::credit_balance.eq(accounts::credit_balance - 1),
            accounts::updated_at.eq(diesel::dsl::now),
        ))
        .returning(accounts::credit_balance)
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        if let Some(balance) = debited {
            return Ok(Some(balance));
        }

        // Distinguish an exhausted balance from a missing account.
        accounts::table
            .find(account_id.as_uuid())
            .select(accounts::credit_balance)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)
    }

    async fn reset_credits(
        &self,
        account_id: &AccountId,
        ceiling: i32,
    ) -> Result<bool, AccountRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::update(accounts::table.filter(accounts::id.eq(account_id.as_uuid())))
            .set((
                accounts::credit_balance.eq(ceiling),
                accounts::updated_at.eq(diesel::dsl::now),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(affected > 0)
    }
}
