//! Account domain service: login sync and credit reads.

use std::sync::Arc;

use crate::domain::ports::{AccountRepository, AccountRepositoryError};
use crate::domain::{Account, AccountId, CreditStatus, Error, LoginProfile};

pub(crate) fn map_account_repository_error(error: AccountRepositoryError) -> Error {
    match error {
        AccountRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("account store unavailable: {message}"))
        }
        AccountRepositoryError::Query { message } => {
            Error::internal(format!("account store error: {message}"))
        }
    }
}

/// Load an account or fail with the caller-facing `NotFound`.
pub(crate) async fn require_account(
    accounts: &Arc<dyn AccountRepository>,
    account_id: &AccountId,
) -> Result<Account, Error> {
    accounts
        .find_by_id(account_id)
        .await
        .map_err(map_account_repository_error)?
        .ok_or_else(|| Error::not_found("User not found"))
}

/// Syncs verified logins into the account store and answers credit reads.
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
}

impl AccountService {
    /// Create a new service over the account repository.
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    /// Upsert the account for a verified external login.
    ///
    /// Called by the transport after the OAuth provider has vouched for the
    /// profile; refreshes the stored credential on every login.
    pub async fn sync_login(&self, profile: &LoginProfile) -> Result<Account, Error> {
        self.accounts
            .upsert_login(profile)
            .await
            .map_err(map_account_repository_error)
    }

    /// Fetch the full account record for the given id.
    pub async fn account(&self, account_id: &AccountId) -> Result<Account, Error> {
        require_account(&self.accounts, account_id).await
    }

    /// Remaining credits as shown on the dashboard.
    pub async fn credit_status(&self, account_id: &AccountId) -> Result<CreditStatus, Error> {
        let account = require_account(&self.accounts, account_id).await?;
        Ok(CreditStatus {
            remaining: account.reported_balance(),
            unmetered: account.unmetered,
        })
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
