//! Account identity, credential, and credit state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Credits granted to a new account and restored by a feedback reset.
///
/// One canonical constant serves as both the initial balance and the reset
/// ceiling.
pub const CREDIT_ALLOWANCE: i32 = 20;

/// Sentinel balance reported to callers for unmetered accounts.
pub const UNLIMITED_CREDITS: i32 = -1;

/// Opaque account identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Wrap an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Borrow the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// GitHub access token stored on behalf of an account.
///
/// The token authorises the commit source adapter and must never be
/// serialized to a client. Memory is wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Expose the raw token for outbound request headers.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// A registered user with credential and credit state.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: AccountId,
    /// Stable GitHub user id; the upsert key for login sync.
    pub github_user_id: String,
    pub github_username: String,
    pub github_avatar_url: Option<String>,
    /// Absent until the first login completes, or after a revocation.
    pub access_token: Option<AccessToken>,
    pub email: String,
    /// Remaining generation credits; never negative.
    pub credit_balance: i32,
    /// When true, credit checks are bypassed and the balance is untouched.
    pub unmetered: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Whether a generation may proceed under the credit gate.
    pub fn can_generate(&self) -> bool {
        self.unmetered || self.credit_balance > 0
    }

    /// Balance as reported to callers: `-1` means unlimited.
    pub fn reported_balance(&self) -> i32 {
        if self.unmetered {
            UNLIMITED_CREDITS
        } else {
            self.credit_balance
        }
    }
}

/// Verified identity delivered by the OAuth transport after login.
///
/// The core never drives the OAuth flow itself; it receives the already
/// verified profile and syncs it into the account store.
#[derive(Debug, Clone)]
pub struct LoginProfile {
    pub github_user_id: String,
    pub github_username: String,
    pub github_avatar_url: Option<String>,
    pub access_token: AccessToken,
    pub email: String,
}

/// Credit snapshot returned to the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreditStatus {
    pub remaining: i32,
    pub unmetered: bool,
}
