//! Account persistence port.

use std::net::IpAddr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::account::{Account, Credential, ResetToken};
use crate::error::Result;

/// Port for account, credential, reset-token and login-record durability.
///
/// Implementations own the schema and the transaction boundaries: email/name
/// uniqueness on insert and atomic bulk token invalidation are enforced here,
/// not by the manager. Soft-deleted accounts must be excluded from every
/// lookup while their historical rows remain for audit continuity. Any `Err`
/// surfaces to callers as
/// [`ResultCode::DatabaseError`](crate::code::ResultCode::DatabaseError).
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Find an active account by email address.
    async fn account_by_email(&self, email: &str) -> Result<Option<Account>>;

    /// Find an active account by display name.
    async fn account_by_name(&self, name: &str) -> Result<Option<Account>>;

    /// Find an active account by id.
    async fn account_by_id(&self, id: i32) -> Result<Option<Account>>;

    /// Fetch the stored credential of an account.
    async fn credential_by_id(&self, id: i32) -> Result<Option<Credential>>;

    /// Resolve an active account id from an email address.
    async fn id_by_email(&self, email: &str) -> Result<Option<i32>>;

    /// Insert a new account and return its assigned id.
    ///
    /// The passed account carries
    /// [`UNASSIGNED_ID`](crate::account::UNASSIGNED_ID).
    async fn insert_account(&self, account: &Account) -> Result<i32>;

    /// Delete an account.
    async fn delete_account(&self, id: i32) -> Result<()>;

    /// Mark the account with this email as confirmed.
    async fn confirm_account(&self, email: &str) -> Result<()>;

    /// Replace the stored credential of an account.
    async fn set_credential(
        &self,
        id: i32,
        credential: &Credential,
    ) -> Result<()>;

    /// Count registered accounts, optionally only those created after
    /// `since`.
    async fn account_count(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> Result<i64>;

    /// Append a login-record audit row.
    async fn record_login(
        &self,
        account_id: Option<i32>,
        success: bool,
        address: IpAddr,
    ) -> Result<()>;

    /// Persist a new password-reset token.
    async fn insert_reset_token(&self, token: &ResetToken) -> Result<()>;

    /// Fetch the most recently issued reset token for this email, including
    /// stale ones.
    async fn newest_reset_token(
        &self,
        email: &str,
    ) -> Result<Option<ResetToken>>;

    /// Invalidate every outstanding reset token of an account.
    async fn cancel_reset_tokens(&self, account_id: i32) -> Result<()>;

    /// Whether an active account uses this email address.
    async fn email_in_use(&self, email: &str) -> Result<bool>;

    /// Whether an active account uses this display name.
    async fn name_in_use(&self, name: &str) -> Result<bool>;
}
