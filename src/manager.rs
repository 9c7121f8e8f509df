//! The account lifecycle state machine.

use std::net::IpAddr;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::account::{Account, EmailKind, ResetToken, UNASSIGNED_ID};
use crate::code::ResultCode;
use crate::config::Configuration;
use crate::crypto::{PasswordHasher, TokenGenerator};
use crate::ports::{AccountStore, Clock, Notifier, Session, SystemClock};

/// Coordinates the storage, notification and session ports to move accounts
/// through their lifecycle: register → confirm, log in/out, change password,
/// request-reset → reset.
///
/// The manager itself is stateless and reentrant; durable state lives behind
/// [`AccountStore`], per-request state behind [`Session`]. Every operation
/// reports through [`ResultCode`] — port failures are folded into
/// [`ResultCode::DatabaseError`] or [`ResultCode::FailedToSendEmail`] and are
/// terminal for that operation, never retried here.
pub struct AccountManager {
    store: Arc<dyn AccountStore>,
    notifier: Arc<dyn Notifier>,
    session: Arc<dyn Session>,
    clock: Arc<dyn Clock>,
    hasher: PasswordHasher,
    control_codes: TokenGenerator,
    reset_keys: TokenGenerator,
    reset_token_ttl: Duration,
}

impl AccountManager {
    /// Create a new [`AccountManager`] on the system clock.
    pub fn new(
        store: Arc<dyn AccountStore>,
        notifier: Arc<dyn Notifier>,
        session: Arc<dyn Session>,
        config: &Configuration,
    ) -> Self {
        Self::with_clock(store, notifier, session, Arc::new(SystemClock), config)
    }

    /// Create a new [`AccountManager`] with an explicit time source.
    pub fn with_clock(
        store: Arc<dyn AccountStore>,
        notifier: Arc<dyn Notifier>,
        session: Arc<dyn Session>,
        clock: Arc<dyn Clock>,
        config: &Configuration,
    ) -> Self {
        Self {
            store,
            notifier,
            session,
            clock,
            hasher: PasswordHasher::new(config.salt_length),
            control_codes: TokenGenerator::new(config.control_code_length),
            reset_keys: TokenGenerator::new(config.reset_key_length),
            reset_token_ttl: Duration::seconds(config.reset_token_ttl_secs as i64),
        }
    }

    /// Register a new account.
    ///
    /// The row is persisted before the registration email goes out, so a
    /// delivery failure still returns the assigned id: the account can be
    /// confirmed later or have its email resent.
    pub async fn register(
        &self,
        email: &str,
        name: &str,
        password: &str,
        auto_confirm: bool,
    ) -> (ResultCode, Option<i32>) {
        match self.store.email_in_use(email).await {
            Err(err) => {
                tracing::error!(error = %err, "email uniqueness check failed");
                return (ResultCode::DatabaseError, None);
            }
            Ok(true) => return (ResultCode::EmailAlreadyRegistered, None),
            Ok(false) => {}
        }

        match self.store.name_in_use(name).await {
            Err(err) => {
                tracing::error!(error = %err, "name uniqueness check failed");
                return (ResultCode::DatabaseError, None);
            }
            Ok(true) => return (ResultCode::UserNameAlreadyRegistered, None),
            Ok(false) => {}
        }

        let control_code = if auto_confirm {
            None
        } else {
            Some(self.control_codes.generate())
        };

        let account = Account {
            id: UNASSIGNED_ID,
            name: name.to_string(),
            email: email.to_string(),
            registration_control_code: control_code,
            confirmed: auto_confirm,
            credential: self.hasher.create(password),
        };

        let id = match self.store.insert_account(&account).await {
            Ok(id) => id,
            Err(err) => {
                tracing::error!(error = %err, "account insert failed");
                return (ResultCode::DatabaseError, None);
            }
        };

        tracing::info!(id, auto_confirm, "account registered");

        if let Some(code) = account.registration_control_code.as_deref() {
            if let Err(err) = self
                .notifier
                .send_registration(email, name, id, code)
                .await
            {
                tracing::warn!(id, error = %err, "registration email not delivered");
                return (ResultCode::FailedToSendEmail, Some(id));
            }
        }

        (ResultCode::Ok, Some(id))
    }

    /// Confirm a pending registration with its control code.
    ///
    /// Confirming twice is not an invalid code: it reports
    /// [`ResultCode::RegistrationAlreadyConfirmed`] so callers can treat the
    /// repeat as idempotent.
    pub async fn confirm_registration(
        &self,
        email: &str,
        control_code: &str,
    ) -> ResultCode {
        let account = match self.store.account_by_email(email).await {
            Ok(Some(account)) => account,
            Ok(None) => return ResultCode::NoSuchUser,
            Err(err) => {
                tracing::error!(error = %err, "account lookup failed");
                return ResultCode::DatabaseError;
            }
        };

        if account.confirmed {
            return ResultCode::RegistrationAlreadyConfirmed;
        }

        if account.registration_control_code.as_deref() != Some(control_code) {
            return ResultCode::InvalidRegistrationControlCode;
        }

        if let Err(err) = self.store.confirm_account(email).await {
            tracing::error!(error = %err, "confirmation write failed");
            return ResultCode::DatabaseError;
        }

        tracing::info!(id = account.id, "registration confirmed");
        ResultCode::Ok
    }

    /// Resend the registration email with the stored control code.
    ///
    /// The code is never regenerated, so links from earlier sends stay valid.
    pub async fn resend_registration_email(&self, email: &str) -> ResultCode {
        let account = match self.store.account_by_email(email).await {
            Ok(Some(account)) => account,
            Ok(None) => return ResultCode::NoSuchUser,
            Err(err) => {
                tracing::error!(error = %err, "account lookup failed");
                return ResultCode::DatabaseError;
            }
        };

        if account.confirmed {
            return ResultCode::RegistrationAlreadyConfirmed;
        }

        // Unconfirmed rows always carry a code.
        let Some(code) = account.registration_control_code.as_deref() else {
            tracing::error!(id = account.id, "unconfirmed account without control code");
            return ResultCode::DatabaseError;
        };

        if let Err(err) = self
            .notifier
            .send_registration(email, &account.name, account.id, code)
            .await
        {
            tracing::warn!(id = account.id, error = %err, "registration email not delivered");
            return ResultCode::FailedToSendEmail;
        }

        ResultCode::Ok
    }

    /// Abandon a registration by proving knowledge of the password.
    pub async fn cancel_registration(
        &self,
        id: i32,
        password: &str,
    ) -> ResultCode {
        let credential = match self.store.credential_by_id(id).await {
            Ok(Some(credential)) => credential,
            Ok(None) => return ResultCode::NoSuchUser,
            Err(err) => {
                tracing::error!(error = %err, "credential lookup failed");
                return ResultCode::DatabaseError;
            }
        };

        if !self.hasher.verify(password, &credential) {
            return ResultCode::InvalidCredentials;
        }

        if let Err(err) = self.store.delete_account(id).await {
            tracing::error!(error = %err, "account delete failed");
            return ResultCode::DatabaseError;
        }

        tracing::info!(id, "registration cancelled");
        ResultCode::Ok
    }

    /// Verify a password and bind the account to the session.
    ///
    /// `identifier` containing `@` is looked up as an email address,
    /// anything else as a display name. Both outcomes of the credential
    /// check append a [`LoginRecord`](crate::account::LoginRecord) with the
    /// caller-supplied address; a successful login additionally cancels
    /// every outstanding password-reset token for the account.
    pub async fn log_in(
        &self,
        identifier: &str,
        password: &str,
        address: IpAddr,
    ) -> ResultCode {
        let account = match self.lookup(identifier).await {
            Ok(Some(account)) => account,
            Ok(None) => return ResultCode::NoSuchUser,
            Err(err) => {
                tracing::error!(error = %err, "account lookup failed");
                return ResultCode::DatabaseError;
            }
        };

        if !account.confirmed {
            return ResultCode::RegistrationNotConfirmed;
        }

        if !self.hasher.verify(password, &account.credential) {
            if let Err(err) = self
                .store
                .record_login(Some(account.id), false, address)
                .await
            {
                tracing::warn!(id = account.id, error = %err, "failed login not recorded");
            }
            return ResultCode::InvalidCredentials;
        }

        if let Err(err) = self
            .store
            .record_login(Some(account.id), true, address)
            .await
        {
            tracing::error!(id = account.id, error = %err, "login record write failed");
            return ResultCode::DatabaseError;
        }

        if let Err(err) = self.store.cancel_reset_tokens(account.id).await {
            tracing::error!(id = account.id, error = %err, "reset token cancellation failed");
            return ResultCode::DatabaseError;
        }

        tracing::info!(id = account.id, "logged in");
        self.session.set_current(Some(account));
        ResultCode::Ok
    }

    /// Bind the session without a credential check.
    ///
    /// No login record is written and no reset tokens are cancelled. For
    /// trusted internal flows only, such as auto-login right after
    /// registration; never expose this to unauthenticated input.
    pub async fn log_in_without_password(&self, identifier: &str) -> ResultCode {
        let account = match self.lookup(identifier).await {
            Ok(Some(account)) => account,
            Ok(None) => return ResultCode::NoSuchUser,
            Err(err) => {
                tracing::error!(error = %err, "account lookup failed");
                return ResultCode::DatabaseError;
            }
        };

        if !account.confirmed {
            return ResultCode::RegistrationNotConfirmed;
        }

        tracing::info!(id = account.id, "logged in without password");
        self.session.set_current(Some(account));
        ResultCode::Ok
    }

    /// Clear the session binding. Always succeeds.
    pub fn log_out(&self) {
        self.session.set_current(None);
    }

    /// The account currently bound to the session.
    pub fn current_account(&self) -> Option<Account> {
        self.session.current()
    }

    /// Check a password against the stored credential.
    ///
    /// Returns false both for a missing credential and a mismatch; callers
    /// cannot tell the two apart through this call.
    pub async fn is_password_valid(&self, id: i32, password: &str) -> bool {
        match self.store.credential_by_id(id).await {
            Ok(Some(credential)) => self.hasher.verify(password, &credential),
            Ok(None) => false,
            Err(err) => {
                tracing::error!(error = %err, "credential lookup failed");
                false
            }
        }
    }

    /// Replace the credential after verifying the old password.
    pub async fn change_password(
        &self,
        id: i32,
        old_password: &str,
        new_password: &str,
    ) -> ResultCode {
        let credential = match self.store.credential_by_id(id).await {
            Ok(Some(credential)) => credential,
            Ok(None) => return ResultCode::NoSuchUser,
            Err(err) => {
                tracing::error!(error = %err, "credential lookup failed");
                return ResultCode::DatabaseError;
            }
        };

        if !self.hasher.verify(old_password, &credential) {
            return ResultCode::InvalidCredentials;
        }

        let fresh = self.hasher.create(new_password);
        if let Err(err) = self.store.set_credential(id, &fresh).await {
            tracing::error!(id, error = %err, "credential write failed");
            return ResultCode::DatabaseError;
        }

        tracing::info!(id, "password changed");
        ResultCode::Ok
    }

    /// Issue a password-reset token and mail its key.
    ///
    /// The token is persisted first; a delivery failure leaves it usable,
    /// reported as [`ResultCode::FailedToSendEmail`].
    pub async fn create_password_reset_token(&self, email: &str) -> ResultCode {
        let account_id = match self.store.id_by_email(email).await {
            Ok(Some(id)) => id,
            Ok(None) => return ResultCode::NoSuchUser,
            Err(err) => {
                tracing::error!(error = %err, "account lookup failed");
                return ResultCode::DatabaseError;
            }
        };

        let token = ResetToken {
            account_id,
            key: self.reset_keys.generate(),
            issued_at: self.clock.now(),
        };

        if let Err(err) = self.store.insert_reset_token(&token).await {
            tracing::error!(id = account_id, error = %err, "reset token insert failed");
            return ResultCode::DatabaseError;
        }

        tracing::info!(id = account_id, "password reset token issued");

        if let Err(err) = self.notifier.send_password_reset(email, &token.key).await {
            tracing::warn!(id = account_id, error = %err, "reset email not delivered");
            return ResultCode::FailedToSendEmail;
        }

        ResultCode::Ok
    }

    /// Set a new password using a previously issued reset token.
    ///
    /// A missing token, a stale token and a key mismatch all collapse into
    /// [`ResultCode::NoValidPasswordResetToken`]; which sub-condition failed
    /// is deliberately not revealed.
    pub async fn reset_password(
        &self,
        email: &str,
        token_key: &str,
        new_password: &str,
    ) -> ResultCode {
        let token = match self.store.newest_reset_token(email).await {
            Ok(token) => token,
            Err(err) => {
                tracing::error!(error = %err, "reset token lookup failed");
                return ResultCode::DatabaseError;
            }
        };

        if !self.is_token_usable(token.as_ref(), token_key) {
            return ResultCode::NoValidPasswordResetToken;
        }

        // The account may have been deleted since the token was issued.
        let account_id = match self.store.id_by_email(email).await {
            Ok(Some(id)) => id,
            Ok(None) => return ResultCode::NoSuchUser,
            Err(err) => {
                tracing::error!(error = %err, "account lookup failed");
                return ResultCode::DatabaseError;
            }
        };

        let fresh = self.hasher.create(new_password);
        if let Err(err) = self.store.set_credential(account_id, &fresh).await {
            tracing::error!(id = account_id, error = %err, "credential write failed");
            return ResultCode::DatabaseError;
        }

        tracing::info!(id = account_id, "password reset");
        ResultCode::Ok
    }

    /// Invalidate every outstanding reset token of an account.
    pub async fn cancel_password_reset_tokens(&self, id: i32) -> ResultCode {
        if let Err(err) = self.store.cancel_reset_tokens(id).await {
            tracing::error!(id, error = %err, "reset token cancellation failed");
            return ResultCode::DatabaseError;
        }

        ResultCode::Ok
    }

    /// Count registered accounts, optionally only those created after
    /// `since`. Returns `-1` when the store fails.
    pub async fn registered_account_count(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> i64 {
        match self.store.account_count(since).await {
            Ok(count) => count,
            Err(err) => {
                tracing::error!(error = %err, "account count failed");
                -1
            }
        }
    }

    /// Send a template with placeholder data to probe the delivery path.
    ///
    /// Returns whether the notifier reported successful delivery.
    pub async fn send_test_notification(
        &self,
        kind: EmailKind,
        email: &str,
    ) -> bool {
        let result = match kind {
            EmailKind::Registration => {
                self.notifier
                    .send_registration(
                        email,
                        "test",
                        UNASSIGNED_ID,
                        &self.control_codes.generate(),
                    )
                    .await
            }
            EmailKind::LostPassword => {
                self.notifier
                    .send_password_reset(email, &self.reset_keys.generate())
                    .await
            }
        };

        if let Err(err) = &result {
            tracing::warn!(?kind, error = %err, "test email not delivered");
        }

        result.is_ok()
    }

    async fn lookup(
        &self,
        identifier: &str,
    ) -> crate::error::Result<Option<Account>> {
        if identifier.contains('@') {
            self.store.account_by_email(identifier).await
        } else {
            self.store.account_by_name(identifier).await
        }
    }

    fn is_token_usable(&self, token: Option<&ResetToken>, key: &str) -> bool {
        let Some(token) = token else {
            return false;
        };

        let age = self.clock.now().signed_duration_since(token.issued_at);
        token.key == key && age <= self.reset_token_ttl
    }
}
