//! Closed outcome taxonomy returned by every manager operation.

use serde::Serialize;

/// Outcome of an [`AccountManager`](crate::manager::AccountManager) operation.
///
/// The set is closed on purpose: callers branch on these codes instead of
/// matching error types, and several negative conditions are deliberately
/// collapsed (`NoSuchUser` vs `InvalidCredentials` on lookup paths,
/// `NoValidPasswordResetToken` for missing, stale and mismatched tokens) so
/// responses do not reveal which sub-condition failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultCode {
    Ok,
    DatabaseError,
    EmailAlreadyRegistered,
    UserNameAlreadyRegistered,
    NoSuchUser,
    InvalidCredentials,
    FailedToSendEmail,
    NoValidPasswordResetToken,
    RegistrationNotConfirmed,
    RegistrationAlreadyConfirmed,
    InvalidRegistrationControlCode,
}

impl ResultCode {
    /// Whether the operation completed its state transition.
    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }
}
