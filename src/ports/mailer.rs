//! Interface for outbound notifications.

use async_trait::async_trait;

use crate::error::Result;

/// Port for sending account lifecycle messages.
///
/// An `Err` means the message was not delivered, nothing more: transport
/// details stay behind this boundary, and the manager reports the failure as
/// [`ResultCode::FailedToSendEmail`](crate::code::ResultCode::FailedToSendEmail)
/// without rolling back already-completed persistence.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send the registration message carrying the confirmation control code.
    async fn send_registration(
        &self,
        email: &str,
        name: &str,
        account_id: i32,
        control_code: &str,
    ) -> Result<()>;

    /// Send the lost-password message carrying the reset token key.
    async fn send_password_reset(
        &self,
        email: &str,
        token_key: &str,
    ) -> Result<()>;
}
