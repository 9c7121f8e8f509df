//! Session binding port.

use crate::account::Account;

/// Port binding the authenticated account to the current execution context.
///
/// How "current" is tracked across requests (cookie, task-local, thread
/// scope) is the implementor's concern; the manager only reads and replaces
/// the binding.
pub trait Session: Send + Sync {
    /// The currently bound account, if any.
    fn current(&self) -> Option<Account>;

    /// Replace the binding; `None` clears it.
    fn set_current(&self, account: Option<Account>);
}
