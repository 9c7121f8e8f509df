//! Account entities as exchanged with the storage port.

use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Marker for accounts not yet persisted.
pub const UNASSIGNED_ID: i32 = -1;

/// A user identity and its held credential.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Stable numeric identifier, [`UNASSIGNED_ID`] until inserted.
    pub id: i32,
    /// Display name, unique among active accounts.
    pub name: String,
    /// Email address, unique among active accounts.
    pub email: String,
    /// One-time code proving receipt of the registration email.
    /// Present only while the registration is unconfirmed.
    #[serde(skip)]
    pub registration_control_code: Option<String>,
    pub confirmed: bool,
    #[serde(skip)]
    pub credential: Credential,
}

/// Salted one-way digest of a password.
///
/// Replaced wholesale on password change or reset, never mutated in place.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    /// Hex-encoded SHA-256 digest.
    pub hash: String,
    /// Hex-encoded random salt, generated fresh per credential.
    pub salt: String,
}

/// Time-boxed opaque key authorizing a single password reset.
///
/// Several tokens may accumulate per account; only the newest one for an
/// email is eligible, and every successful login or reset cancels all of
/// them at once.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResetToken {
    pub account_id: i32,
    pub key: String,
    pub issued_at: DateTime<Utc>,
}

/// Immutable audit entry for a credential check.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoginRecord {
    /// Absent when the attempt failed before the account was identified.
    pub account_id: Option<i32>,
    pub at: DateTime<Utc>,
    pub address: IpAddr,
    pub success: bool,
}

/// Notification template selector for diagnostic sends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailKind {
    Registration,
    LostPassword,
}
