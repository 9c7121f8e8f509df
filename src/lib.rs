//! Usergate is a lightweight account lifecycle manager behind swappable
//! storage, notification and session ports.

#[forbid(unsafe_code)]
#[deny(unused_mut)]
pub mod account;
pub mod code;
pub mod config;
pub mod crypto;
pub mod error;
pub mod manager;
pub mod ports;
pub mod telemetry;

pub use account::{Account, Credential, EmailKind, LoginRecord, ResetToken};
pub use code::ResultCode;
pub use config::Configuration;
pub use manager::AccountManager;
