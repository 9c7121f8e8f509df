//! Configuration manager for usergate.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const DEFAULT_CONFIG_PATH: &str = "usergate.yaml";

const DEFAULT_RESET_TOKEN_TTL_SECS: u64 = 1800;
const DEFAULT_CONTROL_CODE_LENGTH: usize = 16;
const DEFAULT_RESET_KEY_LENGTH: usize = 16;
const DEFAULT_SALT_LENGTH: usize = 32;

/// Tunable constants of the account state machine.
///
/// Each field has an enumerated effect: the reset window bounds token
/// freshness in [`reset_password`](crate::manager::AccountManager::reset_password),
/// the byte lengths size the generated hex strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Seconds a password-reset token stays usable after issuance.
    pub reset_token_ttl_secs: u64,
    /// Random bytes behind a registration control code.
    pub control_code_length: usize,
    /// Random bytes behind a password-reset key.
    pub reset_key_length: usize,
    /// Random bytes behind a credential salt.
    pub salt_length: usize,
    #[serde(skip)]
    path: PathBuf,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            reset_token_ttl_secs: DEFAULT_RESET_TOKEN_TTL_SECS,
            control_code_length: DEFAULT_CONTROL_CODE_LENGTH,
            reset_key_length: DEFAULT_RESET_KEY_LENGTH,
            salt_length: DEFAULT_SALT_LENGTH,
            path: PathBuf::default(),
        }
    }
}

impl Configuration {
    /// Update the file path read by [`Configuration::read`].
    pub fn path(mut self, path: PathBuf) -> Self {
        self.path = path;
        self
    }

    /// Read the `usergate.yaml` file from the specified path or the default
    /// location, falling back to defaults when missing or malformed.
    pub fn read(self) -> Self {
        let file_path = if self.path.is_file() {
            &self.path
        } else {
            &Path::new(DEFAULT_CONFIG_PATH).to_path_buf()
        };

        match File::open(file_path) {
            Ok(file) => match serde_yaml::from_reader(file) {
                Ok(config) => config,
                Err(err) => self.error(err),
            },
            Err(err) => self.error(err),
        }
    }

    /// Return a default configuration as fallback.
    fn error(&self, err: impl std::error::Error) -> Self {
        tracing::error!(error = %err, "`usergate.yaml` file not readable");
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Configuration::default();

        assert_eq!(config.reset_token_ttl_secs, 1800);
        assert_eq!(config.control_code_length, 16);
        assert_eq!(config.reset_key_length, 16);
        assert_eq!(config.salt_length, 32);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: Configuration =
            serde_yaml::from_str("reset_token_ttl_secs: 900").unwrap();

        assert_eq!(config.reset_token_ttl_secs, 900);
        assert_eq!(config.salt_length, 32);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = Configuration::default()
            .path(PathBuf::from("/nonexistent/usergate.yaml"))
            .read();

        assert_eq!(config, Configuration::default());
    }
}
