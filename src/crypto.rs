//! Credential hashing and opaque token generation.

use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

use crate::account::Credential;

/// Derives and verifies salted SHA-256 credentials.
///
/// The digest is `sha256(salt_bytes || plaintext_bytes)` in lowercase hex,
/// where the salt is itself a hex string of `salt_length` random bytes.
/// Verification compares digests case-insensitively; stored hashes may use
/// either case.
pub struct PasswordHasher {
    salt_length: usize,
}

impl PasswordHasher {
    /// Create a new [`PasswordHasher`] with the given salt byte length.
    pub fn new(salt_length: usize) -> Self {
        Self { salt_length }
    }

    /// Digest a plaintext with an explicit salt.
    pub fn hash(&self, plaintext: &str, salt: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(plaintext.as_bytes());

        hex::encode(hasher.finalize())
    }

    /// Derive a fresh [`Credential`] with a newly generated salt.
    pub fn create(&self, plaintext: &str) -> Credential {
        let salt = random_hex(self.salt_length);
        let hash = self.hash(plaintext, &salt);

        Credential { hash, salt }
    }

    /// Recompute the digest with the stored salt and compare.
    pub fn verify(&self, plaintext: &str, credential: &Credential) -> bool {
        self.hash(plaintext, &credential.salt)
            .eq_ignore_ascii_case(&credential.hash)
    }
}

/// Produces unguessable opaque identifiers for registration control codes
/// and password-reset keys.
pub struct TokenGenerator {
    byte_length: usize,
}

impl TokenGenerator {
    /// Create a new [`TokenGenerator`] emitting `byte_length * 2` hex chars.
    pub fn new(byte_length: usize) -> Self {
        Self { byte_length }
    }

    /// Generate a fresh opaque key.
    pub fn generate(&self) -> String {
        random_hex(self.byte_length)
    }
}

fn random_hex(byte_length: usize) -> String {
    let mut bytes = vec![0u8; byte_length];
    OsRng.fill_bytes(&mut bytes);

    hex::encode(bytes)
}
