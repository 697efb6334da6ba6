//! Secret hashing at rest and secret generation.

use std::fmt;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use pbkdf2::pbkdf2_hmac_array;
use rand::{RngCore, rngs::OsRng};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;
use zeroize::Zeroize;

/// Minimum PBKDF2 work factor accepted for stored secrets.
pub const MIN_HASH_ITERATIONS: u32 = 210_000;

/// Salt length in bytes before encoding.
pub const SALT_BYTES: usize = 32;

/// Raw secret length in bytes before hex encoding.
pub const SECRET_BYTES: usize = 32;

const HASH_BYTES: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SecretHasherError {
    #[error("hash iterations must be at least {MIN_HASH_ITERATIONS}, got {0}")]
    TooFewIterations(u32),

    #[error("stored salt is not valid base64")]
    InvalidSalt(#[source] base64::DecodeError),
}

/// PBKDF2-HMAC-SHA-256 hasher producing base64 digests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretHasher {
    iterations: u32,
}

impl Default for SecretHasher {
    fn default() -> Self {
        Self {
            iterations: MIN_HASH_ITERATIONS,
        }
    }
}

impl SecretHasher {
    /// Create a hasher with the given work factor.
    ///
    /// # Errors
    ///
    /// Returns an error when `iterations` is below [`MIN_HASH_ITERATIONS`].
    pub fn new(iterations: u32) -> Result<Self, SecretHasherError> {
        if iterations < MIN_HASH_ITERATIONS {
            return Err(SecretHasherError::TooFewIterations(iterations));
        }

        Ok(Self { iterations })
    }

    /// Cheap hasher for test suites only.
    #[cfg(any(test, feature = "test-support"))]
    #[must_use]
    pub fn insecure_for_tests() -> Self {
        Self { iterations: 1_000 }
    }

    #[must_use]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Derive the base64 hash of `secret` under a base64-encoded `salt`.
    ///
    /// # Errors
    ///
    /// Returns an error when `salt` is not valid base64.
    pub fn hash(&self, secret: &str, salt: &str) -> Result<String, SecretHasherError> {
        let salt = STANDARD
            .decode(salt)
            .map_err(SecretHasherError::InvalidSalt)?;

        let mut derived =
            pbkdf2_hmac_array::<Sha256, HASH_BYTES>(secret.as_bytes(), &salt, self.iterations);

        let encoded = STANDARD.encode(derived);

        derived.zeroize();

        Ok(encoded)
    }

    /// Check that `secret` hashes to `expected_hash` under `salt`.
    ///
    /// # Errors
    ///
    /// Returns an error when the stored salt cannot be decoded.
    pub fn verify(
        &self,
        secret: &str,
        salt: &str,
        expected_hash: &str,
    ) -> Result<bool, SecretHasherError> {
        let computed = self.hash(secret, salt)?;

        Ok(computed.as_bytes().ct_eq(expected_hash.as_bytes()).into())
    }
}

/// Plaintext secret, shown once to the operator and wiped on drop.
#[derive(Clone)]
pub struct PlainSecret(String);

impl PlainSecret {
    #[must_use]
    pub fn new(value: String) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PlainSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PlainSecret(**redacted**)")
    }
}

impl Drop for PlainSecret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Random base64 salt.
#[must_use]
pub fn generate_salt() -> String {
    let mut salt = [0_u8; SALT_BYTES];

    OsRng.fill_bytes(&mut salt);

    STANDARD.encode(salt)
}

/// Random hex secret.
#[must_use]
pub fn generate_secret() -> PlainSecret {
    let mut bytes = [0_u8; SECRET_BYTES];

    OsRng.fill_bytes(&mut bytes);

    let secret = PlainSecret(hex::encode(bytes));

    bytes.zeroize();

    secret
}
