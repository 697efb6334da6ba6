//! Auth Config

use std::time::Duration;

use clap::Args;
use jiff::SignedDuration;
use jobrpc_app::auth::{
    AuthenticatorSettings,
    secrets::{MIN_HASH_ITERATIONS, SecretHasher, SecretHasherError},
};

/// Signed request authentication settings.
#[derive(Debug, Args)]
pub struct AuthConfig {
    /// Accepted distance between a caller timestamp and the server clock, in seconds
    #[arg(long, env = "AUTH_CLOCK_SKEW_SECONDS", default_value_t = 300_u32)]
    pub clock_skew_seconds: u32,

    /// Upper bound on each credential lookup, in milliseconds
    #[arg(long, env = "AUTH_LOOKUP_TIMEOUT_MS", default_value_t = 5_000_u64)]
    pub lookup_timeout_ms: u64,

    /// PBKDF2 work factor of stored secrets
    #[arg(long, env = "SECRET_HASH_ITERATIONS", default_value_t = MIN_HASH_ITERATIONS)]
    pub secret_hash_iterations: u32,
}

impl AuthConfig {
    /// Build authenticator settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the hash work factor is below the minimum.
    pub fn settings(&self) -> Result<AuthenticatorSettings, SecretHasherError> {
        Ok(AuthenticatorSettings {
            clock_skew: SignedDuration::from_secs(i64::from(self.clock_skew_seconds)),
            lookup_timeout: Duration::from_millis(self.lookup_timeout_ms),
            hasher: SecretHasher::new(self.secret_hash_iterations)?,
        })
    }
}
