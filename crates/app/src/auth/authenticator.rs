//! Signed request authentication.

use std::{fmt, future::Future, sync::Arc, time::Duration};

use jiff::{SignedDuration, Timestamp};
use thiserror::Error;
use tokio::{task::JoinError, time::timeout};
use tracing::{debug, error, info, warn};
use zeroize::Zeroizing;

use crate::auth::{
    headers::{CallMetadata, RequestCredentials},
    identity::AuthenticatedIdentity,
    policy::{AccessPolicy, RpcMethod},
    records::{API_KEY_MAX_CHARS, ApiKey, SecretRecord},
    secrets::{SecretHasher, SecretHasherError},
    selector::SecretSelector,
    signature::{canonical_string, compute_signature, signatures_match},
    store::{CredentialStore, CredentialStoreError},
};

/// Maximum distance between the caller's timestamp and the server clock.
pub const DEFAULT_CLOCK_SKEW: SignedDuration = SignedDuration::from_mins(5);

/// Upper bound on each credential store lookup.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum AuthenticationError {
    /// Every credential check failure collapses into this variant.
    #[error("Invalid authentication")]
    Invalid,

    #[error("credential lookup deadline exceeded")]
    DeadlineExceeded,

    #[error("credential store failure")]
    Store(#[source] CredentialStoreError),

    /// The stored hash or salt cannot be used for verification.
    #[error("stored secret is unusable")]
    UnusableSecret(#[source] SecretHasherError),

    #[error("secret verification task failed")]
    Verification(#[source] JoinError),
}

/// Result of running the authenticator for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The method is open or the caller sent no signing headers.
    NoOpinion,

    Authenticated(AuthenticatedIdentity),
}

#[derive(Debug, Clone, Copy)]
pub struct AuthenticatorSettings {
    pub clock_skew: SignedDuration,
    pub lookup_timeout: Duration,
    pub hasher: SecretHasher,
}

impl Default for AuthenticatorSettings {
    fn default() -> Self {
        Self {
            clock_skew: DEFAULT_CLOCK_SKEW,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            hasher: SecretHasher::default(),
        }
    }
}

/// Resolves the caller of a signed call into an [`AuthenticatedIdentity`].
#[derive(Clone)]
pub struct Authenticator {
    store: Arc<dyn CredentialStore>,
    selector: SecretSelector,
    policy: Arc<AccessPolicy>,
    settings: AuthenticatorSettings,
}

impl Authenticator {
    #[must_use]
    pub fn new(
        store: Arc<dyn CredentialStore>,
        policy: Arc<AccessPolicy>,
        settings: AuthenticatorSettings,
    ) -> Self {
        Self {
            selector: SecretSelector::new(Arc::clone(&store)),
            store,
            policy,
            settings,
        }
    }

    /// Authenticate a call against the server clock.
    ///
    /// # Errors
    ///
    /// See [`Authenticator::authenticate_at`].
    pub async fn authenticate(
        &self,
        method: &RpcMethod,
        metadata: &(dyn CallMetadata + Sync),
    ) -> Result<AuthOutcome, AuthenticationError> {
        self.authenticate_at(method, metadata, Timestamp::now())
            .await
    }

    /// Authenticate a call as if the server clock read `now`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthenticationError::Invalid`] for any rejected credential,
    /// [`AuthenticationError::DeadlineExceeded`] when a lookup times out,
    /// [`AuthenticationError::Store`] when the credential store fails and
    /// [`AuthenticationError::UnusableSecret`] when the stored salt cannot be decoded.
    pub async fn authenticate_at(
        &self,
        method: &RpcMethod,
        metadata: &(dyn CallMetadata + Sync),
        now: Timestamp,
    ) -> Result<AuthOutcome, AuthenticationError> {
        if !self.policy.requires_authentication(method) {
            return Ok(AuthOutcome::NoOpinion);
        }

        let Some(credentials) = RequestCredentials::extract(metadata) else {
            debug!(method = %method, "signing headers absent");

            return Ok(AuthOutcome::NoOpinion);
        };

        let key = ApiKey::parse(credentials.key)
            .map_err(|_ignored| reject(credentials.key, method, "malformed api key"))?;

        let request_time = parse_timestamp(credentials.timestamp)
            .ok_or_else(|| reject(credentials.key, method, "malformed timestamp"))?;

        if now.duration_since(request_time).abs() > self.settings.clock_skew {
            return Err(reject(credentials.key, method, "timestamp outside skew window"));
        }

        let secret = self
            .lookup(&key, method, self.selector.find_current_secret(&key, now))
            .await?
            .ok_or_else(|| reject(credentials.key, method, "no current secret"))?;

        let client = self
            .lookup(&key, method, self.store.find_active_client_by_key(&key))
            .await?
            .ok_or_else(|| reject(credentials.key, method, "no active client"))?;

        if secret.client_uuid != client.uuid {
            return Err(reject(credentials.key, method, "secret owner mismatch"));
        }

        self.verify_possession(&key, method, credentials.secret, &secret)
            .await?;

        verify_signature(&key, method, &credentials)?;

        let groups = self
            .lookup(&key, method, self.store.list_group_names(client.uuid))
            .await?;

        info!(api_key = %key, method = %method, groups = groups.len(), "call authenticated");

        Ok(AuthOutcome::Authenticated(AuthenticatedIdentity::new(
            key,
            client.uuid,
            groups,
        )))
    }

    async fn lookup<T, F>(
        &self,
        key: &ApiKey,
        method: &RpcMethod,
        future: F,
    ) -> Result<T, AuthenticationError>
    where
        F: Future<Output = Result<T, CredentialStoreError>>,
    {
        match timeout(self.settings.lookup_timeout, future).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(source)) => {
                error!(api_key = %key, method = %method, "credential lookup failed: {source}");

                Err(AuthenticationError::Store(source))
            }
            Err(_elapsed) => {
                warn!(api_key = %key, method = %method, "credential lookup timed out");

                Err(AuthenticationError::DeadlineExceeded)
            }
        }
    }

    /// Prove the presented secret is the one whose hash is stored.
    async fn verify_possession(
        &self,
        key: &ApiKey,
        method: &RpcMethod,
        presented: &str,
        secret: &SecretRecord,
    ) -> Result<(), AuthenticationError> {
        let hasher = self.settings.hasher;
        let presented = Zeroizing::new(presented.to_owned());
        let salt = secret.salt.clone();
        let expected = secret.secret_hash.clone();

        let verified =
            tokio::task::spawn_blocking(move || hasher.verify(&presented, &salt, &expected))
                .await
                .map_err(AuthenticationError::Verification)?;

        match verified {
            Ok(true) => Ok(()),
            Ok(false) => Err(reject(key.as_str(), method, "presented secret does not match")),
            Err(source) => {
                error!(api_key = %key, method = %method, "stored secret is unusable: {source}");

                Err(AuthenticationError::UnusableSecret(source))
            }
        }
    }
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator")
            .field("policy", &self.policy)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// Bind the request to the invoked method with an HMAC keyed by the verified secret.
fn verify_signature(
    key: &ApiKey,
    method: &RpcMethod,
    credentials: &RequestCredentials<'_>,
) -> Result<(), AuthenticationError> {
    let canonical = canonical_string(method.path(), credentials.timestamp);

    let expected = compute_signature(credentials.secret, &canonical).map_err(|source| {
        warn!(api_key = %key, method = %method, "could not compute signature: {source}");

        AuthenticationError::Invalid
    })?;

    if !signatures_match(&expected, credentials.signature) {
        return Err(reject(key.as_str(), method, "signature mismatch"));
    }

    Ok(())
}

fn parse_timestamp(value: &str) -> Option<Timestamp> {
    let seconds = value.parse::<i64>().ok()?;

    Timestamp::from_second(seconds).ok()
}

/// Caller-supplied key cut to the longest valid key length.
fn loggable_key(key: &str) -> &str {
    key.char_indices()
        .nth(API_KEY_MAX_CHARS)
        .and_then(|(end, _)| key.get(..end))
        .unwrap_or(key)
}

fn reject(key: &str, method: &RpcMethod, reason: &'static str) -> AuthenticationError {
    info!(api_key = loggable_key(key), method = %method, reason, "authentication rejected");

    AuthenticationError::Invalid
}
