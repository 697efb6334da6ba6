//! Credential fixtures for test suites.

use jiff::{SignedDuration, Timestamp};
use thiserror::Error;

use crate::auth::{
    headers::{API_KEY_HEADER, API_SECRET_HEADER, SIGNATURE_HEADER, TIMESTAMP_HEADER},
    identity::GroupSet,
    records::{
        ApiKey, ClientRecord, ClientUuid, GroupName, RecordError, SecretFields, SecretRecord,
        SecretUuid,
    },
    secrets::{SecretHasher, SecretHasherError, generate_salt},
    signature::{SignatureError, sign},
};

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Hash(#[from] SecretHasherError),

    #[error(transparent)]
    Signature(#[from] SignatureError),
}

/// A provisioned client together with the raw secret it signs with.
#[derive(Debug, Clone)]
pub struct CredentialFixture {
    pub client: ClientRecord,
    pub secret: SecretRecord,
    pub raw_secret: String,
    pub groups: GroupSet,
}

impl CredentialFixture {
    /// Build an active client whose current secret hashes `raw_secret`.
    ///
    /// # Errors
    ///
    /// Returns an error when any fixture value fails validation.
    pub fn new(
        hasher: &SecretHasher,
        key: &str,
        raw_secret: &str,
        groups: &[&str],
    ) -> Result<Self, FixtureError> {
        let created_at = Timestamp::now() - SignedDuration::from_hours(1);
        let client = ClientRecord::new(
            ClientUuid::new(),
            ApiKey::parse(key)?,
            format!("{key} client"),
            true,
            created_at,
        )?;

        let salt = generate_salt();
        let secret = SecretRecord::new(SecretFields {
            id: 1,
            uuid: SecretUuid::new(),
            client_uuid: client.uuid,
            secret_hash: hasher.hash(raw_secret, &salt)?,
            salt,
            is_current: true,
            created_at,
            expires_at: None,
        })?;

        let groups = groups
            .iter()
            .map(|name| GroupName::parse(*name))
            .collect::<Result<GroupSet, _>>()?;

        Ok(Self {
            client,
            secret,
            raw_secret: raw_secret.to_string(),
            groups,
        })
    }

    /// Header pairs for a call to `method_path` signed at `timestamp`.
    ///
    /// # Errors
    ///
    /// Returns an error when the signature cannot be computed.
    pub fn signed_headers(
        &self,
        method_path: &str,
        timestamp: i64,
    ) -> Result<Vec<(&'static str, String)>, FixtureError> {
        let timestamp = timestamp.to_string();
        let signature = sign(&self.raw_secret, method_path, &timestamp)?;

        Ok(vec![
            (API_KEY_HEADER, self.client.api_key.to_string()),
            (API_SECRET_HEADER, self.raw_secret.clone()),
            (TIMESTAMP_HEADER, timestamp),
            (SIGNATURE_HEADER, signature),
        ])
    }
}
