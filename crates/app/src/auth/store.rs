//! Credential store contract.

use async_trait::async_trait;
use mockall::automock;
use sqlx::Error;
use thiserror::Error;

use crate::auth::{
    identity::GroupSet,
    records::{ApiKey, ClientRecord, ClientUuid, RecordError, SecretRecord},
};

#[derive(Debug, Error)]
pub enum CredentialStoreError {
    #[error("storage error")]
    Sql(#[source] Error),

    #[error("stored credential failed validation")]
    InvalidRecord(#[source] RecordError),
}

impl From<Error> for CredentialStoreError {
    fn from(error: Error) -> Self {
        Self::Sql(error)
    }
}

impl From<RecordError> for CredentialStoreError {
    fn from(error: RecordError) -> Self {
        Self::InvalidRecord(error)
    }
}

/// Read-only view over client, secret and group records.
#[automock]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Find the client owning `key`, provided it is active.
    async fn find_active_client_by_key(
        &self,
        key: &ApiKey,
    ) -> Result<Option<ClientRecord>, CredentialStoreError>;

    /// List every secret flagged current for the active client owning `key`.
    async fn list_current_secrets(
        &self,
        key: &ApiKey,
    ) -> Result<Vec<SecretRecord>, CredentialStoreError>;

    /// List the groups a client belongs to.
    async fn list_group_names(&self, client: ClientUuid)
    -> Result<GroupSet, CredentialStoreError>;
}
