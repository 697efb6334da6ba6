//! Provisioning service.

use jiff::Timestamp;
use sqlx::{PgPool, Postgres, Transaction};
use tokio::task::spawn_blocking;
use tracing::info;
use zeroize::Zeroizing;

use crate::{
    auth::{
        records::{
            ApiKey, CLIENT_NAME_MAX_CHARS, ClientGroupRecord, ClientRecord, ClientUuid, GroupName,
            SecretUuid, require_text,
        },
        secrets::{PlainSecret, SecretHasher, SecretHasherError, generate_salt, generate_secret},
    },
    provisioning::{
        data::{GroupGrant, IssuedSecret, NewClient, ProvisionedClient},
        errors::ProvisioningError,
        repository::{NewSecret, PgProvisioningRepository},
    },
};

/// Salted hash of a new secret, not yet bound to a client.
#[derive(Debug)]
struct PreparedSecret {
    secret_hash: String,
    salt: String,
    expires_at: Option<Timestamp>,
}

impl PreparedSecret {
    fn for_client(self, client_uuid: ClientUuid) -> NewSecret {
        NewSecret {
            uuid: SecretUuid::new(),
            client_uuid,
            secret_hash: self.secret_hash,
            salt: self.salt,
            expires_at: self.expires_at,
        }
    }
}

/// Writes credentials. Only operator tooling holds one of these.
#[derive(Debug, Clone)]
pub struct ProvisioningService {
    pool: PgPool,
    hasher: SecretHasher,
    pub(crate) repository: PgProvisioningRepository,
}

impl ProvisioningService {
    #[must_use]
    pub fn new(pool: PgPool, hasher: SecretHasher) -> Self {
        Self {
            pool,
            hasher,
            repository: PgProvisioningRepository::new(),
        }
    }

    pub(crate) fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create an active client with its first current secret.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisioningError::AlreadyExists`] when the key is taken, or
    /// a validation error for a blank name, blank secret or past expiry.
    pub async fn create_client(
        &self,
        client: NewClient,
    ) -> Result<ProvisionedClient, ProvisioningError> {
        require_text("name", &client.name, CLIENT_NAME_MAX_CHARS)?;

        let plaintext = plaintext(client.secret)?;
        let secret = self
            .prepare_secret(&plaintext, client.expires_at)
            .await?
            .for_client(ClientUuid::new());

        let mut tx = self.pool.begin().await?;

        let record = self
            .repository
            .insert_client(&mut tx, secret.client_uuid, &client.api_key, &client.name)
            .await?;

        let stored = self.repository.insert_secret(&mut tx, secret).await?;

        tx.commit().await?;

        info!(api_key = %record.api_key, "created api client");

        Ok(ProvisionedClient {
            client: record,
            secret: IssuedSecret {
                record: stored,
                plaintext,
            },
        })
    }

    /// Issue a new current secret, un-flagging the previous ones.
    ///
    /// Earlier secrets stay stored as history.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisioningError::ClientNotFound`] for an unknown key.
    pub async fn rotate_secret(
        &self,
        api_key: &ApiKey,
        secret: Option<String>,
        expires_at: Option<Timestamp>,
    ) -> Result<IssuedSecret, ProvisioningError> {
        let plaintext = plaintext(secret)?;
        let prepared = self.prepare_secret(&plaintext, expires_at).await?;

        let mut tx = self.pool.begin().await?;

        let client = self.require_client(&mut tx, api_key).await?;
        let secret = prepared.for_client(client.uuid);

        let retired = self
            .repository
            .retire_current_secrets(&mut tx, client.uuid)
            .await?;

        let stored = self.repository.insert_secret(&mut tx, secret).await?;

        tx.commit().await?;

        info!(api_key = %api_key, retired, "rotated api client secret");

        Ok(IssuedSecret {
            record: stored,
            plaintext,
        })
    }

    /// Make `api_key` a member of `group`, creating the group when needed.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisioningError::ClientNotFound`] for an unknown key.
    pub async fn grant_group(
        &self,
        api_key: &ApiKey,
        group: &GroupName,
    ) -> Result<GroupGrant, ProvisioningError> {
        let mut tx = self.pool.begin().await?;

        let client = self.require_client(&mut tx, api_key).await?;
        let group = self.repository.ensure_group(&mut tx, group).await?;

        let newly_granted = self
            .repository
            .insert_client_group(&mut tx, ClientGroupRecord::new(client.uuid, group.id)?)
            .await?;

        tx.commit().await?;

        info!(api_key = %api_key, group = %group.name, newly_granted, "granted api group");

        Ok(GroupGrant {
            group,
            newly_granted,
        })
    }

    async fn require_client(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        api_key: &ApiKey,
    ) -> Result<ClientRecord, ProvisioningError> {
        self.repository
            .find_client_by_key(tx, api_key)
            .await?
            .ok_or(ProvisioningError::ClientNotFound)
    }

    /// Hash on the blocking pool, before any transaction holds a connection.
    async fn prepare_secret(
        &self,
        plaintext: &PlainSecret,
        expires_at: Option<Timestamp>,
    ) -> Result<PreparedSecret, ProvisioningError> {
        if expires_at.is_some_and(|expires_at| expires_at <= Timestamp::now()) {
            return Err(ProvisioningError::ExpiryInPast);
        }

        let hasher = self.hasher;
        let plaintext = plaintext.clone();
        let salt = generate_salt();

        let (secret_hash, salt) = spawn_blocking(move || {
            let secret_hash = hasher.hash(plaintext.expose(), &salt)?;

            Ok::<_, SecretHasherError>((secret_hash, salt))
        })
        .await
        .map_err(ProvisioningError::HashTask)??;

        Ok(PreparedSecret {
            secret_hash,
            salt,
            expires_at,
        })
    }
}

/// Supplied secrets are trimmed the same way request headers are.
fn plaintext(secret: Option<String>) -> Result<PlainSecret, ProvisioningError> {
    let plaintext = secret.map_or_else(generate_secret, |secret| {
        PlainSecret::new(Zeroizing::new(secret).trim().to_owned())
    });

    if plaintext.expose().trim().is_empty() {
        return Err(ProvisioningError::EmptySecret);
    }

    Ok(plaintext)
}
