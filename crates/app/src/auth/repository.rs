//! Credential repository.

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query_as, query_scalar};
use uuid::Uuid;

use crate::auth::{
    identity::GroupSet,
    records::{
        ApiKey, ClientRecord, ClientUuid, GroupName, RecordError, SecretFields, SecretRecord,
    },
    store::{CredentialStore, CredentialStoreError},
};

const FIND_ACTIVE_CLIENT_BY_KEY_SQL: &str = include_str!("sql/find_active_client_by_key.sql");
const LIST_CURRENT_SECRETS_SQL: &str = include_str!("sql/list_current_secrets.sql");
const LIST_GROUP_NAMES_SQL: &str = include_str!("sql/list_group_names.sql");

/// Raw `api_clients` row, validated into a [`ClientRecord`].
pub(crate) struct ClientRow {
    uuid: Uuid,
    api_key: String,
    name: String,
    is_active: bool,
    created_at: SqlxTimestamp,
}

impl TryFrom<ClientRow> for ClientRecord {
    type Error = RecordError;

    fn try_from(row: ClientRow) -> Result<Self, Self::Error> {
        ClientRecord::new(
            ClientUuid::from_uuid(row.uuid),
            ApiKey::parse(row.api_key)?,
            row.name,
            row.is_active,
            row.created_at.to_jiff(),
        )
    }
}

impl<'r> FromRow<'r, PgRow> for ClientRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            api_key: row.try_get("api_key")?,
            name: row.try_get("name")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// Raw `api_client_secrets` row, validated into a [`SecretRecord`].
pub(crate) struct SecretRow {
    fields: SecretFields,
}

impl TryFrom<SecretRow> for SecretRecord {
    type Error = RecordError;

    fn try_from(row: SecretRow) -> Result<Self, Self::Error> {
        SecretRecord::new(row.fields)
    }
}

impl<'r> FromRow<'r, PgRow> for SecretRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            fields: SecretFields {
                id: row.try_get("id")?,
                uuid: row.try_get::<Uuid, _>("uuid")?.into(),
                client_uuid: row.try_get::<Uuid, _>("api_client_uuid")?.into(),
                secret_hash: row.try_get("secret_hash")?,
                salt: row.try_get("salt")?,
                is_current: row.try_get("is_current")?,
                created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
                expires_at: row
                    .try_get::<Option<SqlxTimestamp>, _>("expires_at")?
                    .map(SqlxTimestamp::to_jiff),
            },
        })
    }
}

/// `PostgreSQL`-backed credential store.
#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_active_client_by_key(
        &self,
        key: &ApiKey,
    ) -> Result<Option<ClientRecord>, CredentialStoreError> {
        let row = query_as::<Postgres, ClientRow>(FIND_ACTIVE_CLIENT_BY_KEY_SQL)
            .bind(key.as_str())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(ClientRecord::try_from).transpose()?)
    }

    async fn list_current_secrets(
        &self,
        key: &ApiKey,
    ) -> Result<Vec<SecretRecord>, CredentialStoreError> {
        let rows = query_as::<Postgres, SecretRow>(LIST_CURRENT_SECRETS_SQL)
            .bind(key.as_str())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(SecretRecord::try_from)
            .collect::<Result<_, _>>()?)
    }

    async fn list_group_names(
        &self,
        client: ClientUuid,
    ) -> Result<GroupSet, CredentialStoreError> {
        let names: Vec<String> = query_scalar(LIST_GROUP_NAMES_SQL)
            .bind(client.into_uuid())
            .fetch_all(&self.pool)
            .await?;

        Ok(names
            .into_iter()
            .map(GroupName::parse)
            .collect::<Result<_, _>>()?)
    }
}

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, Timestamp};
    use testresult::TestResult;

    use crate::{
        auth::secrets::SecretHasher,
        provisioning::{NewClient, ProvisioningService},
        test::TestDb,
    };

    use super::*;

    async fn provision(db: &TestDb, key: &str, groups: &[&str]) -> TestResult<ClientUuid> {
        let provisioning =
            ProvisioningService::new(db.pool().clone(), SecretHasher::insecure_for_tests());

        let created = provisioning
            .create_client(NewClient {
                api_key: ApiKey::parse(key)?,
                name: format!("{key} client"),
                secret: Some("s1".to_string()),
                expires_at: None,
            })
            .await?;

        for group in groups {
            provisioning
                .grant_group(&created.client.api_key, &GroupName::parse(*group)?)
                .await?;
        }

        Ok(created.client.uuid)
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for testcontainers"]
    async fn finds_only_active_clients() -> TestResult {
        let db = TestDb::new().await;
        let store = PgCredentialStore::new(db.pool().clone());
        let uuid = provision(&db, "k1", &[]).await?;

        let found = store
            .find_active_client_by_key(&ApiKey::parse("k1")?)
            .await?;

        assert_eq!(found.map(|client| client.uuid), Some(uuid));

        sqlx::query("UPDATE api_clients SET is_active = FALSE WHERE uuid = $1")
            .bind(uuid.into_uuid())
            .execute(db.pool())
            .await?;

        assert!(
            store
                .find_active_client_by_key(&ApiKey::parse("k1")?)
                .await?
                .is_none(),
            "inactive client should not be found"
        );

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for testcontainers"]
    async fn lists_current_secrets_newest_first() -> TestResult {
        let db = TestDb::new().await;
        let store = PgCredentialStore::new(db.pool().clone());
        provision(&db, "k1", &[]).await?;

        let provisioning =
            ProvisioningService::new(db.pool().clone(), SecretHasher::insecure_for_tests());
        let key = ApiKey::parse("k1")?;

        provisioning
            .rotate_secret(&key, Some("s2".to_string()), Some(Timestamp::now() + SignedDuration::from_hours(1)))
            .await?;

        let secrets = store.list_current_secrets(&key).await?;

        assert_eq!(secrets.len(), 1, "rotation un-flags the previous secret");
        assert!(secrets.iter().all(|secret| secret.is_current));
        assert!(secrets.first().and_then(|secret| secret.expires_at).is_some());

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for testcontainers"]
    async fn lists_group_names_for_client() -> TestResult {
        let db = TestDb::new().await;
        let store = PgCredentialStore::new(db.pool().clone());
        let uuid = provision(&db, "k1", &["JobReader", "JobWriter"]).await?;

        let groups = store.list_group_names(uuid).await?;

        assert_eq!(groups.sorted_names(), vec!["JobReader", "JobWriter"]);
        assert!(store.list_group_names(ClientUuid::new()).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for testcontainers"]
    async fn unknown_key_has_no_secrets() -> TestResult {
        let db = TestDb::new().await;
        let store = PgCredentialStore::new(db.pool().clone());

        assert!(store.list_current_secrets(&ApiKey::parse("missing")?).await?.is_empty());

        Ok(())
    }
}
