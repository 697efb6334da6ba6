//! Provisioning Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    auth::{
        records::{
            ApiKey, ClientGroupRecord, ClientRecord, ClientUuid, GroupName, GroupRecord,
            SecretRecord, SecretUuid,
        },
        repository::{ClientRow, SecretRow},
    },
    domain::jobs::records::JobUuid,
    provisioning::errors::ProvisioningError,
};

const INSERT_CLIENT_SQL: &str = include_str!("sql/insert_client.sql");
const FIND_CLIENT_BY_KEY_SQL: &str = include_str!("sql/find_client_by_key.sql");
const RETIRE_CURRENT_SECRETS_SQL: &str = include_str!("sql/retire_current_secrets.sql");
const INSERT_SECRET_SQL: &str = include_str!("sql/insert_secret.sql");
const ENSURE_GROUP_SQL: &str = include_str!("sql/ensure_group.sql");
const FIND_GROUP_BY_NAME_SQL: &str = include_str!("sql/find_group_by_name.sql");
const INSERT_CLIENT_GROUP_SQL: &str = include_str!("sql/insert_client_group.sql");
const SEED_JOB_SQL: &str = include_str!("sql/seed_job.sql");

/// Hashed secret ready to be stored.
#[derive(Debug, Clone)]
pub(crate) struct NewSecret {
    pub(crate) uuid: SecretUuid,
    pub(crate) client_uuid: ClientUuid,
    pub(crate) secret_hash: String,
    pub(crate) salt: String,
    pub(crate) expires_at: Option<Timestamp>,
}

struct GroupRow {
    id: i32,
    name: String,
}

impl<'r> FromRow<'r, PgRow> for GroupRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProvisioningRepository;

impl PgProvisioningRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn insert_client(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: ClientUuid,
        api_key: &ApiKey,
        name: &str,
    ) -> Result<ClientRecord, ProvisioningError> {
        let row = query_as::<Postgres, ClientRow>(INSERT_CLIENT_SQL)
            .bind(uuid.into_uuid())
            .bind(api_key.as_str())
            .bind(name)
            .fetch_one(&mut **tx)
            .await?;

        Ok(ClientRecord::try_from(row)?)
    }

    pub(crate) async fn find_client_by_key(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        api_key: &ApiKey,
    ) -> Result<Option<ClientRecord>, ProvisioningError> {
        let row = query_as::<Postgres, ClientRow>(FIND_CLIENT_BY_KEY_SQL)
            .bind(api_key.as_str())
            .fetch_optional(&mut **tx)
            .await?;

        Ok(row.map(ClientRecord::try_from).transpose()?)
    }

    pub(crate) async fn retire_current_secrets(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        client: ClientUuid,
    ) -> Result<u64, ProvisioningError> {
        let result = query(RETIRE_CURRENT_SECRETS_SQL)
            .bind(client.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected())
    }

    pub(crate) async fn insert_secret(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        secret: NewSecret,
    ) -> Result<SecretRecord, ProvisioningError> {
        let row = query_as::<Postgres, SecretRow>(INSERT_SECRET_SQL)
            .bind(secret.uuid.into_uuid())
            .bind(secret.client_uuid.into_uuid())
            .bind(secret.secret_hash)
            .bind(secret.salt)
            .bind(secret.expires_at.map(SqlxTimestamp::from))
            .fetch_one(&mut **tx)
            .await?;

        Ok(SecretRecord::try_from(row)?)
    }

    /// Look a group up case-insensitively, creating it first when absent.
    pub(crate) async fn ensure_group(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        name: &GroupName,
    ) -> Result<GroupRecord, ProvisioningError> {
        query(ENSURE_GROUP_SQL)
            .bind(name.as_str())
            .execute(&mut **tx)
            .await?;

        let row = query_as::<Postgres, GroupRow>(FIND_GROUP_BY_NAME_SQL)
            .bind(name.as_str())
            .fetch_one(&mut **tx)
            .await?;

        Ok(GroupRecord::new(row.id, GroupName::parse(row.name)?)?)
    }

    /// Returns `false` when the membership already existed.
    pub(crate) async fn insert_client_group(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        membership: ClientGroupRecord,
    ) -> Result<bool, ProvisioningError> {
        let result = query(INSERT_CLIENT_GROUP_SQL)
            .bind(membership.client_uuid.into_uuid())
            .bind(membership.group_id)
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    pub(crate) async fn seed_job(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: JobUuid,
        name: &str,
        description: &str,
    ) -> Result<bool, ProvisioningError> {
        let result = query(SEED_JOB_SQL)
            .bind(uuid.into_uuid())
            .bind(name)
            .bind(description)
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}
