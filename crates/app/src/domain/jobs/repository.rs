//! Jobs Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::domain::jobs::{
    data::{JobListLimit, NewJob},
    records::{JobRecord, JobUuid},
};

const CREATE_JOB_SQL: &str = include_str!("sql/create_job.sql");
const GET_JOB_SQL: &str = include_str!("sql/get_job.sql");
const LIST_JOBS_SQL: &str = include_str!("sql/list_jobs.sql");
const DELETE_JOB_SQL: &str = include_str!("sql/delete_job.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgJobsRepository;

impl PgJobsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_job(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        job: NewJob,
    ) -> Result<JobRecord, sqlx::Error> {
        query_as::<Postgres, JobRow>(CREATE_JOB_SQL)
            .bind(job.uuid.into_uuid())
            .bind(job.name)
            .bind(job.description)
            .fetch_one(&mut **tx)
            .await
            .map(|row| row.0)
    }

    pub(crate) async fn get_job(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        job: JobUuid,
    ) -> Result<JobRecord, sqlx::Error> {
        query_as::<Postgres, JobRow>(GET_JOB_SQL)
            .bind(job.into_uuid())
            .fetch_one(&mut **tx)
            .await
            .map(|row| row.0)
    }

    pub(crate) async fn list_jobs(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        limit: JobListLimit,
    ) -> Result<Vec<JobRecord>, sqlx::Error> {
        let rows = query_as::<Postgres, JobRow>(LIST_JOBS_SQL)
            .bind(i64::from(limit.get()))
            .fetch_all(&mut **tx)
            .await?;

        Ok(rows.into_iter().map(|row| row.0).collect())
    }

    pub(crate) async fn delete_job(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        job: JobUuid,
    ) -> Result<u64, sqlx::Error> {
        let result = query(DELETE_JOB_SQL)
            .bind(job.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected())
    }
}

/// Raw `jobs` row, validated into a [`JobRecord`].
struct JobRow(JobRecord);

impl<'r> FromRow<'r, PgRow> for JobRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        JobRecord::new(
            JobUuid::from_uuid(row.try_get::<Uuid, _>("uuid")?),
            row.try_get("name")?,
            row.try_get("description")?,
            row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            row.try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        )
        .map(Self)
        .map_err(|error| sqlx::Error::Decode(Box::new(error)))
    }
}
