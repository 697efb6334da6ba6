//! Jobs service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;
use tracing::info;

use crate::domain::jobs::{
    data::{JobListLimit, NewJob},
    errors::JobsServiceError,
    records::{JobRecord, JobUuid},
    repository::PgJobsRepository,
};

#[derive(Debug, Clone)]
pub struct PgJobsService {
    pool: PgPool,
    repository: PgJobsRepository,
}

impl PgJobsService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            repository: PgJobsRepository::new(),
        }
    }
}

#[async_trait]
impl JobsService for PgJobsService {
    async fn create_job(&self, job: NewJob) -> Result<JobRecord, JobsServiceError> {
        let mut tx = self.pool.begin().await?;

        let created = self.repository.create_job(&mut tx, job).await?;

        tx.commit().await?;

        info!(job = %created.uuid, "created job");

        Ok(created)
    }

    async fn get_job(&self, job: JobUuid) -> Result<JobRecord, JobsServiceError> {
        let mut tx = self.pool.begin().await?;

        let job = self.repository.get_job(&mut tx, job).await?;

        tx.commit().await?;

        Ok(job)
    }

    async fn list_jobs(&self, limit: JobListLimit) -> Result<Vec<JobRecord>, JobsServiceError> {
        let mut tx = self.pool.begin().await?;

        let jobs = self.repository.list_jobs(&mut tx, limit).await?;

        tx.commit().await?;

        Ok(jobs)
    }

    async fn delete_job(&self, job: JobUuid) -> Result<(), JobsServiceError> {
        let mut tx = self.pool.begin().await?;

        let rows_affected = self.repository.delete_job(&mut tx, job).await?;

        if rows_affected == 0 {
            return Err(JobsServiceError::NotFound);
        }

        tx.commit().await?;

        info!(%job, "deleted job");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait JobsService: Send + Sync {
    /// Store a new active job.
    async fn create_job(&self, job: NewJob) -> Result<JobRecord, JobsServiceError>;

    /// Retrieve a single active job.
    async fn get_job(&self, job: JobUuid) -> Result<JobRecord, JobsServiceError>;

    /// Active jobs, newest first, at most `limit` of them.
    async fn list_jobs(&self, limit: JobListLimit) -> Result<Vec<JobRecord>, JobsServiceError>;

    /// Soft delete an active job.
    async fn delete_job(&self, job: JobUuid) -> Result<(), JobsServiceError>;
}
