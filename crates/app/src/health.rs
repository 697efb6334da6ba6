//! Readiness probes.

use async_trait::async_trait;
use mockall::automock;
use sqlx::{PgPool, query_scalar};

#[automock]
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Confirm the database answers a trivial query.
    async fn check_database(&self) -> Result<(), sqlx::Error>;
}

#[derive(Debug, Clone)]
pub struct PgHealthCheck {
    pool: PgPool,
}

impl PgHealthCheck {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthCheck for PgHealthCheck {
    async fn check_database(&self) -> Result<(), sqlx::Error> {
        query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_one| ())
    }
}
