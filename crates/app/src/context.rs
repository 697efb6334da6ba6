//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AccessPolicy, Authenticator, AuthenticatorSettings, AuthorizationGate, PgCredentialStore},
    database,
    domain::jobs::{JobsService, PgJobsService},
    health::{HealthCheck, PgHealthCheck},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub jobs: Arc<dyn JobsService>,
    pub authenticator: Authenticator,
    pub gate: AuthorizationGate,
    pub health: Arc<dyn HealthCheck>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("authenticator", &self.authenticator)
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(
        url: &str,
        policy: AccessPolicy,
        settings: AuthenticatorSettings,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        let policy = Arc::new(policy);

        Ok(Self {
            jobs: Arc::new(PgJobsService::new(pool.clone())),
            authenticator: Authenticator::new(
                Arc::new(PgCredentialStore::new(pool.clone())),
                Arc::clone(&policy),
                settings,
            ),
            gate: AuthorizationGate::new(policy),
            health: Arc::new(PgHealthCheck::new(pool)),
        })
    }
}
