//! Development seed data.

use tracing::info;
use uuid::Uuid;

use crate::{
    auth::records::{ApiKey, GroupName},
    domain::jobs::records::JobUuid,
    provisioning::{
        data::NewClient, errors::ProvisioningError, service::ProvisioningService,
    },
};

/// Initial job UUID.
pub const INITIAL_JOB_UUID: Uuid = Uuid::from_u128(0x1111_1111_1111_1111_1111_1111_1111_1111);

/// `(api key, secret, groups)` for each development client.
pub const DEVELOPMENT_CLIENTS: [(&str, &str, &[&str]); 3] = [
    (
        "test-client-001",
        "test-secret-001",
        &["JobAdmin", "JobReader", "JobWriter"],
    ),
    ("test-client-002", "test-secret-002", &["JobReader"]),
    ("test-client-003", "test-secret-003", &["JobWriter"]),
];

const INITIAL_JOB_NAME: &str = "Initial Job";
const INITIAL_JOB_DESCRIPTION: &str = "Seeded for local development";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub clients_created: usize,
    pub groups_granted: usize,
    pub job_created: bool,
}

impl ProvisioningService {
    /// Create the development clients, their groups and the initial job.
    ///
    /// Safe to run repeatedly; existing rows are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error when any write fails.
    pub async fn seed_development_data(&self) -> Result<SeedReport, ProvisioningError> {
        let mut report = SeedReport::default();

        for (key, secret, groups) in DEVELOPMENT_CLIENTS {
            let api_key = ApiKey::parse(key)?;

            let mut tx = self.pool().begin().await?;
            let existing = self.repository.find_client_by_key(&mut tx, &api_key).await?;
            tx.commit().await?;

            if existing.is_none() {
                self.create_client(NewClient {
                    api_key: api_key.clone(),
                    name: key.to_string(),
                    secret: Some(secret.to_string()),
                    expires_at: None,
                })
                .await?;

                report.clients_created += 1;
            }

            for group in groups {
                if self
                    .grant_group(&api_key, &GroupName::parse(*group)?)
                    .await?
                    .newly_granted
                {
                    report.groups_granted += 1;
                }
            }
        }

        let mut tx = self.pool().begin().await?;

        report.job_created = self
            .repository
            .seed_job(
                &mut tx,
                JobUuid::from_uuid(INITIAL_JOB_UUID),
                INITIAL_JOB_NAME,
                INITIAL_JOB_DESCRIPTION,
            )
            .await?;

        tx.commit().await?;

        info!(?report, "seeded development data");

        Ok(report)
    }
}
