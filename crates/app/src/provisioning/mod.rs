//! Credential provisioning.
//!
//! Writes clients, secrets and group memberships. The request path only ever
//! reads them through [`crate::auth::CredentialStore`].

mod data;
mod errors;
mod repository;
mod seed;
mod service;

pub use data::*;
pub use errors::ProvisioningError;
pub use seed::{DEVELOPMENT_CLIENTS, INITIAL_JOB_UUID, SeedReport};
pub use service::ProvisioningService;
