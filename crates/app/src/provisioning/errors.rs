//! Provisioning errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;
use tokio::task::JoinError;

use crate::auth::{records::RecordError, secrets::SecretHasherError};

#[derive(Debug, Error)]
pub enum ProvisioningError {
    #[error("client already exists")]
    AlreadyExists,

    #[error("client not found")]
    ClientNotFound,

    #[error("secret cannot be empty")]
    EmptySecret,

    #[error("secret expiry must be in the future")]
    ExpiryInPast,

    #[error("invalid data")]
    InvalidData,

    #[error("invalid record")]
    Record(#[from] RecordError),

    #[error("secret hashing failed")]
    Hash(#[from] SecretHasherError),

    #[error("secret hashing task failed")]
    HashTask(#[source] JoinError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for ProvisioningError {
    fn from(error: Error) -> Self {
        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::CheckViolation | ErrorKind::NotNullViolation) => Self::InvalidData,
            Some(ErrorKind::ForeignKeyViolation) => Self::ClientNotFound,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
