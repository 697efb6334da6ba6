//! Job Errors

use jobrpc_app::domain::jobs::{JobsServiceError, data::JobValidationError};
use tracing::error;

use crate::rpc::{RpcCode, RpcStatus};

pub(crate) fn into_rpc_status(error: JobsServiceError) -> RpcStatus {
    match error {
        JobsServiceError::NotFound => RpcStatus::not_found("Job not found"),
        JobsServiceError::AlreadyExists => RpcStatus::new(RpcCode::AlreadyExists, "Job already exists"),
        JobsServiceError::MissingRequiredData | JobsServiceError::InvalidData => {
            RpcStatus::invalid_argument("Invalid job payload")
        }
        JobsServiceError::Sql(source) => {
            error!("jobs storage failed: {source}");

            RpcStatus::internal()
        }
    }
}

pub(crate) fn invalid_argument(error: JobValidationError) -> RpcStatus {
    RpcStatus::invalid_argument(error.to_string())
}
