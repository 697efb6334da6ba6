//! Request and response messages, in proto3 JSON field naming.

use jobrpc_app::domain::jobs::{records::JobRecord, status};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JobCreateRequest {
    #[serde(default)]
    pub(crate) job_name: String,

    #[serde(default)]
    pub(crate) job_description: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JobRequest {
    #[serde(default)]
    pub(crate) job_id: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JobListOptions {
    #[serde(default)]
    pub(crate) limit: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JobResponse {
    pub(crate) job_id: String,
    pub(crate) job_name: String,
    pub(crate) job_description: String,
    pub(crate) status: String,
}

impl JobResponse {
    pub(crate) fn with_status(job: JobRecord, status: &str) -> Self {
        Self {
            job_id: job.uuid.to_string(),
            job_name: job.name,
            job_description: job.description,
            status: status.to_string(),
        }
    }

    pub(crate) fn created(job: JobRecord) -> Self {
        Self::with_status(job, status::CREATED_STATUS)
    }
}

impl From<JobRecord> for JobResponse {
    fn from(job: JobRecord) -> Self {
        Self::with_status(job, status::random_status())
    }
}

/// `google.protobuf.Empty`
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub(crate) struct Empty {}
