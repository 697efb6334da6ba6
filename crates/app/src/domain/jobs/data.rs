//! Jobs Data

use std::str::FromStr;

use thiserror::Error;
use uuid::Uuid;

use crate::domain::jobs::records::{JOB_DESCRIPTION_MAX_CHARS, JOB_NAME_MAX_CHARS, JobUuid};

/// Largest page a caller may request from `GetJobs`.
pub const MAX_LIST_LIMIT: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} cannot exceed {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("job id is not a valid uuid")]
    MalformedJobId,

    #[error("job id cannot be the empty uuid")]
    EmptyJobId,

    #[error("limit must be between 1 and {MAX_LIST_LIMIT}")]
    LimitOutOfRange,
}

fn required_text(
    field: &'static str,
    value: String,
    max: usize,
) -> Result<String, JobValidationError> {
    let value = value.trim().to_string();

    if value.is_empty() {
        return Err(JobValidationError::Required { field });
    }

    if value.chars().count() > max {
        return Err(JobValidationError::TooLong { field, max });
    }

    Ok(value)
}

/// New Job Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJob {
    pub uuid: JobUuid,
    pub name: String,
    pub description: String,
}

impl NewJob {
    /// Validate a job name and description, assigning a fresh UUID.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first field that is blank or too long.
    pub fn new(name: String, description: String) -> Result<Self, JobValidationError> {
        Ok(Self {
            uuid: JobUuid::new(),
            name: required_text("job_name", name, JOB_NAME_MAX_CHARS)?,
            description: required_text(
                "job_description",
                description,
                JOB_DESCRIPTION_MAX_CHARS,
            )?,
        })
    }
}

/// Caller supplied job identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobId(JobUuid);

impl JobId {
    #[must_use]
    pub fn uuid(self) -> JobUuid {
        self.0
    }
}

impl FromStr for JobId {
    type Err = JobValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let uuid = Uuid::parse_str(value.trim()).map_err(|_ignored| JobValidationError::MalformedJobId)?;

        if uuid.is_nil() {
            return Err(JobValidationError::EmptyJobId);
        }

        Ok(Self(JobUuid::from_uuid(uuid)))
    }
}

/// Page size for listing jobs, within `1..=MAX_LIST_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobListLimit(u32);

impl JobListLimit {
    /// # Errors
    ///
    /// Returns an error when `limit` is zero, negative or above [`MAX_LIST_LIMIT`].
    pub fn new(limit: i64) -> Result<Self, JobValidationError> {
        u32::try_from(limit)
            .ok()
            .filter(|limit| (1..=MAX_LIST_LIMIT).contains(limit))
            .map(Self)
            .ok_or(JobValidationError::LimitOutOfRange)
    }

    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}
