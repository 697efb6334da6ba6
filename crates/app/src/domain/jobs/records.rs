//! Job Records

use jiff::Timestamp;

use crate::{
    auth::records::{RecordError, require_text, require_timestamp},
    uuids::TypedUuid,
};

/// Job UUID
pub type JobUuid = TypedUuid<JobRecord>;

pub const JOB_NAME_MAX_CHARS: usize = 100;
pub const JOB_DESCRIPTION_MAX_CHARS: usize = 200;

/// Job Record
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct JobRecord {
    pub uuid: JobUuid,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl JobRecord {
    /// Build a validated job record.
    ///
    /// # Errors
    ///
    /// Returns an error for a nil uuid, blank or oversized text, or an unset
    /// creation time.
    pub fn new(
        uuid: JobUuid,
        name: String,
        description: String,
        created_at: Timestamp,
        deleted_at: Option<Timestamp>,
    ) -> Result<Self, RecordError> {
        if uuid.is_nil() {
            return Err(RecordError::NilIdentifier { field: "job_uuid" });
        }

        require_text("job_name", &name, JOB_NAME_MAX_CHARS)?;
        require_text("job_description", &description, JOB_DESCRIPTION_MAX_CHARS)?;
        require_timestamp("created_at", created_at)?;

        Ok(Self {
            uuid,
            name,
            description,
            is_active: deleted_at.is_none(),
            created_at,
            deleted_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;
    use testresult::TestResult;

    use super::*;

    fn created_at() -> Timestamp {
        Timestamp::UNIX_EPOCH + SignedDuration::from_hours(1)
    }

    #[test]
    fn deleted_jobs_are_inactive() -> TestResult {
        let live = JobRecord::new(JobUuid::new(), "n".into(), "d".into(), created_at(), None)?;
        let gone = JobRecord::new(
            JobUuid::new(),
            "n".into(),
            "d".into(),
            created_at(),
            Some(created_at()),
        )?;

        assert!(live.is_active);
        assert!(!gone.is_active);

        Ok(())
    }

    #[test]
    fn invalid_rows_are_rejected() {
        assert_eq!(
            JobRecord::new(JobUuid::from_uuid(uuid::Uuid::nil()), "n".into(), "d".into(), created_at(), None),
            Err(RecordError::NilIdentifier { field: "job_uuid" })
        );
        assert_eq!(
            JobRecord::new(JobUuid::new(), "n".into(), " ".into(), created_at(), None),
            Err(RecordError::Empty { field: "job_description" })
        );
        assert_eq!(
            JobRecord::new(JobUuid::new(), "x".repeat(101), "d".into(), created_at(), None),
            Err(RecordError::TooLong {
                field: "job_name",
                max: JOB_NAME_MAX_CHARS
            })
        );
    }
}
