//! Get Job Handler

use std::sync::Arc;

use jobrpc_app::domain::jobs::data::JobId;
use salvo::prelude::*;

use crate::{
    extensions::*,
    jobs::{
        errors::{into_rpc_status, invalid_argument},
        messages::{JobRequest, JobResponse},
    },
    rpc::RpcStatus,
    state::State,
};

/// `GetJob`: fetch one active job.
#[handler]
pub(crate) async fn handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    match get_job(req, depot).await {
        Ok(response) => res.render(Json(response)),
        Err(status) => status.render(res),
    }
}

async fn get_job(req: &mut Request, depot: &Depot) -> Result<JobResponse, RpcStatus> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request: JobRequest = req.parse_json().await.or_400("malformed request body")?;

    let job_id: JobId = request.job_id.parse().map_err(invalid_argument)?;

    let job = state
        .app
        .jobs
        .get_job(job_id.uuid())
        .await
        .map_err(into_rpc_status)?;

    Ok(JobResponse::from(job))
}

#[cfg(test)]
mod tests {
    use jobrpc_app::domain::jobs::{
        JobsServiceError, MockJobsService, records::JobUuid, status::STATUSES,
    };
    use salvo::test::ResponseExt;
    use serde_json::{Value, json};
    use testresult::TestResult;

    use crate::{
        jobs::descriptor::GET_JOB_PATH,
        test_helpers::{make_job, signed_post, writer_service},
    };

    use super::*;

    #[tokio::test]
    async fn test_get_returns_job_with_a_known_status() -> TestResult {
        let uuid = JobUuid::new();
        let mut jobs = MockJobsService::new();

        jobs.expect_get_job()
            .once()
            .withf(move |requested| *requested == uuid)
            .return_once(|uuid| Ok(make_job(uuid, "Cook")));

        let mut res = signed_post(GET_JOB_PATH, &json!({"jobId": uuid.to_string()}))?
            .send(&writer_service(jobs))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: JobResponse = res.take_json().await?;

        assert_eq!(body.job_id, uuid.to_string());
        assert_eq!(body.job_name, "Cook");
        assert!(
            STATUSES.contains(&body.status.as_str()),
            "unexpected status {}",
            body.status
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_get_missing_job_returns_404() -> TestResult {
        let mut jobs = MockJobsService::new();

        jobs.expect_get_job()
            .once()
            .return_once(|_| Err(JobsServiceError::NotFound));

        let mut res = signed_post(
            GET_JOB_PATH,
            &json!({"jobId": JobUuid::new().to_string()}),
        )?
        .send(&writer_service(jobs))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        let body: Value = res.take_json().await?;

        assert_eq!(body["error"]["code"], "not_found");

        Ok(())
    }

    #[tokio::test]
    async fn test_get_malformed_id_returns_400() -> TestResult {
        for job_id in ["not-a-uuid", "", "00000000-0000-0000-0000-000000000000"] {
            let mut jobs = MockJobsService::new();

            jobs.expect_get_job().never();

            let res = signed_post(GET_JOB_PATH, &json!({"jobId": job_id}))?
                .send(&writer_service(jobs))
                .await;

            assert_eq!(
                res.status_code,
                Some(StatusCode::BAD_REQUEST),
                "job id {job_id:?} should be rejected"
            );
        }

        Ok(())
    }
}
