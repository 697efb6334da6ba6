//! List Jobs Handler

use std::sync::Arc;

use jobrpc_app::domain::jobs::data::JobListLimit;
use salvo::prelude::*;

use crate::{
    extensions::*,
    jobs::{
        errors::{into_rpc_status, invalid_argument},
        messages::{JobListOptions, JobResponse},
    },
    rpc::{RpcStatus, ndjson_frames, render_stream},
    state::State,
};

/// `GetJobs`: stream active jobs, newest first, one frame per job.
///
/// Errors raised before the first frame are returned as an ordinary status.
#[handler]
pub(crate) async fn handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    match list_jobs(req, depot).await {
        Ok(jobs) => render_stream(res, ndjson_frames(jobs)),
        Err(status) => status.render(res),
    }
}

async fn list_jobs(req: &mut Request, depot: &Depot) -> Result<Vec<JobResponse>, RpcStatus> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let options: JobListOptions = req.parse_json().await.or_400("malformed request body")?;

    let limit = JobListLimit::new(options.limit).map_err(invalid_argument)?;

    let jobs = state
        .app
        .jobs
        .list_jobs(limit)
        .await
        .map_err(into_rpc_status)?;

    Ok(jobs.into_iter().map(JobResponse::from).collect())
}

#[cfg(test)]
mod tests {
    use jobrpc_app::domain::jobs::{MockJobsService, records::JobUuid};
    use salvo::{http::header::CONTENT_TYPE, test::ResponseExt};
    use serde_json::{Value, json};
    use testresult::TestResult;

    use crate::{
        jobs::descriptor::GET_JOBS_PATH,
        test_helpers::{make_job, signed_post, writer_service},
    };

    use super::*;

    #[tokio::test]
    async fn test_list_streams_one_line_per_job_in_service_order() -> TestResult {
        let mut jobs = MockJobsService::new();

        jobs.expect_list_jobs()
            .once()
            .withf(|limit| limit.get() == 2)
            .return_once(|_| {
                Ok(vec![
                    make_job(JobUuid::new(), "third"),
                    make_job(JobUuid::new(), "second"),
                ])
            });

        let mut res = signed_post(GET_JOBS_PATH, &json!({"limit": 2}))?
            .send(&writer_service(jobs))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(
            res.headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok()),
            Some("application/x-ndjson")
        );

        let body = res.take_string().await?;
        let names = body
            .lines()
            .map(|line| {
                let frame: Value = serde_json::from_str(line)?;

                Ok(frame["result"]["jobName"].as_str().unwrap_or_default().to_string())
            })
            .collect::<TestResult<Vec<_>>>()?;

        assert_eq!(names, vec!["third", "second"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_list_with_no_jobs_has_empty_body() -> TestResult {
        let mut jobs = MockJobsService::new();

        jobs.expect_list_jobs().once().return_once(|_| Ok(Vec::new()));

        let mut res = signed_post(GET_JOBS_PATH, &json!({"limit": 10}))?
            .send(&writer_service(jobs))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, "");

        Ok(())
    }

    #[tokio::test]
    async fn test_list_limit_out_of_range_returns_400() -> TestResult {
        for limit in [0, -5, 101] {
            let mut jobs = MockJobsService::new();

            jobs.expect_list_jobs().never();

            let mut res = signed_post(GET_JOBS_PATH, &json!({"limit": limit}))?
                .send(&writer_service(jobs))
                .await;

            assert_eq!(
                res.status_code,
                Some(StatusCode::BAD_REQUEST),
                "limit {limit} should be rejected"
            );

            let body: Value = res.take_json().await?;

            assert_eq!(body["error"]["message"], "limit must be between 1 and 100");
        }

        Ok(())
    }
}
