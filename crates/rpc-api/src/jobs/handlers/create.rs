//! Create Job Handler

use std::sync::Arc;

use jobrpc_app::domain::jobs::data::NewJob;
use salvo::prelude::*;

use crate::{
    extensions::*,
    jobs::{
        errors::{into_rpc_status, invalid_argument},
        messages::{JobCreateRequest, JobResponse},
    },
    rpc::RpcStatus,
    state::State,
};

/// `CreateJob`: store a new job.
#[handler]
pub(crate) async fn handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    match create_job(req, depot).await {
        Ok(response) => res.render(Json(response)),
        Err(status) => status.render(res),
    }
}

async fn create_job(req: &mut Request, depot: &Depot) -> Result<JobResponse, RpcStatus> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request: JobCreateRequest = req.parse_json().await.or_400("malformed request body")?;

    let job = NewJob::new(request.job_name, request.job_description).map_err(invalid_argument)?;

    let created = state
        .app
        .jobs
        .create_job(job)
        .await
        .map_err(into_rpc_status)?;

    Ok(JobResponse::created(created))
}
