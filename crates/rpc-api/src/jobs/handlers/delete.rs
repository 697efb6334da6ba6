//! Delete Job Handler

use std::sync::Arc;

use jobrpc_app::domain::jobs::data::JobId;
use salvo::prelude::*;

use crate::{
    extensions::*,
    jobs::{
        errors::{into_rpc_status, invalid_argument},
        messages::{Empty, JobRequest},
    },
    rpc::RpcStatus,
    state::State,
};

/// `DeleteJob`: soft delete an active job.
#[handler]
pub(crate) async fn handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    match delete_job(req, depot).await {
        Ok(response) => res.render(Json(response)),
        Err(status) => status.render(res),
    }
}

async fn delete_job(req: &mut Request, depot: &Depot) -> Result<Empty, RpcStatus> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request: JobRequest = req.parse_json().await.or_400("malformed request body")?;

    let job_id: JobId = request.job_id.parse().map_err(invalid_argument)?;

    state
        .app
        .jobs
        .delete_job(job_id.uuid())
        .await
        .map_err(into_rpc_status)?;

    Ok(Empty {})
}
