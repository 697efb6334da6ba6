//! Health Probes

use std::sync::Arc;

use salvo::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    extensions::*,
    rpc::{RpcCode, RpcStatus},
    state::State,
};

/// Health probe response
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct HealthResponse {
    pub(crate) status: String,
}

impl HealthResponse {
    fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Liveness: the process is serving requests.
#[handler]
pub(crate) async fn live() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Readiness: the database answers.
#[handler]
pub(crate) async fn ready(depot: &mut Depot, res: &mut Response) {
    match check_ready(depot).await {
        Ok(response) => res.render(Json(response)),
        Err(status) => status.render(res),
    }
}

async fn check_ready(depot: &Depot) -> Result<HealthResponse, RpcStatus> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    state.app.health.check_database().await.map_err(|error| {
        warn!("readiness check failed: {error}");

        RpcStatus::new(RpcCode::Unavailable, "Database unavailable")
    })?;

    Ok(HealthResponse::ok())
}
