//! Authentication interceptor.

use std::sync::Arc;

use jobrpc_app::auth::{AuthOutcome, AuthenticationError, RpcMethod};
use salvo::prelude::*;
use tracing::error;

use crate::{
    extensions::*,
    interceptors::HeaderMetadata,
    rpc::{RpcCode, RpcStatus},
    state::State,
};

#[handler]
pub(crate) async fn authenticate(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let state = match depot.obtain_or_500::<Arc<State>>() {
        Ok(state) => Arc::clone(state),
        Err(status) => return halt(&status, res, ctrl),
    };

    let method = match RpcMethod::parse(req.uri().path()) {
        Ok(method) => method,
        Err(source) => {
            return halt(
                &RpcStatus::not_found(format!("unknown method: {source}")),
                res,
                ctrl,
            );
        }
    };

    let outcome = state
        .app
        .authenticator
        .authenticate(&method, &HeaderMetadata::new(req.headers()))
        .await;

    match outcome {
        Ok(AuthOutcome::Authenticated(identity)) => {
            depot.inject(identity);
        }
        Ok(AuthOutcome::NoOpinion) => {}
        Err(error) => return halt(&into_rpc_status(&error), res, ctrl),
    }

    depot.inject(method);

    ctrl.call_next(req, depot, res).await;
}

fn halt(status: &RpcStatus, res: &mut Response, ctrl: &mut FlowCtrl) {
    status.render(res);
    ctrl.skip_rest();
}

pub(crate) fn into_rpc_status(error: &AuthenticationError) -> RpcStatus {
    match error {
        AuthenticationError::Invalid => {
            RpcStatus::new(RpcCode::Unauthenticated, AuthenticationError::Invalid.to_string())
        }
        AuthenticationError::DeadlineExceeded => {
            RpcStatus::new(RpcCode::DeadlineExceeded, "Deadline exceeded")
        }
        AuthenticationError::Store(source) => {
            error!("credential store failed during authentication: {source}");

            RpcStatus::internal()
        }
        AuthenticationError::UnusableSecret(source) => {
            error!("stored secret could not be verified: {source}");

            RpcStatus::internal()
        }
        AuthenticationError::Verification(source) => {
            error!("secret verification task failed: {source}");

            RpcStatus::internal()
        }
    }
}
