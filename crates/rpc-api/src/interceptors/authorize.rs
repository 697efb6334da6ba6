//! Authorization interceptor.

use std::sync::Arc;

use jobrpc_app::auth::{AuthenticatedIdentity, AuthorizationError, RpcMethod};
use salvo::prelude::*;

use crate::{
    extensions::*,
    rpc::{RpcCode, RpcStatus},
    state::State,
};

/// Runs after [`super::authenticate`], which leaves the [`RpcMethod`] and any
/// identity in the depot.
#[handler]
pub(crate) async fn authorize(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let decision = depot.obtain_or_500::<Arc<State>>().and_then(|state| {
        let method = depot.obtain_or_500::<RpcMethod>()?;
        let identity = depot.obtain::<AuthenticatedIdentity>().ok();

        state
            .app
            .gate
            .check(method, identity)
            .map_err(into_rpc_status)
    });

    if let Err(status) = decision {
        status.render(res);
        ctrl.skip_rest();

        return;
    }

    ctrl.call_next(req, depot, res).await;
}

pub(crate) fn into_rpc_status(error: AuthorizationError) -> RpcStatus {
    match error {
        AuthorizationError::Unauthenticated => {
            RpcStatus::new(RpcCode::Unauthenticated, error.to_string())
        }
        AuthorizationError::PermissionDenied => {
            RpcStatus::new(RpcCode::PermissionDenied, error.to_string())
        }
    }
}
