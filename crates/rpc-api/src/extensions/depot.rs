//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::Depot;

use crate::rpc::RpcStatus;

/// Helpers for mapping depot extraction failures to RPC errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, RpcStatus>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, RpcStatus> {
        self.obtain::<T>().map_err(|_ignored| {
            tracing::error!(
                "depot is missing {}; check the router hoops",
                std::any::type_name::<T>()
            );

            RpcStatus::internal()
        })
    }
}
