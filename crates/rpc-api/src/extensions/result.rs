//! Result helper extensions for RPC handlers.

use std::fmt::Display;

use tracing::debug;

use crate::rpc::RpcStatus;

pub(crate) trait ResultExt<T> {
    /// Map any error to `invalid_argument` with a fixed caller-facing message.
    fn or_400(self, message: &str) -> Result<T, RpcStatus>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Display,
{
    fn or_400(self, message: &str) -> Result<T, RpcStatus> {
        self.map_err(|error| {
            debug!("{message}: {error}");

            RpcStatus::invalid_argument(message)
        })
    }
}
