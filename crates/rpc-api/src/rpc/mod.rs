//! RPC-over-HTTP conventions shared by every service.

mod status;
mod stream;

pub(crate) use status::{RpcCode, RpcStatus};
pub(crate) use stream::{ndjson_frames, render_stream};

/// Response header carrying the RPC status name of a failed call.
pub(crate) const RPC_STATUS_HEADER: &str = "x-rpc-status";

/// Shape of a method's response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CallKind {
    /// One JSON document.
    Unary,

    /// Newline-delimited JSON, one frame per item.
    ServerStreaming,
}

impl CallKind {
    pub(crate) fn content_type(self) -> &'static str {
        match self {
            Self::Unary => "application/json; charset=utf-8",
            Self::ServerStreaming => "application/x-ndjson",
        }
    }
}
