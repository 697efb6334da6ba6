//! RPC status codes and error rendering.

use salvo::{
    http::{StatusCode, header::HeaderValue},
    prelude::{Json, Response},
};
use serde::Serialize;

use super::RPC_STATUS_HEADER;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum RpcCode {
    InvalidArgument,
    Unauthenticated,
    PermissionDenied,
    NotFound,
    AlreadyExists,
    DeadlineExceeded,
    Unavailable,
    Internal,
}

impl RpcCode {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid_argument",
            Self::Unauthenticated => "unauthenticated",
            Self::PermissionDenied => "permission_denied",
            Self::NotFound => "not_found",
            Self::AlreadyExists => "already_exists",
            Self::DeadlineExceeded => "deadline_exceeded",
            Self::Unavailable => "unavailable",
            Self::Internal => "internal",
        }
    }

    pub(crate) fn http_status(self) -> StatusCode {
        match self {
            Self::InvalidArgument => StatusCode::BAD_REQUEST,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::AlreadyExists => StatusCode::CONFLICT,
            Self::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// A failed call: code plus caller-safe message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct RpcStatus {
    pub(crate) code: RpcCode,
    pub(crate) message: String,
}

#[derive(Debug, Serialize)]
pub(super) struct ErrorBody<'a> {
    pub(super) error: &'a RpcStatus,
}

impl RpcStatus {
    pub(crate) fn new(code: RpcCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(RpcCode::InvalidArgument, message)
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self::new(RpcCode::NotFound, message)
    }

    pub(crate) fn internal() -> Self {
        Self::new(RpcCode::Internal, "Internal error")
    }

    /// Write status code, `x-rpc-status` and a `{"error": ...}` body.
    pub(crate) fn render(&self, res: &mut Response) {
        res.status_code(self.code.http_status());
        res.headers_mut().insert(
            RPC_STATUS_HEADER,
            HeaderValue::from_static(self.code.as_str()),
        );
        res.render(Json(ErrorBody { error: self }));
    }
}
