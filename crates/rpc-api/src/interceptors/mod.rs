//! Call interceptors: authentication then authorization, ahead of every handler.

#[path = "authenticate.rs"]
mod authenticate_interceptor;
#[path = "authorize.rs"]
mod authorize_interceptor;
mod metadata;

pub(crate) use authenticate_interceptor::authenticate;
pub(crate) use authorize_interceptor::authorize;
pub(crate) use metadata::HeaderMetadata;
