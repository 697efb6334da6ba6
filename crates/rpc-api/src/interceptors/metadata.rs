//! Header access for the authenticator.

use jobrpc_app::auth::CallMetadata;
use salvo::http::HeaderMap;

/// Request headers viewed as call metadata.
#[derive(Debug, Clone, Copy)]
pub(crate) struct HeaderMetadata<'a>(&'a HeaderMap);

impl<'a> HeaderMetadata<'a> {
    pub(crate) fn new(headers: &'a HeaderMap) -> Self {
        Self(headers)
    }
}

impl CallMetadata for HeaderMetadata<'_> {
    fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name)?.to_str().ok()
    }
}
