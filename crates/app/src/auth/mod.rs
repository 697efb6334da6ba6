//! Signed request authentication and group authorization.

pub mod authenticator;
pub mod gate;
pub mod headers;
pub mod identity;
pub mod policy;
pub mod records;
pub(crate) mod repository;
pub mod secrets;
pub mod selector;
pub mod signature;
pub mod store;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use authenticator::{
    AuthOutcome, AuthenticationError, Authenticator, AuthenticatorSettings,
};
pub use gate::{AuthorizationError, AuthorizationGate};
pub use headers::CallMetadata;
pub use identity::{AuthenticatedIdentity, GroupSet};
pub use policy::{AccessPolicy, RpcMethod};
pub use repository::PgCredentialStore;
pub use store::{CredentialStore, CredentialStoreError};
