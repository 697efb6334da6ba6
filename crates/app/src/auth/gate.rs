//! Authorization gate.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::auth::{
    identity::AuthenticatedIdentity,
    policy::{AccessPolicy, RpcMethod},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    #[error("Unauthenticated")]
    Unauthenticated,

    #[error("Permission denied")]
    PermissionDenied,
}

/// Admits or denies a call against the declared group requirements.
#[derive(Debug, Clone)]
pub struct AuthorizationGate {
    policy: Arc<AccessPolicy>,
}

impl AuthorizationGate {
    #[must_use]
    pub fn new(policy: Arc<AccessPolicy>) -> Self {
        Self { policy }
    }

    /// Check that `identity` holds every group `method` requires.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorizationError::Unauthenticated`] when groups are required
    /// and no identity is attached, and [`AuthorizationError::PermissionDenied`]
    /// when any required group is missing.
    pub fn check(
        &self,
        method: &RpcMethod,
        identity: Option<&AuthenticatedIdentity>,
    ) -> Result<(), AuthorizationError> {
        let required = self.policy.requirements(method);

        if required.is_empty() {
            return Ok(());
        }

        let Some(identity) = identity else {
            info!(method = %method, "call requires groups but carries no identity");

            return Err(AuthorizationError::Unauthenticated);
        };

        if let Some(missing) = required.iter().find(|group| !identity.is_member_of(group)) {
            info!(
                method = %method,
                api_key = %identity.key,
                missing_group = %missing,
                "call denied"
            );

            return Err(AuthorizationError::PermissionDenied);
        }

        debug!(method = %method, api_key = %identity.key, "call admitted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::auth::records::{ApiKey, ClientUuid, GroupName};

    use super::*;

    fn group(name: &str) -> GroupName {
        GroupName::parse(name).unwrap_or_else(|error| unreachable!("{error}"))
    }

    fn identity(groups: &[&str]) -> AuthenticatedIdentity {
        AuthenticatedIdentity::new(
            ApiKey::parse("k1").unwrap_or_else(|error| unreachable!("{error}")),
            ClientUuid::new(),
            groups.iter().map(|name| group(name)).collect(),
        )
    }

    fn gate_requiring(method: &RpcMethod, groups: &[&str]) -> AuthorizationGate {
        let policy = groups.iter().fold(AccessPolicy::builder(), |builder, name| {
            builder.require_method_group(method, group(name))
        });

        AuthorizationGate::new(Arc::new(policy.build()))
    }

    #[test]
    fn every_required_group_must_be_held() -> TestResult {
        let method = RpcMethod::parse("/pkg.Jobs/GetJob")?;
        let gate = gate_requiring(&method, &["A", "B"]);

        assert_eq!(
            gate.check(&method, Some(&identity(&["A"]))),
            Err(AuthorizationError::PermissionDenied)
        );
        assert_eq!(gate.check(&method, Some(&identity(&["A", "B", "C"]))), Ok(()));

        Ok(())
    }

    #[test]
    fn open_methods_admit_anyone() -> TestResult {
        let method = RpcMethod::parse("/pkg.Jobs/GetJob")?;
        let gate = gate_requiring(&method, &[]);

        assert_eq!(gate.check(&method, None), Ok(()));
        assert_eq!(gate.check(&method, Some(&identity(&[]))), Ok(()));

        Ok(())
    }

    #[test]
    fn missing_identity_is_unauthenticated() -> TestResult {
        let method = RpcMethod::parse("/pkg.Jobs/CreateJob")?;
        let gate = gate_requiring(&method, &["JobWriter"]);

        assert_eq!(
            gate.check(&method, None),
            Err(AuthorizationError::Unauthenticated)
        );

        Ok(())
    }

    #[test]
    fn group_matching_ignores_case() -> TestResult {
        let method = RpcMethod::parse("/pkg.Jobs/CreateJob")?;
        let gate = gate_requiring(&method, &["JobWriter"]);

        assert_eq!(gate.check(&method, Some(&identity(&["JOBWRITER"]))), Ok(()));

        Ok(())
    }

    #[test]
    fn denial_message_does_not_name_the_group() {
        let rendered = AuthorizationError::PermissionDenied.to_string();

        assert_eq!(rendered, "Permission denied");
    }
}
