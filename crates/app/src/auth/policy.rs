//! RPC method paths and declared group requirements.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use thiserror::Error;

use crate::auth::records::GroupName;

/// Groups required by a method or service, in declaration order.
pub type Requirements = SmallVec<[GroupName; 2]>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("rpc method path must look like /package.Service/Method, got {0:?}")]
pub struct MethodPathError(String);

/// Fully qualified RPC method, e.g. `/jobs.v1.Jobs/GetJob`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RpcMethod {
    path: String,
    service: String,
    method: String,
}

impl RpcMethod {
    /// Parse a method path as presented by the transport.
    ///
    /// # Errors
    ///
    /// Returns an error unless the path is `/service/method` with both parts
    /// non-empty.
    pub fn parse(path: &str) -> Result<Self, MethodPathError> {
        let invalid = || MethodPathError(path.to_string());

        let (service, method) = path
            .strip_prefix('/')
            .and_then(|rest| rest.split_once('/'))
            .ok_or_else(invalid)?;

        if service.is_empty() || method.is_empty() || method.contains('/') {
            return Err(invalid());
        }

        Ok(Self {
            path: path.to_string(),
            service: service.to_string(),
            method: method.to_string(),
        })
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Fully qualified service name, e.g. `jobs.v1.Jobs`.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }
}

impl FromStr for RpcMethod {
    type Err = MethodPathError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl Display for RpcMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.path)
    }
}

/// Lookup table of group requirements, built once at startup.
///
/// A method-level declaration replaces the service-level one entirely. A
/// method with neither is open to every caller.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    services: FxHashMap<String, Requirements>,
    methods: FxHashMap<String, Requirements>,
}

impl AccessPolicy {
    #[must_use]
    pub fn builder() -> AccessPolicyBuilder {
        AccessPolicyBuilder::default()
    }

    #[must_use]
    pub fn requirements(&self, method: &RpcMethod) -> &[GroupName] {
        if let Some(required) = self.methods.get(method.path())
            && !required.is_empty()
        {
            return required;
        }

        self.services
            .get(method.service())
            .map_or(&[], SmallVec::as_slice)
    }

    #[must_use]
    pub fn requires_authentication(&self, method: &RpcMethod) -> bool {
        !self.requirements(method).is_empty()
    }
}

#[derive(Debug, Default)]
pub struct AccessPolicyBuilder {
    policy: AccessPolicy,
}

impl AccessPolicyBuilder {
    /// Require `group` for every method of `service` without its own declaration.
    #[must_use]
    pub fn require_service_group(mut self, service: &str, group: GroupName) -> Self {
        push_unique(
            self.policy.services.entry(service.to_string()).or_default(),
            group,
        );

        self
    }

    /// Require `group` for `method`, overriding any service-level declaration.
    #[must_use]
    pub fn require_method_group(mut self, method: &RpcMethod, group: GroupName) -> Self {
        push_unique(
            self.policy
                .methods
                .entry(method.path().to_string())
                .or_default(),
            group,
        );

        self
    }

    #[must_use]
    pub fn build(self) -> AccessPolicy {
        self.policy
    }
}

fn push_unique(requirements: &mut Requirements, group: GroupName) {
    if !requirements.iter().any(|existing| existing.matches(&group)) {
        requirements.push(group);
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn group(name: &str) -> GroupName {
        GroupName::parse(name).unwrap_or_else(|error| unreachable!("{error}"))
    }

    fn names(groups: &[GroupName]) -> Vec<&str> {
        groups.iter().map(GroupName::as_str).collect()
    }

    #[test]
    fn parses_fully_qualified_paths() -> TestResult {
        let method = RpcMethod::parse("/jobs.v1.Jobs/GetJob")?;

        assert_eq!(method.service(), "jobs.v1.Jobs");
        assert_eq!(method.method(), "GetJob");
        assert_eq!(method.to_string(), "/jobs.v1.Jobs/GetJob");

        Ok(())
    }

    #[test]
    fn rejects_malformed_paths() {
        for path in ["", "/", "jobs.v1.Jobs/GetJob", "/jobs.v1.Jobs", "/jobs.v1.Jobs/", "//GetJob", "/a/b/c"] {
            assert!(RpcMethod::parse(path).is_err(), "{path:?} should be rejected");
        }
    }

    #[test]
    fn method_declarations_override_service_declarations() -> TestResult {
        let get = RpcMethod::parse("/jobs.v1.Jobs/GetJob")?;
        let create = RpcMethod::parse("/jobs.v1.Jobs/CreateJob")?;

        let policy = AccessPolicy::builder()
            .require_service_group("jobs.v1.Jobs", group("JobAdmin"))
            .require_method_group(&get, group("JobReader"))
            .build();

        assert_eq!(names(policy.requirements(&get)), vec!["JobReader"]);
        assert_eq!(names(policy.requirements(&create)), vec!["JobAdmin"]);

        Ok(())
    }

    #[test]
    fn undeclared_methods_are_open() -> TestResult {
        let policy = AccessPolicy::builder()
            .require_service_group("jobs.v1.Jobs", group("JobReader"))
            .build();

        let other = RpcMethod::parse("/health.v1.Health/Check")?;

        assert!(policy.requirements(&other).is_empty());
        assert!(!policy.requires_authentication(&other));

        Ok(())
    }

    #[test]
    fn repeated_declarations_accumulate_without_duplicates() -> TestResult {
        let delete = RpcMethod::parse("/jobs.v1.Jobs/DeleteJob")?;

        let policy = AccessPolicy::builder()
            .require_method_group(&delete, group("JobWriter"))
            .require_method_group(&delete, group("JobAdmin"))
            .require_method_group(&delete, group("jobwriter"))
            .build();

        assert_eq!(names(policy.requirements(&delete)), vec!["JobWriter", "JobAdmin"]);
        assert!(policy.requires_authentication(&delete));

        Ok(())
    }
}
