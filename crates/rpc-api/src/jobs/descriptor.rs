//! Method table and access rules for `jobs.v1.Jobs`.

use jobrpc_app::auth::{
    AccessPolicy, RpcMethod,
    policy::MethodPathError,
    records::{GroupName, RecordError},
};
use thiserror::Error;

use crate::rpc::CallKind;

pub(crate) const SERVICE: &str = "jobs.v1.Jobs";

pub(crate) const CREATE_JOB_PATH: &str = "/jobs.v1.Jobs/CreateJob";
pub(crate) const GET_JOB_PATH: &str = "/jobs.v1.Jobs/GetJob";
pub(crate) const GET_JOBS_PATH: &str = "/jobs.v1.Jobs/GetJobs";
pub(crate) const DELETE_JOB_PATH: &str = "/jobs.v1.Jobs/DeleteJob";

pub(crate) const JOB_READER: &str = "JobReader";
pub(crate) const JOB_WRITER: &str = "JobWriter";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MethodDescriptor {
    pub(crate) path: &'static str,
    pub(crate) kind: CallKind,
    pub(crate) required_group: &'static str,
}

impl MethodDescriptor {
    /// Last path segment, used as the route name.
    pub(crate) fn name(&self) -> &'static str {
        self.path.rsplit('/').next().unwrap_or(self.path)
    }
}

pub(crate) const METHODS: [MethodDescriptor; 4] = [
    MethodDescriptor {
        path: CREATE_JOB_PATH,
        kind: CallKind::Unary,
        required_group: JOB_WRITER,
    },
    MethodDescriptor {
        path: GET_JOB_PATH,
        kind: CallKind::Unary,
        required_group: JOB_READER,
    },
    MethodDescriptor {
        path: GET_JOBS_PATH,
        kind: CallKind::ServerStreaming,
        required_group: JOB_READER,
    },
    MethodDescriptor {
        path: DELETE_JOB_PATH,
        kind: CallKind::Unary,
        required_group: JOB_WRITER,
    },
];

#[derive(Debug, Error)]
pub(crate) enum DescriptorError {
    #[error(transparent)]
    Method(#[from] MethodPathError),

    #[error(transparent)]
    Group(#[from] RecordError),
}

/// Access rules for every method in [`METHODS`].
pub(crate) fn access_policy() -> Result<AccessPolicy, DescriptorError> {
    let mut builder = AccessPolicy::builder();

    for descriptor in METHODS {
        builder = builder.require_method_group(
            &RpcMethod::parse(descriptor.path)?,
            GroupName::parse(descriptor.required_group)?,
        );
    }

    Ok(builder.build())
}
