//! `jobs.v1.Jobs` service.

pub(crate) mod descriptor;
mod errors;
mod handlers;
mod messages;

pub(crate) use handlers::{create, delete, get, list};
