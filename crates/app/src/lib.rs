//! Jobs RPC application core: credentials, authentication, authorization and
//! the jobs domain, independent of any transport.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;
pub mod health;
pub mod provisioning;
pub mod uuids;

#[cfg(test)]
mod test;
