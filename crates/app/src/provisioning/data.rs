//! Provisioning Data

use jiff::Timestamp;

use crate::auth::{
    records::{ApiKey, ClientRecord, GroupRecord, SecretRecord},
    secrets::PlainSecret,
};

/// New client payload. A secret is generated when none is given.
#[derive(Debug, Clone)]
pub struct NewClient {
    pub api_key: ApiKey,
    pub name: String,
    pub secret: Option<String>,
    pub expires_at: Option<Timestamp>,
}

/// A stored secret together with its one-time plaintext.
#[derive(Debug, Clone)]
pub struct IssuedSecret {
    pub record: SecretRecord,
    pub plaintext: PlainSecret,
}

/// Result of creating a client.
#[derive(Debug, Clone)]
pub struct ProvisionedClient {
    pub client: ClientRecord,
    pub secret: IssuedSecret,
}

/// Result of granting a group.
#[derive(Debug, Clone)]
pub struct GroupGrant {
    pub group: GroupRecord,
    pub newly_granted: bool,
}
