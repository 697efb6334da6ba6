//! Credential Records

use std::fmt::{Display, Formatter, Result as FmtResult};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use jiff::Timestamp;
use thiserror::Error;

use crate::uuids::TypedUuid;

/// Client UUID
pub type ClientUuid = TypedUuid<ClientRecord>;

/// Secret UUID
pub type SecretUuid = TypedUuid<SecretRecord>;

pub const API_KEY_MAX_CHARS: usize = 100;
pub const CLIENT_NAME_MAX_CHARS: usize = 200;
pub const SECRET_HASH_MAX_CHARS: usize = 200;
pub const SALT_MAX_CHARS: usize = 100;
pub const GROUP_NAME_MAX_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} must not be the nil uuid")]
    NilIdentifier { field: &'static str },

    #[error("{field} must be positive")]
    NonPositiveIdentifier { field: &'static str },

    #[error("{field} must be after the unix epoch")]
    UnsetTimestamp { field: &'static str },

    #[error("{field} must be standard base64")]
    NotBase64 { field: &'static str },

    #[error("expires_at must be after created_at")]
    ExpiresBeforeCreated,
}

pub(crate) fn require_text(field: &'static str, value: &str, max: usize) -> Result<(), RecordError> {
    if value.trim().is_empty() {
        return Err(RecordError::Empty { field });
    }

    if value.chars().count() > max {
        return Err(RecordError::TooLong { field, max });
    }

    Ok(())
}

pub(crate) fn require_timestamp(field: &'static str, value: Timestamp) -> Result<(), RecordError> {
    if value <= Timestamp::UNIX_EPOCH {
        return Err(RecordError::UnsetTimestamp { field });
    }

    Ok(())
}

/// Public client key carried in the `x-api-key` header.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiKey(String);

impl ApiKey {
    /// Validate and wrap an API key.
    ///
    /// # Errors
    ///
    /// Returns an error when the key is blank or longer than [`API_KEY_MAX_CHARS`].
    pub fn parse(value: impl Into<String>) -> Result<Self, RecordError> {
        let value = value.into();

        require_text("api_key", &value, API_KEY_MAX_CHARS)?;

        Ok(Self(value))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ApiKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// Name of a capability group. Comparisons at authorization time ignore case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupName(String);

impl GroupName {
    /// Validate and wrap a group name.
    ///
    /// # Errors
    ///
    /// Returns an error when the name is blank or longer than [`GROUP_NAME_MAX_CHARS`].
    pub fn parse(value: impl Into<String>) -> Result<Self, RecordError> {
        let value = value.into();

        require_text("group_name", &value, GROUP_NAME_MAX_CHARS)?;

        Ok(Self(value))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-folded form used as a lookup key.
    #[must_use]
    pub fn folded(&self) -> String {
        self.0.to_lowercase()
    }

    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        self.folded() == other.folded()
    }
}

impl Display for GroupName {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// Client Record
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct ClientRecord {
    pub uuid: ClientUuid,
    pub api_key: ApiKey,
    pub name: String,
    pub is_active: bool,
    pub created_at: Timestamp,
}

impl ClientRecord {
    /// Build a validated client record.
    ///
    /// # Errors
    ///
    /// Returns an error when the uuid is nil, the name is blank or too long, or
    /// `created_at` was never set.
    pub fn new(
        uuid: ClientUuid,
        api_key: ApiKey,
        name: impl Into<String>,
        is_active: bool,
        created_at: Timestamp,
    ) -> Result<Self, RecordError> {
        let name = name.into();

        if uuid.is_nil() {
            return Err(RecordError::NilIdentifier { field: "client_uuid" });
        }

        require_text("client_name", &name, CLIENT_NAME_MAX_CHARS)?;
        require_timestamp("created_at", created_at)?;

        Ok(Self {
            uuid,
            api_key,
            name,
            is_active,
            created_at,
        })
    }
}

/// Unvalidated secret attributes, checked by [`SecretRecord::new`].
#[derive(Debug, Clone)]
pub struct SecretFields {
    pub id: i64,
    pub uuid: SecretUuid,
    pub client_uuid: ClientUuid,
    pub secret_hash: String,
    pub salt: String,
    pub is_current: bool,
    pub created_at: Timestamp,
    pub expires_at: Option<Timestamp>,
}

/// Secret Record
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct SecretRecord {
    /// Insertion sequence, used to break creation-time ties.
    pub id: i64,
    pub uuid: SecretUuid,
    pub client_uuid: ClientUuid,
    pub secret_hash: String,
    pub salt: String,
    pub is_current: bool,
    pub created_at: Timestamp,
    pub expires_at: Option<Timestamp>,
}

impl SecretRecord {
    /// Build a validated secret record.
    ///
    /// # Errors
    ///
    /// Returns an error when any identifier is unset, the hash or salt are blank,
    /// too long or not base64, or the expiry does not follow creation.
    pub fn new(fields: SecretFields) -> Result<Self, RecordError> {
        if fields.id <= 0 {
            return Err(RecordError::NonPositiveIdentifier { field: "secret_id" });
        }

        if fields.uuid.is_nil() {
            return Err(RecordError::NilIdentifier { field: "secret_uuid" });
        }

        if fields.client_uuid.is_nil() {
            return Err(RecordError::NilIdentifier { field: "client_uuid" });
        }

        require_text("secret_hash", &fields.secret_hash, SECRET_HASH_MAX_CHARS)?;
        require_text("salt", &fields.salt, SALT_MAX_CHARS)?;

        if STANDARD.decode(&fields.salt).is_err() {
            return Err(RecordError::NotBase64 { field: "salt" });
        }

        require_timestamp("created_at", fields.created_at)?;

        if let Some(expires_at) = fields.expires_at
            && expires_at <= fields.created_at
        {
            return Err(RecordError::ExpiresBeforeCreated);
        }

        Ok(Self {
            id: fields.id,
            uuid: fields.uuid,
            client_uuid: fields.client_uuid,
            secret_hash: fields.secret_hash,
            salt: fields.salt,
            is_current: fields.is_current,
            created_at: fields.created_at,
            expires_at: fields.expires_at,
        })
    }

    /// Whether this secret may sign requests at `now`.
    #[must_use]
    pub fn is_usable_at(&self, now: Timestamp) -> bool {
        self.is_current && self.expires_at.is_none_or(|expires_at| expires_at > now)
    }
}

/// Group Record
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct GroupRecord {
    pub id: i32,
    pub name: GroupName,
}

impl GroupRecord {
    /// Build a validated group record.
    ///
    /// # Errors
    ///
    /// Returns an error when the id is not positive.
    pub fn new(id: i32, name: GroupName) -> Result<Self, RecordError> {
        if id <= 0 {
            return Err(RecordError::NonPositiveIdentifier { field: "group_id" });
        }

        Ok(Self { id, name })
    }
}

/// Client Group membership record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct ClientGroupRecord {
    pub client_uuid: ClientUuid,
    pub group_id: i32,
}

impl ClientGroupRecord {
    /// Build a validated membership record.
    ///
    /// # Errors
    ///
    /// Returns an error when either side of the membership is unset.
    pub fn new(client_uuid: ClientUuid, group_id: i32) -> Result<Self, RecordError> {
        if client_uuid.is_nil() {
            return Err(RecordError::NilIdentifier { field: "client_uuid" });
        }

        if group_id <= 0 {
            return Err(RecordError::NonPositiveIdentifier { field: "group_id" });
        }

        Ok(Self {
            client_uuid,
            group_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;
    use testresult::TestResult;
    use uuid::Uuid;

    use super::*;

    fn secret_fields(created_at: Timestamp) -> SecretFields {
        SecretFields {
            id: 1,
            uuid: SecretUuid::new(),
            client_uuid: ClientUuid::new(),
            secret_hash: "aGFzaA==".to_string(),
            salt: "c2FsdA==".to_string(),
            is_current: true,
            created_at,
            expires_at: None,
        }
    }

    #[test]
    fn api_key_rejects_blank_and_oversized_values() {
        assert_eq!(
            ApiKey::parse("   "),
            Err(RecordError::Empty { field: "api_key" })
        );
        assert_eq!(
            ApiKey::parse("k".repeat(API_KEY_MAX_CHARS + 1)),
            Err(RecordError::TooLong {
                field: "api_key",
                max: API_KEY_MAX_CHARS
            })
        );
        assert!(ApiKey::parse("k".repeat(API_KEY_MAX_CHARS)).is_ok());
    }

    #[test]
    fn group_names_match_ignoring_case() -> TestResult {
        let reader = GroupName::parse("JobReader")?;
        let lower = GroupName::parse("jobreader")?;

        assert!(reader.matches(&lower), "group match should ignore case");
        assert_ne!(reader, lower, "stored spelling should be preserved");

        Ok(())
    }

    #[test]
    fn group_name_limit_is_fifty_characters() {
        assert!(GroupName::parse("g".repeat(GROUP_NAME_MAX_CHARS)).is_ok());
        assert!(GroupName::parse("g".repeat(GROUP_NAME_MAX_CHARS + 1)).is_err());
    }

    #[test]
    fn client_record_rejects_nil_uuid() -> TestResult {
        let result = ClientRecord::new(
            ClientUuid::from_uuid(Uuid::nil()),
            ApiKey::parse("client")?,
            "Client",
            true,
            Timestamp::now(),
        );

        assert_eq!(
            result,
            Err(RecordError::NilIdentifier {
                field: "client_uuid"
            })
        );

        Ok(())
    }

    #[test]
    fn client_record_rejects_unset_creation_time() -> TestResult {
        let result = ClientRecord::new(
            ClientUuid::new(),
            ApiKey::parse("client")?,
            "Client",
            true,
            Timestamp::UNIX_EPOCH,
        );

        assert_eq!(
            result,
            Err(RecordError::UnsetTimestamp {
                field: "created_at"
            })
        );

        Ok(())
    }

    #[test]
    fn secret_record_requires_expiry_after_creation() {
        let created_at = Timestamp::now();
        let mut fields = secret_fields(created_at);

        fields.expires_at = Some(created_at);

        assert_eq!(
            SecretRecord::new(fields),
            Err(RecordError::ExpiresBeforeCreated)
        );
    }

    #[test]
    fn secret_record_rejects_oversized_salt() {
        let mut fields = secret_fields(Timestamp::now());

        fields.salt = "s".repeat(SALT_MAX_CHARS + 1);

        assert_eq!(
            SecretRecord::new(fields),
            Err(RecordError::TooLong {
                field: "salt",
                max: SALT_MAX_CHARS
            })
        );
    }

    #[test]
    fn secret_record_rejects_salt_that_is_not_base64() {
        let mut fields = secret_fields(Timestamp::now());

        fields.salt = "not base64!".to_string();

        assert_eq!(
            SecretRecord::new(fields),
            Err(RecordError::NotBase64 { field: "salt" })
        );
    }

    #[test]
    fn secret_usability_honours_flag_and_expiry() -> TestResult {
        let now = Timestamp::now();
        let created_at = now - SignedDuration::from_hours(2);

        let mut fields = secret_fields(created_at);
        fields.expires_at = Some(now + SignedDuration::from_secs(1));
        let valid = SecretRecord::new(fields.clone())?;

        fields.expires_at = Some(now);
        let expired = SecretRecord::new(fields.clone())?;

        fields.expires_at = None;
        fields.is_current = false;
        let retired = SecretRecord::new(fields)?;

        assert!(valid.is_usable_at(now), "unexpired current secret is usable");
        assert!(!expired.is_usable_at(now), "expiry boundary is exclusive");
        assert!(!retired.is_usable_at(now), "non-current secret is unusable");

        Ok(())
    }

    #[test]
    fn group_and_membership_ids_must_be_positive() -> TestResult {
        assert!(GroupRecord::new(0, GroupName::parse("JobReader")?).is_err());
        assert!(ClientGroupRecord::new(ClientUuid::new(), -1).is_err());
        assert!(ClientGroupRecord::new(ClientUuid::new(), 1).is_ok());

        Ok(())
    }
}
