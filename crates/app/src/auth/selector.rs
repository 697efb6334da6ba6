//! Current secret selection.

use std::sync::Arc;

use jiff::Timestamp;

use crate::auth::{
    records::{ApiKey, SecretRecord},
    store::{CredentialStore, CredentialStoreError},
};

/// Pick the secret that signs requests at `now`.
///
/// Candidates must be flagged current and unexpired. The most recently created
/// one wins; equal creation times fall back to the later insertion.
pub fn select_current_secret<'a, I>(secrets: I, now: Timestamp) -> Option<&'a SecretRecord>
where
    I: IntoIterator<Item = &'a SecretRecord>,
{
    secrets
        .into_iter()
        .filter(|secret| secret.is_usable_at(now))
        .max_by_key(|secret| (secret.created_at, secret.id))
}

/// Resolves the current secret for an API key through a credential store.
#[derive(Clone)]
pub struct SecretSelector {
    store: Arc<dyn CredentialStore>,
}

impl SecretSelector {
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Find the secret currently valid for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the credential store lookup fails.
    pub async fn find_current_secret(
        &self,
        key: &ApiKey,
        now: Timestamp,
    ) -> Result<Option<SecretRecord>, CredentialStoreError> {
        let secrets = self.store.list_current_secrets(key).await?;

        Ok(select_current_secret(&secrets, now).cloned())
    }
}

impl std::fmt::Debug for SecretSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretSelector").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;
    use testresult::TestResult;

    use crate::auth::{
        records::{ClientUuid, SecretFields, SecretUuid},
        store::MockCredentialStore,
    };

    use super::*;

    fn secret(
        id: i64,
        created_at: Timestamp,
        expires_at: Option<Timestamp>,
        is_current: bool,
    ) -> SecretRecord {
        SecretRecord::new(SecretFields {
            id,
            uuid: SecretUuid::new(),
            client_uuid: ClientUuid::new(),
            secret_hash: format!("hash-{id}"),
            salt: "c2FsdDE=".to_string(),
            is_current,
            created_at,
            expires_at,
        })
        .unwrap_or_else(|error| unreachable!("fixture secret is valid: {error}"))
    }

    fn hours_ago(now: Timestamp, hours: i64) -> Timestamp {
        now - SignedDuration::from_hours(hours)
    }

    #[test]
    fn newest_current_secret_wins() {
        let now = Timestamp::now();
        let older = secret(1, hours_ago(now, 2), None, true);
        let newer = secret(2, hours_ago(now, 1), None, true);

        let selected = select_current_secret([&older, &newer], now);

        assert_eq!(selected.map(|s| s.id), Some(2));
    }

    #[test]
    fn expired_newest_secret_falls_back_to_next_valid() {
        let now = Timestamp::now();
        let older = secret(1, hours_ago(now, 3), None, true);
        let newest_expired = secret(2, hours_ago(now, 2), Some(hours_ago(now, 1)), true);

        let selected = select_current_secret([&older, &newest_expired], now);

        assert_eq!(selected.map(|s| s.id), Some(1));
    }

    #[test]
    fn no_usable_secret_selects_nothing() {
        let now = Timestamp::now();
        let expired = secret(1, hours_ago(now, 3), Some(hours_ago(now, 1)), true);
        let retired = secret(2, hours_ago(now, 2), None, false);

        assert!(select_current_secret([&expired, &retired], now).is_none());
        assert!(select_current_secret(std::iter::empty(), now).is_none());
    }

    #[test]
    fn creation_ties_break_on_insertion_order() {
        let now = Timestamp::now();
        let created_at = hours_ago(now, 1);
        let first = secret(7, created_at, None, true);
        let second = secret(8, created_at, None, true);

        let selected = select_current_secret([&second, &first], now);

        assert_eq!(selected.map(|s| s.id), Some(8));
    }

    #[tokio::test]
    async fn selector_reads_secrets_for_key() -> TestResult {
        let now = Timestamp::now();
        let key = ApiKey::parse("k1")?;
        let rows = vec![
            secret(1, hours_ago(now, 2), None, true),
            secret(2, hours_ago(now, 1), None, true),
        ];

        let mut store = MockCredentialStore::new();

        store
            .expect_list_current_secrets()
            .once()
            .withf(|key| key.as_str() == "k1")
            .return_once(move |_| Ok(rows));

        let selected = SecretSelector::new(Arc::new(store))
            .find_current_secret(&key, now)
            .await?;

        assert_eq!(selected.map(|s| s.id), Some(2));

        Ok(())
    }
}
