//! Signed request headers.

use std::{
    collections::HashMap,
    fmt,
    hash::BuildHasher,
};

pub const API_KEY_HEADER: &str = "x-api-key";
pub const API_SECRET_HEADER: &str = "x-api-secret";
pub const TIMESTAMP_HEADER: &str = "x-timestamp";
pub const SIGNATURE_HEADER: &str = "x-signature";

/// Read access to a call's inbound metadata. Names are lowercase.
pub trait CallMetadata {
    fn get(&self, name: &str) -> Option<&str>;
}

impl<S: BuildHasher> CallMetadata for HashMap<String, String, S> {
    fn get(&self, name: &str) -> Option<&str> {
        HashMap::get(self, name).map(String::as_str)
    }
}

/// The four signing headers, all present and non-empty.
#[derive(Clone, Copy)]
pub(crate) struct RequestCredentials<'a> {
    pub(crate) key: &'a str,
    pub(crate) secret: &'a str,
    pub(crate) timestamp: &'a str,
    pub(crate) signature: &'a str,
}

impl<'a> RequestCredentials<'a> {
    /// Collect the signing headers, or `None` when any is absent or blank.
    pub(crate) fn extract(metadata: &'a dyn CallMetadata) -> Option<Self> {
        let header = |name: &str| {
            metadata
                .get(name)
                .map(str::trim)
                .filter(|value| !value.is_empty())
        };

        Some(Self {
            key: header(API_KEY_HEADER)?,
            secret: header(API_SECRET_HEADER)?,
            timestamp: header(TIMESTAMP_HEADER)?,
            signature: header(SIGNATURE_HEADER)?,
        })
    }
}

impl fmt::Debug for RequestCredentials<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestCredentials")
            .field("key", &self.key)
            .field("secret", &"**redacted**")
            .field("timestamp", &self.timestamp)
            .field("signature", &"**redacted**")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use rustc_hash::FxHashMap;

    use super::*;

    fn metadata(pairs: &[(&str, &str)]) -> FxHashMap<String, String> {
        pairs
            .iter()
            .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
            .collect()
    }

    #[test]
    fn extracts_all_four_headers() {
        let headers = metadata(&[
            (API_KEY_HEADER, "k1"),
            (API_SECRET_HEADER, "s1"),
            (TIMESTAMP_HEADER, "1700000000"),
            (SIGNATURE_HEADER, "abc"),
        ]);

        let credentials = RequestCredentials::extract(&headers);

        assert_eq!(credentials.map(|c| (c.key, c.timestamp)), Some(("k1", "1700000000")));
    }

    #[test]
    fn any_missing_or_blank_header_yields_none() {
        let complete = [
            (API_KEY_HEADER, "k1"),
            (API_SECRET_HEADER, "s1"),
            (TIMESTAMP_HEADER, "1700000000"),
            (SIGNATURE_HEADER, "abc"),
        ];

        for skipped in 0..complete.len() {
            let partial: Vec<_> = complete
                .iter()
                .enumerate()
                .filter(|(index, _)| *index != skipped)
                .map(|(_, pair)| *pair)
                .collect();

            assert!(
                RequestCredentials::extract(&metadata(&partial)).is_none(),
                "missing header #{skipped} should yield no credentials"
            );
        }

        let blank = metadata(&[
            (API_KEY_HEADER, "  "),
            (API_SECRET_HEADER, "s1"),
            (TIMESTAMP_HEADER, "1700000000"),
            (SIGNATURE_HEADER, "abc"),
        ]);

        assert!(RequestCredentials::extract(&blank).is_none());
    }

    #[test]
    fn debug_output_redacts_secret_material() {
        let headers = metadata(&[
            (API_KEY_HEADER, "k1"),
            (API_SECRET_HEADER, "top-secret"),
            (TIMESTAMP_HEADER, "1700000000"),
            (SIGNATURE_HEADER, "deadbeef"),
        ]);

        let rendered = format!("{:?}", RequestCredentials::extract(&headers));

        assert!(!rendered.contains("top-secret"), "secret leaked: {rendered}");
        assert!(!rendered.contains("deadbeef"), "signature leaked: {rendered}");
    }
}
