//! Request signing protocol.
//!
//! A caller signs `"{method_path}:{timestamp}"` with HMAC-SHA-512 keyed by its
//! shared secret and sends the lowercase hex digest in `x-signature`.

use hmac::{Hmac, Mac, digest::InvalidLength};
use sha2::Sha512;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha512 = Hmac<Sha512>;

#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("signing key is unusable")]
    InvalidKey(#[source] InvalidLength),
}

/// Build the exact string that is signed for a call.
///
/// `timestamp` is the caller-supplied decimal string, never the server clock.
#[must_use]
pub fn canonical_string(method_path: &str, timestamp: &str) -> String {
    format!("{method_path}:{timestamp}")
}

/// Compute the lowercase hex HMAC-SHA-512 of `canonical` keyed by `secret`.
///
/// # Errors
///
/// Returns an error if the MAC cannot be keyed with `secret`.
pub fn compute_signature(secret: &str, canonical: &str) -> Result<String, SignatureError> {
    let mut mac =
        HmacSha512::new_from_slice(secret.as_bytes()).map_err(SignatureError::InvalidKey)?;

    mac.update(canonical.as_bytes());

    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Sign a call to `method_path` at the given caller timestamp.
///
/// # Errors
///
/// Returns an error if the MAC cannot be keyed with `secret`.
pub fn sign(secret: &str, method_path: &str, timestamp: &str) -> Result<String, SignatureError> {
    compute_signature(secret, &canonical_string(method_path, timestamp))
}

/// Compare an expected lowercase digest against a caller-supplied one.
///
/// The supplied value is case-folded first; the comparison itself runs in
/// constant time for equal-length inputs.
#[must_use]
pub fn signatures_match(expected: &str, provided: &str) -> bool {
    let provided = provided.trim().to_ascii_lowercase();

    expected.as_bytes().ct_eq(provided.as_bytes()).into()
}
