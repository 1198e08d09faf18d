use base64::Engine;
use gurl_core::LinkRecord;
use rand::Rng;
use subtle::ConstantTimeEq;

const TOKEN_BYTES: usize = 32;

/// Issues deletion tokens.
pub struct DeletionToken;

impl DeletionToken {
    /// Generates a fresh token: 256 bits from the thread-local CSPRNG,
    /// URL-safe base64 without padding.
    pub fn generate() -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::rng().fill(&mut bytes);
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
    }
}

/// Gatekeeper for explicit deletion.
pub struct AccessController;

impl AccessController {
    /// Returns true if `supplied` matches the record's deletion token.
    ///
    /// The comparison runs in time independent of where the first mismatching
    /// byte sits. Token length is not secret, so a length mismatch returns
    /// early.
    pub fn authorize(record: &LinkRecord, supplied: &str) -> bool {
        let expected = record.deletion_token.as_bytes();
        let supplied = supplied.as_bytes();

        if expected.len() != supplied.len() {
            return false;
        }

        expected.ct_eq(supplied).into()
    }
}
