//! One-way password hashing and the reset-token lifecycle.
//!
//! Plaintext passwords exist only transiently in request handling; only the
//! bcrypt digest persists. Reset tokens are random bytes delivered
//! out-of-band; the store keeps their SHA-256 digest and a short expiry.

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::domain::Error;

/// Fixed bcrypt work factor.
pub const BCRYPT_COST: u32 = 10;

/// Validity window for a password-reset token.
pub const RESET_TOKEN_TTL: Duration = Duration::minutes(10);

const RESET_TOKEN_BYTES: usize = 20;

/// Hash a plaintext password for persistence.
///
/// # Errors
///
/// Returns [`Error::internal`] when the hashing backend fails.
pub fn hash_password(plaintext: &str) -> Result<String, Error> {
    bcrypt::hash(plaintext, BCRYPT_COST)
        .map_err(|err| Error::internal(format!("password hashing failed: {err}")))
}

/// Re-derive and compare a candidate against a stored digest.
///
/// A malformed stored digest compares unequal rather than erroring; the
/// caller only ever needs a yes/no.
#[must_use]
pub fn verify_password(candidate: &str, stored_hash: &str) -> bool {
    bcrypt::verify(candidate, stored_hash).unwrap_or(false)
}

/// A freshly issued reset token: the raw form goes to the user, the digest
/// and expiry go to the store.
#[derive(Debug, Clone)]
pub struct ResetToken {
    /// Hex-encoded random token delivered out-of-band.
    pub raw: String,
    /// SHA-256 hex digest persisted for lookup.
    pub hash: String,
    /// Instant after which the token is dead.
    pub expires_at: DateTime<Utc>,
}

/// Generate a reset token with a 10-minute expiry.
#[must_use]
pub fn issue_reset_token() -> ResetToken {
    let mut bytes = [0_u8; RESET_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    let raw = hex::encode(bytes);
    let hash = hash_reset_token(&raw);

    ResetToken {
        raw,
        hash,
        expires_at: Utc::now() + RESET_TOKEN_TTL,
    }
}

/// Digest a candidate reset token for store lookup.
#[must_use]
pub fn hash_reset_token(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_round_trips_and_digest_differs_from_plaintext() {
        let hash = hash_password("secret1").unwrap();
        assert_ne!(hash, "secret1");
        assert!(verify_password("secret1", &hash));
        assert!(!verify_password("secret2", &hash));
    }

    #[test]
    fn malformed_stored_digest_compares_unequal() {
        assert!(!verify_password("secret1", "not-a-bcrypt-digest"));
    }

    #[test]
    fn reset_token_hash_matches_rederivation() {
        let token = issue_reset_token();
        assert_eq!(hash_reset_token(&token.raw), token.hash);
        assert_ne!(token.raw, token.hash);
        assert!(token.expires_at > Utc::now());
    }

    #[test]
    fn distinct_tokens_are_issued() {
        assert_ne!(issue_reset_token().raw, issue_reset_token().raw);
    }
}
