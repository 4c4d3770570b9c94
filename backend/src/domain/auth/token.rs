//! Signed, time-limited identity tokens.
//!
//! Tokens are JWTs (HS256) embedding the user id as `sub` with a 24-hour
//! expiry. The signing secret is held by the server and read-only after
//! startup.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Error;

/// Token validity window.
pub const TOKEN_TTL: Duration = Duration::hours(24);

/// Verification failures, split so expiry can be reported distinctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The embedded expiry has elapsed.
    #[error("token has expired")]
    Expired,
    /// The signature or payload did not validate.
    #[error("invalid token")]
    Invalid,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    iat: i64,
    exp: i64,
}

/// Issues and verifies identity tokens with a server-held secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    /// Build a service with the default 24-hour validity window.
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        Self::with_ttl(secret, TOKEN_TTL)
    }

    /// Build a service with an explicit validity window (tests shrink it).
    #[must_use]
    pub fn with_ttl(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    /// Sign a token for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::internal`] when signing fails.
    pub fn issue(&self, user_id: Uuid) -> Result<String, Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|err| Error::internal(format!("failed to sign token: {err}")))
    }

    /// Verify a token and return the embedded user id.
    ///
    /// # Errors
    ///
    /// [`TokenError::Expired`] when the validity window has elapsed,
    /// [`TokenError::Invalid`] for any other decode or signature failure.
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        match decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) => Ok(data.claims.sub),
            Err(err) => match err.kind() {
                ErrorKind::ExpiredSignature => Err(TokenError::Expired),
                _ => Err(TokenError::Invalid),
            },
        }
    }
}
