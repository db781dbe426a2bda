//! Access tokens — HS256 JWTs carrying the caller's user id.
//!
//! Claims are `{user_id, iat, exp}` with `iat`/`exp` in Unix seconds. Both
//! issuing and verification take the current time explicitly; the library's
//! own clock-based expiry check is disabled and replaced by an `exp <= now`
//! comparison against the supplied instant, with no leeway.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Reasons a bearer token is refused. All of them surface as 401.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(String),

    /// The configured lifetime pushes `exp` past the representable range.
    #[error("token lifetime of {0} hours is out of range")]
    LifetimeOutOfRange(i64),
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    user_id: i64,
    iat: i64,
    exp: i64,
}

/// Signs and verifies access tokens with a shared secret.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_hours: i64,
}

impl TokenIssuer {
    pub fn new(secret: &SecretString, ttl_hours: i64) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            ttl_hours,
        }
    }

    /// Issue a token for `user_id`, valid from `now` for the configured
    /// lifetime. Returns the token and its expiry instant.
    pub fn issue(
        &self,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> Result<(String, DateTime<Utc>), TokenError> {
        let expires_at = Duration::try_hours(self.ttl_hours)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or(TokenError::LifetimeOutOfRange(self.ttl_hours))?;
        let claims = Claims {
            user_id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Invalid(e.to_string()))?;
        Ok((token, expires_at))
    }

    /// Verify `token` at instant `now` and return the user id it carries.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<i64, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|e| TokenError::Invalid(e.to_string()))?;
        if data.claims.exp <= now.timestamp() {
            return Err(TokenError::Expired);
        }
        Ok(data.claims.user_id)
    }
}
