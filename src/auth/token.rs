use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::AuthError;

/// Whether a bearer token authorizes API calls directly (access) or may only
/// be exchanged for new access tokens (refresh). Fixed at issuance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Identity claims embedded in every bearer token. Never persisted;
/// reconstructed by decoding the token itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's email.
    pub sub: String,
    pub user_uid: Uuid,
    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
    /// Unique token identifier; the canonical revocation key.
    pub jti: Uuid,
}

/// Signs and verifies access/refresh bearer tokens (HS256).
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::default();
        // Expiry is exact; no clock-skew leeway
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issue a signed token of the given kind, valid for `ttl` from now.
    /// A fresh `jti` is embedded at issuance.
    pub fn issue(
        &self,
        subject: &str,
        user_uid: Uuid,
        kind: TokenKind,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            user_uid,
            kind,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::Encoding(e.to_string()))
    }

    /// Verify signature, structure and expiry. `None` means unauthenticated,
    /// never a partial success.
    pub fn decode(&self, token: &str) -> Option<Claims> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .ok()
            .map(|data| data.claims)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SafeClaims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies short-lived tokens for one-time link flows
/// (email verification, password reset).
///
/// Deliberately a separate scheme with its own secret so a leak of either
/// secret does not compromise the other; payload is just the email.
#[derive(Clone)]
pub struct SafeTokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl SafeTokenCodec {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::default();
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn issue(&self, email: &str, ttl_secs: i64) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = SafeClaims {
            sub: email.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl_secs)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::Encoding(e.to_string()))
    }

    /// Returns the embedded email, or `None` for anything invalid or expired.
    pub fn decode(&self, token: &str) -> Option<String> {
        decode::<SafeClaims>(token, &self.decoding, &self.validation)
            .ok()
            .map(|data| data.claims.sub)
    }
}
