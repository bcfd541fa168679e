use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::models::Role;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid subject: {0}")]
    InvalidSubject(String),

    #[error("Token lifetime must be between 1 and {max} seconds, got {0}", max = MAX_TOKEN_TTL_SECS)]
    InvalidTtl(i64),

    #[error("Token expiry is out of range")]
    ExpiryOutOfRange,
}

/// Longest session a token may grant (one year)
pub const MAX_TOKEN_TTL_SECS: i64 = 60 * 60 * 24 * 365;

/// Claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// The authenticated caller, recovered from a verified token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub role: Role,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies HS256 session tokens
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    /// Build an issuer whose tokens live for `ttl_secs`
    ///
    /// The lifetime must be positive and at most [`MAX_TOKEN_TTL_SECS`].
    pub fn new(secret: &str, ttl_secs: i64) -> Result<Self, TokenError> {
        if !(1..=MAX_TOKEN_TTL_SECS).contains(&ttl_secs) {
            return Err(TokenError::InvalidTtl(ttl_secs));
        }
        let ttl = Duration::try_seconds(ttl_secs).ok_or(TokenError::InvalidTtl(ttl_secs))?;

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        })
    }

    pub fn issue(&self, user_id: i64, role: Role, name: &str) -> Result<IssuedToken, TokenError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or(TokenError::ExpiryOutOfRange)?;
        let claims = Claims {
            sub: user_id.to_string(),
            role,
            name: name.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding)?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify signature and expiry and return the caller's identity
    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        let claims = data.claims;

        let user_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| TokenError::InvalidSubject(claims.sub.clone()))?;

        Ok(Identity {
            user_id,
            role: claims.role,
            name: claims.name,
        })
    }
}
