//! HS256 bearer tokens for the admin console.

use anyhow::{bail, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Admin username
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Why a presented token was refused. The message is shown to the caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,
    #[error("Invalid token")]
    Invalid,
}

#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl_hours: i64) -> Result<Self> {
        if secret.len() < MIN_SECRET_LEN {
            bail!("JWT_SECRET must be at least {MIN_SECRET_LEN} characters");
        }
        if ttl_hours <= 0 {
            bail!("TOKEN_TTL_HOURS must be positive");
        }
        Ok(Self {
            secret: secret.to_string(),
            ttl: Duration::hours(ttl_hours),
        })
    }

    pub fn issue(&self, subject: &str) -> Result<String> {
        let now = Utc::now();
        self.encode_claims(&Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        })
    }

    fn encode_claims(&self, claims: &Claims) -> Result<String> {
        Ok(encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|err| match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        })
    }
}
