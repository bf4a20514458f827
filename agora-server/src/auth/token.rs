//! Bearer tokens
//!
//! HS256-signed JWTs whose `sub` claim is the username.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Default token lifetime
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token signing secret is empty")]
    MissingSecret,

    #[error("invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // username
    iat: i64,
    exp: i64,
}

/// Issues and verifies bearer tokens
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        })
    }

    /// Token lifetime in seconds, as reported to clients.
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// Sign a token for `username`.
    pub fn issue(&self, username: &str) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: username.to_owned(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Verify signature, algorithm and expiry; return the username.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims.sub)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> TokenService {
        TokenService::new(secret, Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES)).unwrap()
    }

    #[test]
    fn issued_token_carries_username() {
        let tokens = service("test-secret");
        let token = tokens.issue("alice_1").unwrap();
        assert_eq!(tokens.verify(&token).unwrap(), "alice_1");
    }

    #[test]
    fn rejects_other_secret() {
        let token = service("secret-a").issue("alice_1").unwrap();
        assert!(service("secret-b").verify(&token).is_err());
    }

    #[test]
    fn rejects_expired() {
        let tokens = TokenService::new("test-secret", Duration::hours(-2)).unwrap();
        let token = tokens.issue("alice_1").unwrap();
        assert!(tokens.verify(&token).is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!(service("test-secret").verify("not.a.token").is_err());
    }

    #[test]
    fn empty_secret_is_refused() {
        assert!(matches!(
            TokenService::new("", Duration::minutes(5)),
            Err(TokenError::MissingSecret)
        ));
    }
}
