//! Token codec: signs claim sets into JWTs and verifies them back
//!
//! Checks performed on decode, in order:
//! 1. Structure and signature under the supplied key (algorithm pinned to the key)
//! 2. Issuer and audience against the codec's fixed values
//! 3. `jti` presence
//! 4. Expiry against the codec's clock (`now >= exp` is expired, no leeway)
//! 5. Token kind against the verification context

use crate::clock::{Clock, SystemClock};
use crate::error::{Result, TokenError};
use crate::keys::KeyPair;
use crate::{Claims, Subject, TokenKind, DEFAULT_AUDIENCE, DEFAULT_ISSUER};
use jsonwebtoken::{decode, encode, Header, Validation};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

const REQUIRED_CLAIMS: [&str; 4] = ["exp", "iss", "aud", "sub"];

#[derive(Clone)]
pub struct TokenCodec {
    issuer: String,
    audience: String,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    pub fn new(issuer: impl Into<String>, audience: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            issuer: issuer.into(),
            audience: audience.into(),
            clock,
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    /// Sign a new token for `subject`. Every call draws a fresh `jti`, so two
    /// tokens for the same subject and kind never share an identity.
    pub fn encode(
        &self,
        subject: &Subject,
        kind: TokenKind,
        key: &KeyPair,
        ttl: Duration,
    ) -> Result<String> {
        let encoding_key = key.encoding_key()?;
        let now = self.clock.now();
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);

        let claims = Claims {
            sub: subject.user_id.to_string(),
            username: subject.username.clone(),
            email: subject.email.clone(),
            token_type: kind,
            jti: Uuid::new_v4().to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now,
            exp: now.saturating_add(ttl_secs),
        };

        Ok(encode(&Header::new(key.algorithm()), &claims, encoding_key)?)
    }

    /// Verify `token` under `key` and return its claims if it is a live token
    /// of kind `expected`.
    pub fn decode(&self, token: &str, key: &KeyPair, expected: TokenKind) -> Result<Claims> {
        let mut validation = Validation::new(key.algorithm());
        // Expiry is checked below against the injected clock.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_audience(&[self.audience.as_str()]);
        validation.set_required_spec_claims(&REQUIRED_CLAIMS);

        let claims = decode::<Claims>(token, key.decoding_key(), &validation)?.claims;

        if claims.jti.trim().is_empty() {
            return Err(TokenError::Malformed("missing jti claim".to_string()));
        }

        if self.clock.now() >= claims.exp {
            return Err(TokenError::Expired);
        }

        if claims.token_type != expected {
            return Err(TokenError::KindMismatch {
                expected,
                actual: claims.token_type,
            });
        }

        Ok(claims)
    }
}

impl Default for TokenCodec {
    fn default() -> Self {
        Self::new(DEFAULT_ISSUER, DEFAULT_AUDIENCE, Arc::new(SystemClock))
    }
}
