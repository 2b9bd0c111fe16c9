//! JWT issuance, verification and revocation
//!
//! **Security Features**:
//! - Independent key pairs for access and refresh tokens, so a token of one
//!   class never verifies under the other's key
//! - JWT ID (jti) on every token for replay correlation prevention
//! - Fixed issuer and audience, checked on every decode
//! - Token kind pinned at issuance and enforced per verification context
//! - In-process revocation checked before any cryptographic work
//! - Secret strength validation for HMAC keys
//!
//! The crate is synchronous: signing and verification are CPU-bound and the
//! blacklist is an in-memory concurrent set.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub mod clock;
pub mod codec;
pub mod config;
pub mod error;
pub mod keys;
pub mod secret_validation;
pub mod service;
pub mod token_blacklist;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use clock::{Clock, SystemClock};
pub use codec::TokenCodec;
pub use config::{JwtSettings, KeyMaterial};
pub use error::{Result, TokenError};
pub use keys::KeyPair;
pub use secret_validation::{assess_secret, generate_secure_secret, SecretStrength};
pub use service::TokenService;
pub use token_blacklist::TokenBlacklist;

pub const DEFAULT_ISSUER: &str = "jwt-login-project";
pub const DEFAULT_AUDIENCE: &str = "jwt-login-project-users";

/// Token class. Set once at issuance and never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The verified identity a token is issued for. Never carries credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
}

/// JWT Claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub username: String,
    pub email: String,
    /// Token type: "access" or "refresh"
    pub token_type: TokenKind,
    /// JWT ID, unique per token
    pub jti: String,
    pub iss: String,
    pub aud: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Parse `sub` back into the user id it was issued for.
    pub fn user_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub)
            .map_err(|e| TokenError::Malformed(format!("invalid user id in token: {}", e)))
    }
}

/// Access/refresh pair handed to the client after login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}
