//! In-process token blacklist for revocation
//!
//! Entries are SHA-256 digests of the raw token string, so a token can be
//! revoked whether or not it still verifies and the blacklist never holds a
//! usable bearer credential. Membership is monotonic: nothing is ever removed
//! for the lifetime of the process.

use dashmap::DashSet;
use sha2::{Digest, Sha256};

#[derive(Debug, Default)]
pub struct TokenBlacklist {
    revoked: DashSet<String>,
}

impl TokenBlacklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blacklist `token`. Returns `true` when this call added the entry and
    /// `false` when the token was already revoked.
    pub fn revoke(&self, token: &str) -> bool {
        self.revoked.insert(hash_token(token))
    }

    pub fn is_revoked(&self, token: &str) -> bool {
        self.revoked.contains(&hash_token(token))
    }

    pub fn len(&self) -> usize {
        self.revoked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revoked.is_empty()
    }
}

/// Hex-encoded SHA-256 of the raw token.
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
