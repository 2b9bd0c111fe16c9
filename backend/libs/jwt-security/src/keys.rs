//! Signing and verification key pairs
//!
//! Access and refresh tokens each get their own pair. A pair built from a public
//! key alone can verify but not sign.

use crate::error::{Result, TokenError};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};
use std::fmt;

const MIN_RSA_PEM_LENGTH: usize = 256;

#[derive(Clone)]
pub struct KeyPair {
    encoding: Option<EncodingKey>,
    decoding: DecodingKey,
    algorithm: Algorithm,
}

impl KeyPair {
    /// HS256 pair from a shared secret.
    pub fn from_secret(secret: &[u8]) -> Result<Self> {
        if secret.is_empty() {
            return Err(TokenError::Encoding("HMAC secret is empty".to_string()));
        }

        Ok(Self {
            encoding: Some(EncodingKey::from_secret(secret)),
            decoding: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        })
    }

    /// RS256 pair from PEM-encoded private and public keys.
    pub fn from_rsa_pem(private_key_pem: &str, public_key_pem: &str) -> Result<Self> {
        if private_key_pem.len() < MIN_RSA_PEM_LENGTH {
            return Err(TokenError::Encoding(format!(
                "RSA private key too short - minimum {} characters required",
                MIN_RSA_PEM_LENGTH
            )));
        }

        let encoding = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())?;
        let mut pair = Self::verify_only_rsa(public_key_pem)?;
        pair.encoding = Some(encoding);
        Ok(pair)
    }

    /// RS256 pair for processes that only validate tokens.
    pub fn verify_only_rsa(public_key_pem: &str) -> Result<Self> {
        let decoding = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())?;

        Ok(Self {
            encoding: None,
            decoding,
            algorithm: Algorithm::RS256,
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn can_sign(&self) -> bool {
        self.encoding.is_some()
    }

    pub(crate) fn encoding_key(&self) -> Result<&EncodingKey> {
        self.encoding
            .as_ref()
            .ok_or_else(|| TokenError::Encoding("no signing key loaded".to_string()))
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("algorithm", &self.algorithm)
            .field("can_sign", &self.can_sign())
            .finish_non_exhaustive()
    }
}
