//! Token configuration loaded from the environment
//!
//! **Environment Variables**:
//! - `JWT_ALGORITHM`: `HS256` (default) or `RS256`
//! - `JWT_SECRET` / `JWT_REFRESH_SECRET`: HMAC secrets (HS256, REQUIRED, must differ)
//! - `JWT_PRIVATE_KEY` / `JWT_PUBLIC_KEY`: access key pair in PEM format (RS256, REQUIRED)
//! - `JWT_REFRESH_PRIVATE_KEY` / `JWT_REFRESH_PUBLIC_KEY`: refresh key pair (RS256, REQUIRED)
//! - `JWT_ACCESS_EXPIRY`: access lifetime, humantime syntax (default: `15m`)
//! - `JWT_REFRESH_EXPIRY`: refresh lifetime, humantime syntax (default: `7d`)
//! - `JWT_ISSUER` / `JWT_AUDIENCE`: fixed issuer and audience claims

use crate::error::TokenError;
use crate::keys::KeyPair;
use crate::secret_validation::{assess_secret, SecretStrength};
use crate::{DEFAULT_AUDIENCE, DEFAULT_ISSUER};
use anyhow::{bail, Context, Result};
use std::env;
use std::fmt;
use std::time::Duration;
use tracing::warn;
use zeroize::Zeroizing;

const DEFAULT_ACCESS_EXPIRY: &str = "15m";
const DEFAULT_REFRESH_EXPIRY: &str = "7d";

/// Raw key material for one token class.
#[derive(Clone)]
pub enum KeyMaterial {
    Secret(Zeroizing<String>),
    RsaPem {
        private_pem: Zeroizing<String>,
        public_pem: String,
    },
}

impl KeyMaterial {
    /// Turn the material into a signing pair. Weak HMAC secrets are refused.
    pub fn key_pair(&self, label: &str) -> crate::Result<KeyPair> {
        match self {
            KeyMaterial::Secret(secret) => {
                match assess_secret(secret.as_bytes()) {
                    SecretStrength::Weak => {
                        return Err(TokenError::Encoding(format!(
                            "{} secret is too weak - use at least 32 random bytes",
                            label
                        )))
                    }
                    SecretStrength::Acceptable => {
                        warn!(key = label, "HMAC secret is acceptable but below recommended strength");
                    }
                    SecretStrength::Strong => {}
                }
                KeyPair::from_secret(secret.as_bytes())
            }
            KeyMaterial::RsaPem {
                private_pem,
                public_pem,
            } => KeyPair::from_rsa_pem(private_pem, public_pem),
        }
    }

    fn same_key_as(&self, other: &KeyMaterial) -> bool {
        match (self, other) {
            (KeyMaterial::Secret(a), KeyMaterial::Secret(b)) => a.as_str() == b.as_str(),
            (
                KeyMaterial::RsaPem { public_pem: a, .. },
                KeyMaterial::RsaPem { public_pem: b, .. },
            ) => a.trim() == b.trim(),
            _ => false,
        }
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyMaterial::Secret(_) => f.write_str("KeyMaterial::Secret(<redacted>)"),
            KeyMaterial::RsaPem { .. } => f.write_str("KeyMaterial::RsaPem(<redacted>)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub access_key: KeyMaterial,
    pub refresh_key: KeyMaterial,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub issuer: String,
    pub audience: String,
}

impl JwtSettings {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let algorithm = var("JWT_ALGORITHM").unwrap_or_else(|| "HS256".to_string());

        let (access_key, refresh_key) = match algorithm.to_ascii_uppercase().as_str() {
            "HS256" => (
                KeyMaterial::Secret(Zeroizing::new(required(&var, "JWT_SECRET")?)),
                KeyMaterial::Secret(Zeroizing::new(required(&var, "JWT_REFRESH_SECRET")?)),
            ),
            "RS256" => (
                KeyMaterial::RsaPem {
                    private_pem: Zeroizing::new(required(&var, "JWT_PRIVATE_KEY")?),
                    public_pem: required(&var, "JWT_PUBLIC_KEY")?,
                },
                KeyMaterial::RsaPem {
                    private_pem: Zeroizing::new(required(&var, "JWT_REFRESH_PRIVATE_KEY")?),
                    public_pem: required(&var, "JWT_REFRESH_PUBLIC_KEY")?,
                },
            ),
            other => bail!("Unsupported JWT_ALGORITHM: {} (expected HS256 or RS256)", other),
        };

        Ok(Self {
            access_key,
            refresh_key,
            access_ttl: lifetime(&var, "JWT_ACCESS_EXPIRY", DEFAULT_ACCESS_EXPIRY)?,
            refresh_ttl: lifetime(&var, "JWT_REFRESH_EXPIRY", DEFAULT_REFRESH_EXPIRY)?,
            issuer: var("JWT_ISSUER").unwrap_or_else(|| DEFAULT_ISSUER.to_string()),
            audience: var("JWT_AUDIENCE").unwrap_or_else(|| DEFAULT_AUDIENCE.to_string()),
        })
    }

    /// Build the access and refresh pairs, refusing a shared key.
    pub fn key_pairs(&self) -> crate::Result<(KeyPair, KeyPair)> {
        if self.access_key.same_key_as(&self.refresh_key) {
            return Err(TokenError::Encoding(
                "access and refresh tokens must use different keys".to_string(),
            ));
        }

        Ok((
            self.access_key.key_pair("access")?,
            self.refresh_key.key_pair("refresh")?,
        ))
    }
}

fn required<F>(var: &F, name: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(TokenError::Encoding(format!("{} environment variable not set", name)).into()),
    }
}

fn lifetime<F>(var: &F, name: &str, default: &str) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = var(name).unwrap_or_else(|| default.to_string());
    humantime::parse_duration(raw.trim()).with_context(|| format!("Invalid {}: {}", name, raw))
}
