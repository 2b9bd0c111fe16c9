//! Configuration management for Identity Service
//!
//! Loads settings from:
//! 1. Environment variables
//! 2. .env file (local development)
//!
//! # Example
//!
//! ```no_run
//! use identity_service::config::Settings;
//!
//! fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     println!("JWT issuer: {}", settings.jwt.issuer);
//!     Ok(())
//! }
//! ```

use anyhow::{Context, Result};
use jwt_security::JwtSettings;
use std::env;
use std::str::FromStr;
use tracing::info;

/// Application settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub jwt: JwtSettings,
    pub password: PasswordSettings,
}

impl Settings {
    /// Load settings from the environment, reading `.env` first in debug builds.
    pub fn load() -> Result<Self> {
        if cfg!(debug_assertions) && dotenvy::dotenv().is_ok() {
            info!("Loaded .env file for development");
        }

        Self::from_vars(|name| env::var(name).ok())
    }

    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Settings {
            jwt: JwtSettings::from_vars(&var).context("Failed to load JWT settings")?,
            password: PasswordSettings::from_vars(&var)?,
        })
    }
}

/// Argon2id cost settings
///
/// Raising these makes new hashes slower to compute and to brute-force.
/// Existing hashes are unaffected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordSettings {
    /// Time cost (`PASSWORD_HASH_ITERATIONS`)
    pub iterations: u32,
    /// Memory cost in KiB (`PASSWORD_HASH_MEMORY_KIB`)
    pub memory_kib: u32,
    /// Lanes (`PASSWORD_HASH_PARALLELISM`)
    pub parallelism: u32,
}

impl Default for PasswordSettings {
    fn default() -> Self {
        Self {
            iterations: argon2::Params::DEFAULT_T_COST,
            memory_kib: argon2::Params::DEFAULT_M_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

impl PasswordSettings {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| env::var(name).ok())
    }

    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            iterations: parse_or(&var, "PASSWORD_HASH_ITERATIONS", defaults.iterations)?,
            memory_kib: parse_or(&var, "PASSWORD_HASH_MEMORY_KIB", defaults.memory_kib)?,
            parallelism: parse_or(&var, "PASSWORD_HASH_PARALLELISM", defaults.parallelism)?,
        })
    }
}

fn parse_or<F, T>(var: &F, name: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}", name)),
        None => Ok(default),
    }
}
