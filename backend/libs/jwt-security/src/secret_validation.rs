//! Strength assessment for HMAC signing secrets
//!
//! HS256 is only as strong as its secret. Secrets are graded before they are
//! turned into signing keys so a guessable value never reaches production.

use crate::error::{Result, TokenError};
use base64::{engine::general_purpose::STANDARD, Engine};
use ring::rand::{SecureRandom, SystemRandom};

pub const MIN_SECRET_LENGTH: usize = 32; // 256 bits
const RECOMMENDED_SECRET_LENGTH: usize = 64; // 512 bits
const MIN_ENTROPY_BITS: f64 = 4.0;
const STRONG_ENTROPY_BITS: f64 = 5.0;
const MAX_RUN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretStrength {
    /// Rejected at startup
    Weak,
    /// Accepted with a warning
    Acceptable,
    Strong,
}

/// Grade a signing secret by length, Shannon entropy and obvious runs.
pub fn assess_secret(secret: &[u8]) -> SecretStrength {
    if secret.len() < MIN_SECRET_LENGTH {
        return SecretStrength::Weak;
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS || has_obvious_runs(secret) {
        return SecretStrength::Weak;
    }

    if secret.len() >= RECOMMENDED_SECRET_LENGTH && entropy >= STRONG_ENTROPY_BITS {
        SecretStrength::Strong
    } else {
        SecretStrength::Acceptable
    }
}

/// Bits of entropy per byte, on a 0..=8 scale.
fn shannon_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let mut counts = [0usize; 256];
    for &byte in data {
        counts[byte as usize] += 1;
    }

    let len = data.len() as f64;
    counts
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// True for runs like `aaaa` or `1234` of `MAX_RUN` or more bytes.
fn has_obvious_runs(data: &[u8]) -> bool {
    let mut repeated = 1;
    let mut ascending = 1;

    for pair in data.windows(2) {
        repeated = if pair[0] == pair[1] { repeated + 1 } else { 1 };
        ascending = if pair[1] as i16 - pair[0] as i16 == 1 {
            ascending + 1
        } else {
            1
        };

        if repeated >= MAX_RUN || ascending >= MAX_RUN {
            return true;
        }
    }

    false
}

/// Generate a random base64 secret from `length` bytes of OS randomness.
pub fn generate_secure_secret(length: usize) -> Result<String> {
    if length < MIN_SECRET_LENGTH {
        return Err(TokenError::Encoding(format!(
            "secret length must be at least {} bytes",
            MIN_SECRET_LENGTH
        )));
    }

    let mut buffer = vec![0u8; length];
    SystemRandom::new()
        .fill(&mut buffer)
        .map_err(|_| TokenError::Encoding("failed to gather random bytes".to_string()))?;

    Ok(STANDARD.encode(&buffer))
}
