//! Token error taxonomy
//!
//! Every verification failure has its own variant so callers can choose between
//! re-authenticating, refreshing, or rejecting outright. None of these details
//! should reach an end user; the boundary collapses them into one response.

use crate::TokenKind;
use jsonwebtoken::errors::ErrorKind;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TokenError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Token expired")]
    Expired,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token issuer mismatch")]
    IssuerMismatch,

    #[error("Token audience mismatch")]
    AudienceMismatch,

    #[error("Invalid token type: expected {expected}, got {actual}")]
    KindMismatch {
        expected: TokenKind,
        actual: TokenKind,
    },

    #[error("Token revoked")]
    Revoked,

    #[error("Signing key unavailable: {0}")]
    Encoding(String),
}

impl TokenError {
    /// Short stable label used as a structured logging field.
    pub fn kind_label(&self) -> &'static str {
        match self {
            TokenError::Malformed(_) => "malformed",
            TokenError::Expired => "expired",
            TokenError::InvalidSignature => "signature",
            TokenError::IssuerMismatch => "issuer",
            TokenError::AudienceMismatch => "audience",
            TokenError::KindMismatch { .. } => "kind",
            TokenError::Revoked => "revoked",
            TokenError::Encoding(_) => "encoding",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            // A token signed under another key family fails the algorithm check
            // before the signature is even computed; both mean "not our signature".
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                TokenError::InvalidSignature
            }
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidIssuer => TokenError::IssuerMismatch,
            ErrorKind::InvalidAudience => TokenError::AudienceMismatch,
            ErrorKind::InvalidKeyFormat
            | ErrorKind::InvalidRsaKey(_)
            | ErrorKind::InvalidEcdsaKey
            | ErrorKind::RsaFailedSigning => TokenError::Encoding(err.to_string()),
            _ => TokenError::Malformed(err.to_string()),
        }
    }
}
