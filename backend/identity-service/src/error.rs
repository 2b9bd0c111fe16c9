use crate::security::policy::PasswordRule;
use jwt_security::TokenError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IdentityError>;

const INVALID_TOKEN_MESSAGE: &str = "Invalid or expired token";
const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Username already exists")]
    UsernameAlreadyExists,

    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("Password too weak: {0}")]
    WeakPassword(PasswordRule),

    #[error("Password verification failed: {0}")]
    Verification(String),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IdentityError {
    /// Message safe to show the caller.
    ///
    /// Token failures collapse into one response whatever the internal cause;
    /// credential failures never say which half was wrong.
    pub fn public_message(&self) -> String {
        match self {
            IdentityError::InvalidCredentials => "Invalid username or password".to_string(),
            IdentityError::UsernameAlreadyExists => "Username already exists".to_string(),
            IdentityError::EmailAlreadyExists => "Email already exists".to_string(),
            IdentityError::WeakPassword(rule) => rule.to_string(),
            IdentityError::Token(TokenError::Encoding(_)) => INTERNAL_MESSAGE.to_string(),
            IdentityError::Token(_) => INVALID_TOKEN_MESSAGE.to_string(),
            IdentityError::Verification(_)
            | IdentityError::Configuration(_)
            | IdentityError::Internal(_) => INTERNAL_MESSAGE.to_string(),
        }
    }

    /// True for errors the caller should answer with an authentication challenge.
    pub fn is_unauthenticated(&self) -> bool {
        match self {
            IdentityError::InvalidCredentials => true,
            IdentityError::Token(TokenError::Encoding(_)) => false,
            IdentityError::Token(_) => true,
            _ => false,
        }
    }
}

impl From<PasswordRule> for IdentityError {
    fn from(rule: PasswordRule) -> Self {
        IdentityError::WeakPassword(rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jwt_security::TokenKind;

    #[test]
    fn test_token_errors_share_one_public_message() {
        let errors = [
            TokenError::Malformed("bad base64".to_string()),
            TokenError::Expired,
            TokenError::InvalidSignature,
            TokenError::IssuerMismatch,
            TokenError::AudienceMismatch,
            TokenError::KindMismatch {
                expected: TokenKind::Access,
                actual: TokenKind::Refresh,
            },
            TokenError::Revoked,
        ];

        for err in errors {
            let err = IdentityError::from(err);
            assert_eq!(err.public_message(), INVALID_TOKEN_MESSAGE);
            assert!(err.is_unauthenticated());
        }
    }

    #[test]
    fn test_encoding_error_is_internal() {
        let err = IdentityError::from(TokenError::Encoding("JWT_SECRET not set".to_string()));
        assert_eq!(err.public_message(), INTERNAL_MESSAGE);
        assert!(!err.is_unauthenticated());
    }

    #[test]
    fn test_weak_password_names_rule() {
        let err = IdentityError::from(PasswordRule::Digit);
        assert_eq!(
            err.public_message(),
            "Password must contain at least one digit"
        );
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err = IdentityError::Verification("Invalid password hash format".to_string());
        assert_eq!(err.public_message(), INTERNAL_MESSAGE);
    }
}
