/// Security module for authentication
///
/// Provides core security primitives for identity-service:
/// - Password hashing and verification (Argon2id)
/// - Password strength policy
/// - JWT issuance, validation and revocation (via jwt-security)
///
/// ## Architecture
///
/// - **jwt-security**: Shared token codec, blacklist and token service
/// - **password**: Argon2id password hashing
/// - **policy**: Composition rules checked before any hash is computed
pub use jwt_security::{Claims, TokenError, TokenKind, TokenPair, TokenService};

pub mod password;
pub mod policy;

pub use password::{generate_temp_password, PasswordService};
pub use policy::{validate_password_strength, PasswordRule};
