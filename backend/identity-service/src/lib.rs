/// Identity Service Library
///
/// Credential verification and the session token lifecycle.
///
/// ## Modules
///
/// - `config`: Service configuration
/// - `db`: User store boundary
/// - `error`: Error types
/// - `models`: Data models
/// - `security`: Password hashing and policy, JWT re-exports
/// - `services`: Authentication flows
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod security;
pub mod services;

// Re-export commonly used types
pub use error::{IdentityError, Result};
pub use services::{Authenticator, LoginOutcome};
