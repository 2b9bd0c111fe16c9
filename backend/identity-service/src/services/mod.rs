/// Service layer for identity-service
///
/// - Authentication (credential check, login, logout, refresh, registration)
pub mod auth;

pub use auth::{Authenticator, LoginOutcome};
