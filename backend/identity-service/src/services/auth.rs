/// Credential checks and session token lifecycle
///
/// Flow:
/// 1. `login`: look up the user, verify the password, issue an access/refresh pair
/// 2. `verify_access`: gate protected calls on a live access token
/// 3. `refresh`: trade a refresh token for a new pair (single use)
/// 4. `logout`: revoke the presented token
use crate::config::Settings;
use crate::db::UserStore;
use crate::error::{IdentityError, Result};
use crate::models::{Identity, NewUser};
use crate::security::password::{generate_temp_password, PasswordService};
use jwt_security::{Claims, Subject, SystemClock, TokenBlacklist, TokenPair, TokenService};
use std::sync::Arc;
use tracing::{info, warn};

const DUMMY_PASSWORD_LENGTH: usize = 16;

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: Subject,
    pub tokens: TokenPair,
}

pub struct Authenticator {
    users: Arc<dyn UserStore>,
    passwords: Arc<PasswordService>,
    tokens: Arc<TokenService>,
    /// Verified against when the username is unknown, so both failure
    /// paths cost one hash comparison.
    dummy_hash: String,
}

impl Authenticator {
    pub fn new(
        users: Arc<dyn UserStore>,
        passwords: Arc<PasswordService>,
        tokens: Arc<TokenService>,
    ) -> Result<Self> {
        let dummy_hash = passwords.hash(&generate_temp_password(DUMMY_PASSWORD_LENGTH))?;

        Ok(Self {
            users,
            passwords,
            tokens,
            dummy_hash,
        })
    }

    /// Wire up the service from settings with a fresh, empty blacklist.
    ///
    /// Fails with `Token(Encoding)` when key material is missing or unusable;
    /// callers should treat that as fatal.
    pub fn from_settings(settings: &Settings, users: Arc<dyn UserStore>) -> Result<Self> {
        let passwords = Arc::new(PasswordService::new(&settings.password)?);
        let tokens = Arc::new(TokenService::from_settings(
            &settings.jwt,
            Arc::new(SystemClock),
            Arc::new(TokenBlacklist::new()),
        )?);

        Self::new(users, passwords, tokens)
    }

    pub fn tokens(&self) -> &Arc<TokenService> {
        &self.tokens
    }

    pub fn passwords(&self) -> &Arc<PasswordService> {
        &self.passwords
    }

    /// Check a username/password pair.
    ///
    /// Unknown users and wrong passwords both yield `InvalidCredentials`.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Identity> {
        if username.is_empty() || password.is_empty() {
            return Err(IdentityError::InvalidCredentials);
        }

        let identity = match self.users.find_by_username(username).await? {
            Some(identity) => identity,
            None => {
                // Outcome is irrelevant; only the cost matters.
                let _ = self.passwords.verify(password, &self.dummy_hash);
                warn!("Authentication failed");
                return Err(IdentityError::InvalidCredentials);
            }
        };

        if !self.passwords.verify(password, &identity.password_hash)? {
            warn!("Authentication failed");
            return Err(IdentityError::InvalidCredentials);
        }

        info!(user_id = %identity.user_id, "User authenticated");
        Ok(identity)
    }

    /// Authenticate and issue a token pair. No tokens are issued on failure.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome> {
        let identity = self.authenticate(username, password).await?;
        let user = identity.subject();
        let tokens = self.tokens.issue_pair(&user)?;

        Ok(LoginOutcome { user, tokens })
    }

    /// Create a user after enforcing the password policy.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<Subject> {
        let password_hash = self.passwords.hash(password)?;

        let identity = self
            .users
            .create(NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await?;

        info!(user_id = %identity.user_id, "User registered");
        Ok(identity.subject())
    }

    pub fn verify_access(&self, access_token: &str) -> Result<Claims> {
        Ok(self.tokens.verify_access(access_token)?)
    }

    pub fn refresh(&self, refresh_token: &str) -> Result<TokenPair> {
        Ok(self.tokens.rotate(refresh_token)?)
    }

    /// Revoke the presented token. Always succeeds.
    pub fn logout(&self, token: &str) {
        self.tokens.revoke(token);
    }
}
