//! Token service: the caller-facing issuance, verification and revocation API
//!
//! Composes a [`TokenCodec`], one key pair per token class and a shared
//! [`TokenBlacklist`]. Every method is safe to call concurrently; the only
//! mutable state is the blacklist.

use crate::clock::Clock;
use crate::codec::TokenCodec;
use crate::config::JwtSettings;
use crate::error::{Result, TokenError};
use crate::keys::KeyPair;
use crate::token_blacklist::TokenBlacklist;
use crate::{Claims, Subject, TokenKind, TokenPair};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_ACCESS_TTL: Duration = Duration::from_secs(15 * 60);
pub const DEFAULT_REFRESH_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

const LOG_PREFIX_CHARS: usize = 10;

pub struct TokenService {
    codec: TokenCodec,
    access_key: KeyPair,
    refresh_key: KeyPair,
    access_ttl: Duration,
    refresh_ttl: Duration,
    blacklist: Arc<TokenBlacklist>,
}

impl TokenService {
    pub fn new(
        codec: TokenCodec,
        access_key: KeyPair,
        refresh_key: KeyPair,
        blacklist: Arc<TokenBlacklist>,
    ) -> Self {
        Self {
            codec,
            access_key,
            refresh_key,
            access_ttl: DEFAULT_ACCESS_TTL,
            refresh_ttl: DEFAULT_REFRESH_TTL,
            blacklist,
        }
    }

    pub fn with_lifetimes(mut self, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        self.access_ttl = access_ttl;
        self.refresh_ttl = refresh_ttl;
        self
    }

    /// Build the service from loaded settings. Missing or unusable key
    /// material is an `Encoding` error and should abort startup.
    pub fn from_settings(
        settings: &JwtSettings,
        clock: Arc<dyn Clock>,
        blacklist: Arc<TokenBlacklist>,
    ) -> Result<Self> {
        let (access_key, refresh_key) = settings.key_pairs()?;
        let codec = TokenCodec::new(settings.issuer.clone(), settings.audience.clone(), clock);

        info!(
            algorithm = ?access_key.algorithm(),
            issuer = %settings.issuer,
            access_ttl_secs = settings.access_ttl.as_secs(),
            refresh_ttl_secs = settings.refresh_ttl.as_secs(),
            "Token service initialized"
        );

        Ok(Self::new(codec, access_key, refresh_key, blacklist)
            .with_lifetimes(settings.access_ttl, settings.refresh_ttl))
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    pub fn blacklist(&self) -> &Arc<TokenBlacklist> {
        &self.blacklist
    }

    /// Issue an access/refresh pair for `subject`. Either both tokens are
    /// returned or the call fails.
    pub fn issue_pair(&self, subject: &Subject) -> Result<TokenPair> {
        let access_token =
            self.codec
                .encode(subject, TokenKind::Access, &self.access_key, self.access_ttl)?;
        let refresh_token =
            self.codec
                .encode(subject, TokenKind::Refresh, &self.refresh_key, self.refresh_ttl)?;

        debug!(user_id = %subject.user_id, "Issued token pair");

        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: i64::try_from(self.access_ttl.as_secs()).unwrap_or(i64::MAX),
        })
    }

    pub fn verify_access(&self, token: &str) -> Result<Claims> {
        self.verify(token, TokenKind::Access)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<Claims> {
        self.verify(token, TokenKind::Refresh)
    }

    fn verify(&self, token: &str, kind: TokenKind) -> Result<Claims> {
        // Revocation first: known-dead tokens cost a hash lookup, not a signature check.
        if self.blacklist.is_revoked(token) {
            debug!(kind = %kind, reason = "revoked", "Token verification failed");
            return Err(TokenError::Revoked);
        }

        let key = match kind {
            TokenKind::Access => &self.access_key,
            TokenKind::Refresh => &self.refresh_key,
        };

        self.codec.decode(token, key, kind).map_err(|e| {
            debug!(kind = %kind, reason = e.kind_label(), "Token verification failed");
            e
        })
    }

    /// Revoke `token` for the rest of the process lifetime. Works on any
    /// string, including tokens that are expired or malformed.
    pub fn revoke(&self, token: &str) {
        let prefix: String = token.chars().take(LOG_PREFIX_CHARS).collect();
        if self.blacklist.revoke(token) {
            info!(token_prefix = %prefix, "Token revoked");
        } else {
            debug!(token_prefix = %prefix, "Token already revoked");
        }
    }

    pub fn is_revoked(&self, token: &str) -> bool {
        self.blacklist.is_revoked(token)
    }

    /// Exchange a refresh token for a new pair. The presented refresh token is
    /// single-use: it is revoked on success, and only one of several racing
    /// callers can win it.
    pub fn rotate(&self, refresh_token: &str) -> Result<TokenPair> {
        let claims = self.verify_refresh(refresh_token)?;
        let subject = Subject {
            user_id: claims.user_id()?,
            username: claims.username,
            email: claims.email,
        };

        let pair = self.issue_pair(&subject)?;

        if !self.blacklist.revoke(refresh_token) {
            return Err(TokenError::Revoked);
        }

        info!(user_id = %subject.user_id, "Refresh token rotated");
        Ok(pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{test_service, test_subject, ManualClock};
    use crate::SystemClock;

    #[test]
    fn test_issue_and_verify_pair() {
        let service = test_service(Arc::new(SystemClock));
        let subject = test_subject();

        let pair = service.issue_pair(&subject).unwrap();
        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.expires_in, 900);

        let access = service.verify_access(&pair.access_token).unwrap();
        assert_eq!(access.user_id().unwrap(), subject.user_id);
        assert_eq!(access.username, subject.username);
        assert_eq!(access.email, subject.email);
        assert_eq!(access.token_type, TokenKind::Access);

        let refresh = service.verify_refresh(&pair.refresh_token).unwrap();
        assert_eq!(refresh.user_id().unwrap(), subject.user_id);
        assert_eq!(refresh.token_type, TokenKind::Refresh);
        assert!(refresh.exp > access.exp);
        assert_ne!(refresh.jti, access.jti);
    }

    #[test]
    fn test_cross_kind_verification_fails_on_signature() {
        let service = test_service(Arc::new(SystemClock));
        let pair = service.issue_pair(&test_subject()).unwrap();

        assert_eq!(
            service.verify_access(&pair.refresh_token),
            Err(TokenError::InvalidSignature)
        );
        assert_eq!(
            service.verify_refresh(&pair.access_token),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_revoked_token_is_rejected() {
        let service = test_service(Arc::new(SystemClock));
        let pair = service.issue_pair(&test_subject()).unwrap();

        assert!(service.verify_access(&pair.access_token).is_ok());
        service.revoke(&pair.access_token);
        assert_eq!(
            service.verify_access(&pair.access_token),
            Err(TokenError::Revoked)
        );

        // The refresh token of the same pair is unaffected.
        assert!(service.verify_refresh(&pair.refresh_token).is_ok());
    }

    #[test]
    fn test_revocation_checked_before_expiry() {
        let clock = Arc::new(ManualClock::new(1_700_000_000));
        let service = test_service(clock.clone());
        let pair = service.issue_pair(&test_subject()).unwrap();

        service.revoke(&pair.access_token);
        clock.advance(DEFAULT_ACCESS_TTL.as_secs() as i64 + 1);

        assert_eq!(
            service.verify_access(&pair.access_token),
            Err(TokenError::Revoked)
        );
    }

    #[test]
    fn test_access_token_expires_with_clock() {
        let clock = Arc::new(ManualClock::new(1_700_000_000));
        let service = test_service(clock.clone());
        let pair = service.issue_pair(&test_subject()).unwrap();

        clock.advance(DEFAULT_ACCESS_TTL.as_secs() as i64);
        assert_eq!(
            service.verify_access(&pair.access_token),
            Err(TokenError::Expired)
        );
        assert!(service.verify_refresh(&pair.refresh_token).is_ok());
    }

    #[test]
    fn test_zero_lifetime_tokens_are_expired() {
        let service = test_service(Arc::new(ManualClock::new(1_700_000_000)))
            .with_lifetimes(Duration::ZERO, Duration::ZERO);
        let pair = service.issue_pair(&test_subject()).unwrap();

        assert_eq!(pair.expires_in, 0);
        assert_eq!(
            service.verify_access(&pair.access_token),
            Err(TokenError::Expired)
        );
        assert_eq!(
            service.verify_refresh(&pair.refresh_token),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_revoke_garbage_does_not_fail() {
        let service = test_service(Arc::new(SystemClock));
        service.revoke("definitely-not-a-token");
        service.revoke("definitely-not-a-token");
        assert!(service.is_revoked("definitely-not-a-token"));
        assert_eq!(service.blacklist().len(), 1);
    }

    #[test]
    fn test_rotate_issues_new_pair_and_burns_old_refresh() {
        let service = test_service(Arc::new(SystemClock));
        let subject = test_subject();
        let pair = service.issue_pair(&subject).unwrap();

        let rotated = service.rotate(&pair.refresh_token).unwrap();
        assert_ne!(rotated.refresh_token, pair.refresh_token);

        let claims = service.verify_access(&rotated.access_token).unwrap();
        assert_eq!(claims.user_id().unwrap(), subject.user_id);

        assert_eq!(
            service.verify_refresh(&pair.refresh_token),
            Err(TokenError::Revoked)
        );
        assert_eq!(service.rotate(&pair.refresh_token), Err(TokenError::Revoked));
    }

    #[test]
    fn test_rotate_rejects_access_token() {
        let service = test_service(Arc::new(SystemClock));
        let pair = service.issue_pair(&test_subject()).unwrap();

        assert_eq!(
            service.rotate(&pair.access_token),
            Err(TokenError::InvalidSignature)
        );
        assert!(!service.is_revoked(&pair.access_token));
    }

    #[test]
    fn test_services_have_isolated_blacklists() {
        let first = test_service(Arc::new(SystemClock));
        let second = test_service(Arc::new(SystemClock));

        first.revoke("shared.token.value");
        assert!(first.is_revoked("shared.token.value"));
        assert!(!second.is_revoked("shared.token.value"));
    }
}
