//! Authorization gate: `Authorization` header → verified token → account.
//!
//! Every protected route goes through `AuthGate::authorize` exactly once, via
//! `middleware::auth::access`. Handlers never look at the header themselves.
use std::{fmt, sync::Arc};

use tracing::error;

use crate::repos::{Account, AccountStore};
use crate::services::auth::error::AuthError;
use crate::services::auth::token::TokenCodec;

pub const BEARER_SCHEME: &str = "Bearer";

#[derive(Clone)]
pub struct AuthGate {
    tokens: Arc<TokenCodec>,
    accounts: Arc<dyn AccountStore>,
}

impl fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthGate")
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

impl AuthGate {
    pub fn new(tokens: Arc<TokenCodec>, accounts: Arc<dyn AccountStore>) -> Self {
        Self { tokens, accounts }
    }

    /// Resolve the account behind a raw `Authorization` header value.
    ///
    /// Codec errors are propagated unchanged. A deleted account is
    /// `AccountNotFound`; a failing store is `StoreUnavailable`. Neither
    /// ever yields an identity.
    pub async fn authorize(&self, header_value: Option<&str>) -> Result<Account, AuthError> {
        let header_value = header_value.ok_or(AuthError::MissingCredential)?;
        let token = parse_bearer(header_value)?;
        let claims = self.tokens.verify(token)?;

        self.accounts
            .find_by_email(&claims.email)
            .await
            .map_err(|e| {
                error!(error = %e, "account lookup failed during authorization");
                AuthError::StoreUnavailable
            })?
            .ok_or(AuthError::AccountNotFound)
    }
}

/// Split `"<scheme> <token>"`. The scheme must be `Bearer` (any case) and
/// there must be exactly one token segment.
pub fn parse_bearer(header_value: &str) -> Result<&str, AuthError> {
    let mut parts = header_value.split_whitespace();

    let (Some(scheme), Some(token), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(AuthError::MalformedHeader);
    };

    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return Err(AuthError::MalformedHeader);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::repos::{MemoryStore, NewAccount};
    use crate::services::clock::ManualClock;

    const SECRET: &[u8] = b"an-authorization-gate-test-secret";

    struct Fixture {
        gate: AuthGate,
        tokens: Arc<TokenCodec>,
        store: Arc<MemoryStore>,
        clock: Arc<ManualClock>,
    }

    async fn fixture(ttl_seconds: i64) -> Fixture {
        let clock = Arc::new(ManualClock::at_unix(1_700_000_000));
        let tokens = Arc::new(TokenCodec::new(
            SECRET,
            Duration::seconds(ttl_seconds),
            clock.clone(),
        ));
        let store = Arc::new(MemoryStore::new());
        store
            .create(NewAccount {
                email: "a@example.com".into(),
                username: "a".into(),
                first_name: None,
                last_name: None,
                phone_number: None,
                password_hash: "unused".into(),
            })
            .await
            .unwrap();

        let gate = AuthGate::new(tokens.clone(), store.clone());
        Fixture {
            gate,
            tokens,
            store,
            clock,
        }
    }

    #[test]
    fn parse_bearer_shapes() {
        assert_eq!(parse_bearer("Bearer abc"), Ok("abc"));
        assert_eq!(parse_bearer("bearer abc"), Ok("abc"));
        assert_eq!(parse_bearer("  Bearer   abc  "), Ok("abc"));

        for bad in ["", "   ", "Bearer", "Bearer ", "abc", "Basic abc", "Bearer a b"] {
            assert_eq!(parse_bearer(bad), Err(AuthError::MalformedHeader), "{bad:?}");
        }
    }

    #[tokio::test]
    async fn missing_header_is_missing_credential() {
        let fx = fixture(3600).await;
        assert_eq!(
            fx.gate.authorize(None).await,
            Err(AuthError::MissingCredential)
        );
    }

    #[tokio::test]
    async fn scheme_without_token_is_malformed_header() {
        let fx = fixture(3600).await;
        assert_eq!(
            fx.gate.authorize(Some("Bearer")).await,
            Err(AuthError::MalformedHeader)
        );
    }

    #[tokio::test]
    async fn valid_token_resolves_account_then_expires() {
        let fx = fixture(3600).await;
        let token = fx.tokens.issue("a@example.com").unwrap();
        let header = format!("Bearer {token}");

        fx.clock.advance(Duration::seconds(1));
        let account = fx.gate.authorize(Some(&header)).await.unwrap();
        assert_eq!(account.email, "a@example.com");

        fx.clock.advance(Duration::seconds(3600));
        assert_eq!(
            fx.gate.authorize(Some(&header)).await,
            Err(AuthError::Expired)
        );
    }

    #[tokio::test]
    async fn deleted_account_is_not_authenticated() {
        let fx = fixture(3600).await;
        let token = fx.tokens.issue("a@example.com").unwrap();
        assert!(fx.store.remove_account("a@example.com").await);

        assert_eq!(
            fx.gate.authorize(Some(&format!("Bearer {token}"))).await,
            Err(AuthError::AccountNotFound)
        );
    }

    #[tokio::test]
    async fn codec_errors_propagate_unchanged() {
        let fx = fixture(3600).await;
        assert_eq!(
            fx.gate.authorize(Some("Bearer not-a-token")).await,
            Err(AuthError::MalformedToken)
        );

        let clock = Arc::new(ManualClock::at_unix(1_700_000_000));
        let foreign = TokenCodec::new(
            b"some-other-process-secret-value!",
            Duration::hours(1),
            clock,
        );
        let token = foreign.issue("a@example.com").unwrap();
        assert_eq!(
            fx.gate.authorize(Some(&format!("Bearer {token}"))).await,
            Err(AuthError::InvalidSignature)
        );
    }
}
