//! Bearer token codec: issue and verify HS256-signed access tokens.
//!
//! Wire format is a compact JWS (`header.payload.signature`, base64url).
//! - header: `alg = HS256`, `typ = JWT`, `kid` = fingerprint of the signing key
//! - payload: `email`, `iat`, `exp`, `ver`
//!
//! Expiry is checked here against the injected clock, not by jsonwebtoken,
//! so the boundary is exact: a token is expired at `now >= exp`.
use std::{fmt, sync::Arc};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Duration;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, error};

use crate::services::auth::error::AuthError;
use crate::services::clock::Clock;

/// Current payload format version.
pub const TOKEN_VERSION: u8 = 1;

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub email: String,
    pub iat: i64,
    pub exp: i64,
    pub ver: u8,
}

#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    key_id: String,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("TokenCodec")
            .field("key_id", &self.key_id)
            .field("ttl_seconds", &self.ttl.num_seconds())
            .field("clock", &self.clock)
            .finish()
    }
}

impl TokenCodec {
    pub fn new(secret: &[u8], ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        // Signature and algorithm only; `exp` is checked against `clock`.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            key_id: key_fingerprint(secret),
            ttl,
            clock,
        }
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// Issue a token binding `claim` (an account email) for the configured TTL.
    pub fn issue(&self, claim: &str) -> Result<String, AuthError> {
        if claim.trim().is_empty() {
            return Err(AuthError::EmptyClaim);
        }

        let now = self.clock.now().timestamp();
        let claims = TokenClaims {
            email: claim.to_string(),
            iat: now,
            exp: now + self.ttl.num_seconds(),
            ver: TOKEN_VERSION,
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        header.kid = Some(self.key_id.clone());

        jsonwebtoken::encode(&header, &claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign access token");
            AuthError::Signing
        })
    }

    /// Verify signature, format and expiry, then return the claims.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                let mapped = classify(e.kind());
                debug!(error = %e, kind = mapped.code(), "token rejected");
                mapped
            })?;

        // Signed by this process, but under a different key id.
        if data.header.kid.as_deref() != Some(self.key_id.as_str()) {
            return Err(AuthError::InvalidSignature);
        }

        let claims = data.claims;
        if claims.ver != TOKEN_VERSION || claims.email.trim().is_empty() || claims.exp <= claims.iat
        {
            return Err(AuthError::MalformedToken);
        }

        if self.clock.now().timestamp() >= claims.exp {
            return Err(AuthError::Expired);
        }

        Ok(claims)
    }
}

// Anything that is not clearly a decoding problem counts as a signature
// failure so unexpected library faults never pass.
fn classify(kind: &ErrorKind) -> AuthError {
    match kind {
        ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) => {
            AuthError::MalformedToken
        }
        _ => AuthError::InvalidSignature,
    }
}

fn key_fingerprint(secret: &[u8]) -> String {
    let digest = Sha256::digest(secret);
    URL_SAFE_NO_PAD.encode(&digest[..12])
}
