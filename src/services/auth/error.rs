use thiserror::Error;

/// Why a credential was refused (or could not be produced).
///
/// The first six kinds are credential failures and always end the request
/// with 401. The remaining kinds are server-side faults; they never
/// authorize anything and surface as 500.
///
/// Display strings are stable and safe to return to clients: they never
/// carry signature bytes, key material or library error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("authorization header is required")]
    MissingCredential,
    #[error("authorization header must be of the form `Bearer <token>`")]
    MalformedHeader,
    #[error("token is malformed")]
    MalformedToken,
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("account not found")]
    AccountNotFound,

    #[error("cannot issue a token for an empty claim")]
    EmptyClaim,
    #[error("token signing failed")]
    Signing,
    #[error("account store unavailable")]
    StoreUnavailable,
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => "MISSING_CREDENTIAL",
            AuthError::MalformedHeader => "MALFORMED_HEADER",
            AuthError::MalformedToken => "MALFORMED_TOKEN",
            AuthError::InvalidSignature => "INVALID_SIGNATURE",
            AuthError::Expired => "TOKEN_EXPIRED",
            AuthError::AccountNotFound => "ACCOUNT_NOT_FOUND",
            AuthError::EmptyClaim => "EMPTY_CLAIM",
            AuthError::Signing => "SIGNING_FAILED",
            AuthError::StoreUnavailable => "STORE_UNAVAILABLE",
        }
    }

    pub fn is_credential_failure(&self) -> bool {
        matches!(
            self,
            AuthError::MissingCredential
                | AuthError::MalformedHeader
                | AuthError::MalformedToken
                | AuthError::InvalidSignature
                | AuthError::Expired
                | AuthError::AccountNotFound
        )
    }
}
