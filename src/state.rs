/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::repos::{AccountStore, MessageStore};
use crate::services::auth::{AuthGate, PasswordHasher, TokenCodec};

#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<AuthGate>,
    pub tokens: Arc<TokenCodec>,
    pub passwords: Arc<PasswordHasher>,
    pub accounts: Arc<dyn AccountStore>,
    pub messages: Arc<dyn MessageStore>,
}

impl AppState {
    /// The gate reads through the same account store the handlers write to.
    pub fn new(
        tokens: Arc<TokenCodec>,
        passwords: Arc<PasswordHasher>,
        accounts: Arc<dyn AccountStore>,
        messages: Arc<dyn MessageStore>,
    ) -> Self {
        let gate = Arc::new(AuthGate::new(tokens.clone(), accounts.clone()));
        Self {
            gate,
            tokens,
            passwords,
            accounts,
            messages,
        }
    }
}
