/// Factory: build the token codec and password hasher from application `Config`.
use std::sync::Arc;

use chrono::Duration;

use crate::config::Config;
use crate::error::AppError;
use crate::services::auth::{PasswordHasher, TokenCodec};
use crate::services::clock::{Clock, SystemClock};

pub fn build_token_codec(config: &Config) -> Arc<TokenCodec> {
    build_token_codec_with_clock(config, Arc::new(SystemClock))
}

pub fn build_token_codec_with_clock(config: &Config, clock: Arc<dyn Clock>) -> Arc<TokenCodec> {
    let ttl = Duration::seconds(config.token_ttl_seconds);
    Arc::new(TokenCodec::new(config.token_secret.as_bytes(), ttl, clock))
}

pub fn build_password_hasher(config: &Config) -> Result<Arc<PasswordHasher>, AppError> {
    let hasher = PasswordHasher::new(config.bcrypt_cost).map_err(|e| {
        tracing::error!(error = %e, cost = config.bcrypt_cost, "failed to initialize password hasher");
        AppError::Internal
    })?;

    Ok(Arc::new(hasher))
}
