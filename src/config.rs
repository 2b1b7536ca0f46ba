/*
 * Responsibility
 * - Read configuration from the environment (.env supported)
 * - Validate values; anything missing or invalid fails startup
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::services::auth::password::BCRYPT_COST;

/// HS256 keys shorter than the digest size are rejected.
pub const MIN_TOKEN_SECRET_BYTES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // None → in-memory store (development only)
    pub database_url: Option<String>,
    pub cors_allowed_origins: Vec<String>,

    pub token_secret: String,
    pub token_ttl_seconds: i64,
    pub bcrypt_cost: u32,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("token_secret", &"<redacted>")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port: u16 = match var("PORT") {
            Some(s) => s.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(var("APP_ENV"));

        let database_url = var("DATABASE_URL").filter(|s| !s.trim().is_empty());
        if database_url.is_none() && app_env.is_production() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let token_secret = var("TOKEN_SECRET").ok_or(ConfigError::Missing("TOKEN_SECRET"))?;
        if token_secret.len() < MIN_TOKEN_SECRET_BYTES {
            return Err(ConfigError::Invalid("TOKEN_SECRET"));
        }

        let token_ttl_seconds = match var("TOKEN_TTL_SECONDS") {
            Some(s) => s
                .parse::<i64>()
                .ok()
                // upper bound keeps `iat + ttl` far from overflow
                .filter(|v| (1..=31_536_000).contains(v))
                .ok_or(ConfigError::Invalid("TOKEN_TTL_SECONDS"))?,
            None => 86_400, // 1 day
        };

        let bcrypt_cost = match var("BCRYPT_COST") {
            Some(s) => s
                .parse::<u32>()
                .ok()
                .filter(|v| (4..=31).contains(v))
                .ok_or(ConfigError::Invalid("BCRYPT_COST"))?,
            None => BCRYPT_COST,
        };

        Ok(Self {
            addr,
            app_env,
            database_url,
            cors_allowed_origins,
            token_secret,
            token_ttl_seconds,
            bcrypt_cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_with_only_secret() {
        let config = load(&[("TOKEN_SECRET", SECRET)]).unwrap();

        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert!(config.database_url.is_none());
        assert!(config.cors_allowed_origins.is_empty());
        assert_eq!(config.token_ttl_seconds, 86_400);
        assert_eq!(config.bcrypt_cost, BCRYPT_COST);
    }

    #[test]
    fn secret_is_required_and_must_be_long_enough() {
        assert_eq!(load(&[]).unwrap_err(), ConfigError::Missing("TOKEN_SECRET"));
        assert_eq!(
            load(&[("TOKEN_SECRET", "short")]).unwrap_err(),
            ConfigError::Invalid("TOKEN_SECRET")
        );
    }

    #[test]
    fn production_requires_database() {
        let err = load(&[("TOKEN_SECRET", SECRET), ("APP_ENV", "production")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));

        let config = load(&[
            ("TOKEN_SECRET", SECRET),
            ("APP_ENV", "prod"),
            ("DATABASE_URL", "postgres://localhost/accounts"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, ,https://b.example"),
        ])
        .unwrap();
        assert!(config.app_env.is_production());
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn out_of_range_numbers_are_rejected() {
        for (key, value) in [
            ("PORT", "http"),
            ("TOKEN_TTL_SECONDS", "0"),
            ("TOKEN_TTL_SECONDS", "-5"),
            ("BCRYPT_COST", "3"),
            ("BCRYPT_COST", "32"),
        ] {
            let err = load(&[("TOKEN_SECRET", SECRET), (key, value)]).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{key}={value}");
        }
    }

    #[test]
    fn debug_redacts_secret() {
        let config = load(&[("TOKEN_SECRET", SECRET)]).unwrap();
        assert!(!format!("{config:?}").contains(SECRET));
    }
}
