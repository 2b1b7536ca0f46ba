/*
 * Responsibility
 * - Config読み込み → 依存生成 → Router 組み立て
 * - Middleware の適用 (CORS / security headers / HTTP layers)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::middleware;
use crate::repos::{AccountStore, MemoryStore, MessageStore, PgStore};
use crate::services::auth::factory::{build_password_hasher, build_token_codec};
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,account_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Always surface panics via tracing; stderr may not be captured.
        tracing::error!(?info, "panic");

        // Development: crash the whole process so it gets noticed.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub async fn build_state(config: &Config) -> Result<AppState> {
    let (accounts, messages): (Arc<dyn AccountStore>, Arc<dyn MessageStore>) =
        match &config.database_url {
            Some(url) => {
                let pool = PgPoolOptions::new()
                    .max_connections(10)
                    .connect(url)
                    .await
                    .context("failed to connect to DATABASE_URL")?;
                let store = Arc::new(PgStore::new(pool));
                store.migrate().await.context("failed to run migrations")?;
                let accounts: Arc<dyn AccountStore> = store.clone();
                let messages: Arc<dyn MessageStore> = store;
                (accounts, messages)
            }
            None => {
                tracing::warn!("DATABASE_URL not set; using in-memory store (data is not persisted)");
                let store = Arc::new(MemoryStore::new());
                let accounts: Arc<dyn AccountStore> = store.clone();
                let messages: Arc<dyn MessageStore> = store;
                (accounts, messages)
            }
        };

    let tokens = build_token_codec(config);
    let passwords = build_password_hasher(config)?;

    tracing::info!(
        key_id = tokens.key_id(),
        token_ttl_seconds = tokens.ttl_seconds(),
        bcrypt_cost = passwords.cost(),
        "auth configured"
    );

    Ok(AppState::new(tokens, passwords, accounts, messages))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    let router = middleware::security_headers::apply(router);
    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router)
}
