/*
 * Responsibility
 * - /users 系 handler (register / login / user_details / edit_user_details)
 * - register / login は公開、それ以外は auth gate の後ろ
 * - login の失敗はすべて同じ 401 (アカウントの存在を漏らさない)
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::users::{
            EditUserDetailsRequest, LoginRequest, RegisterRequest, TokenResponse,
            UserDetailsResponse,
        },
        extractors::{ApiJson, AuthCtxExtractor, JsonOrForm},
    },
    error::AppError,
    repos::{NewAccount, RepoError},
    services::auth::{AuthError, password::MAX_PASSWORD_BYTES},
    state::AppState,
};

fn token_response(state: &AppState, message: &'static str, token: String) -> TokenResponse {
    TokenResponse {
        status: "success",
        message,
        token,
        token_type: "Bearer",
        expires_in: state.tokens.ttl_seconds(),
    }
}

pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    let req = req
        .validate()
        .map_err(|m| AppError::bad_request("INVALID_REQUEST", m))?;

    if state.accounts.exists(&req.email).await? {
        return Err(AppError::conflict("ACCOUNT_EXISTS", "User already exists!"));
    }

    let password_hash = state.passwords.hash_blocking(req.password).await?;

    // Issue before persisting so a signing fault leaves no orphaned account.
    let token = state.tokens.issue(&req.email)?;

    let account = state
        .accounts
        .create(NewAccount {
            username: NewAccount::username_for(&req.email),
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            phone_number: req.phone_number,
            password_hash,
        })
        .await
        .map_err(|e| match e {
            // lost a race with a concurrent registration
            RepoError::Conflict => AppError::conflict("ACCOUNT_EXISTS", "User already exists!"),
            other => {
                tracing::error!(error = %other, "failed to create account");
                AppError::Internal
            }
        })?;

    tracing::info!(account_id = %account.id, "account registered");

    Ok((
        StatusCode::CREATED,
        Json(token_response(
            &state,
            "User registered successfully",
            token,
        )),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let (email, password) = req
        .validate()
        .map_err(|m| AppError::bad_request("INVALID_REQUEST", m))?;

    let account = state.accounts.find_by_email(&email).await.map_err(|e| {
        tracing::error!(error = %e, "account lookup failed during login");
        AppError::Internal
    })?;

    // bcrypt ignores bytes past the limit, so a longer password could match
    // one it only shares a prefix with.
    let within_limit = password.len() <= MAX_PASSWORD_BYTES;

    // Run bcrypt either way so unknown emails cost the same as wrong passwords.
    let stored_hash = account.as_ref().map(|a| a.password_hash.clone());
    let matched = state.passwords.check_blocking(password, stored_hash).await;

    let account = match account {
        Some(account) if matched && within_limit => account,
        _ => {
            tracing::info!("login rejected");
            return Err(AppError::InvalidCredentials);
        }
    };

    tracing::info!(account_id = %account.id, "login succeeded");

    let token = state.tokens.issue(&account.email)?;
    Ok(Json(token_response(&state, "Login successful.", token)))
}

pub async fn user_details(
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Json<UserDetailsResponse> {
    Json(UserDetailsResponse {
        success: true,
        message: "User details fetched successfully.",
        user_details: ctx.account.into(),
    })
}

pub async fn edit_user_details(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    JsonOrForm(req): JsonOrForm<EditUserDetailsRequest>,
) -> Result<Json<UserDetailsResponse>, AppError> {
    let update = req.into_update();

    let account = if update.is_empty() {
        ctx.account
    } else {
        let updated = state
            .accounts
            .update_profile(ctx.account_id, update)
            .await?
            // deleted between the gate and the update
            .ok_or(AuthError::AccountNotFound)?;
        tracing::debug!(account_id = %updated.id, "profile updated");
        updated
    };

    Ok(Json(UserDetailsResponse {
        success: true,
        message: "User details edited successfully.",
        user_details: account.into(),
    }))
}
