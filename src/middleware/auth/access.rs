//! Access-token gate for protected routes.
//!
//! `Authorization: Bearer <token>` → `AuthGate::authorize` → `AuthCtx` in
//! request extensions. Handlers take `AuthCtxExtractor`; nothing else reads
//! the header.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

/// Put the gate in front of every route registered on `router` so far.
///
/// `route_layer` keeps unmatched paths on the normal 404 path instead of
/// answering them with 401.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // A header that is present but not visible ASCII is treated as empty,
    // which the gate rejects as malformed.
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .map(|v| v.to_str().unwrap_or_default());

    let account = match state.gate.authorize(header_value).await {
        Ok(account) => account,
        Err(err) => {
            tracing::warn!(
                code = err.code(),
                method = %req.method(),
                path = %req.uri().path(),
                "request rejected by auth gate"
            );
            return Err(err.into());
        }
    };

    tracing::debug!(account_id = %account.id, "request authenticated");

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(AuthCtx::new(account));

    Ok(next.run(req).await)
}
