/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - 公開ルートと auth gate の後ろのルートを分けて組み立てる
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::auth::access;
use crate::state::AppState;

use crate::api::v1::handlers::{
    feedback::{add_contactus, add_feedback},
    health::health,
    users::{edit_user_details, login, register, user_details},
};

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/users/user_details", get(user_details))
        .route("/users/edit_user_details", post(edit_user_details))
        .route("/add_feedback", post(add_feedback));
    let protected = access::apply(protected, state);

    Router::new()
        .route("/health", get(health))
        .route("/users/register", post(register))
        .route("/users/login", post(login))
        .route("/add_contactus", post(add_contactus))
        .merge(protected)
}
