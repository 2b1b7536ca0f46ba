/*
 * Responsibility
 * - POST /add_feedback (auth gate の後ろ)
 * - POST /add_contactus (公開)
 */
use axum::{Json, extract::State};

use crate::{
    api::v1::{
        dto::messages::{ContactRequest, FeedbackRequest, MessageResponse},
        extractors::{ApiJson, AuthCtxExtractor},
    },
    error::AppError,
    repos::{NewContactMessage, NewFeedback},
    state::AppState,
};

pub async fn add_feedback(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    ApiJson(req): ApiJson<FeedbackRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let (message, rating) = req
        .validate()
        .map_err(|m| AppError::bad_request("INVALID_REQUEST", m))?;

    let row = state
        .messages
        .add_feedback(NewFeedback {
            account_id: ctx.account_id,
            message,
            rating,
        })
        .await?;

    tracing::info!(feedback_id = %row.id, account_id = %ctx.account_id, "feedback stored");

    Ok(Json(MessageResponse {
        success: true,
        message: "Feedback sent successfully",
    }))
}

pub async fn add_contactus(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ContactRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let (full_name, email, message) = req
        .validate()
        .map_err(|m| AppError::bad_request("INVALID_REQUEST", m))?;

    let row = state
        .messages
        .add_contact(NewContactMessage {
            full_name,
            email,
            message,
        })
        .await?;

    tracing::info!(contact_id = %row.id, "contact message stored");

    Ok(Json(MessageResponse {
        success: true,
        message: "Message sent successfully",
    }))
}
