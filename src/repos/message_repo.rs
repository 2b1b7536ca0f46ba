/*
 * Responsibility
 * - Feedback (authenticated) and contact messages (public)
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::repos::error::RepoResult;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Feedback {
    pub id: Uuid,
    pub account_id: Uuid,
    pub message: String,
    pub rating: i16,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub account_id: Uuid,
    pub message: String,
    pub rating: i16,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ContactMessage {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewContactMessage {
    pub full_name: String,
    pub email: String,
    pub message: String,
}

#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn add_feedback(&self, new: NewFeedback) -> RepoResult<Feedback>;

    async fn add_contact(&self, new: NewContactMessage) -> RepoResult<ContactMessage>;
}
