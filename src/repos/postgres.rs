/*
 * Responsibility
 * - accounts / feedback / contact_messages テーブル向け SQLx 操作
 * - PgPool を受け取り AccountStore / MessageStore を実装する
 * - unique violation は RepoError::Conflict に変換する
 */
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::repos::account_repo::{
    Account, AccountStore, DEFAULT_PROFILE_PICTURE, NewAccount, ProfileUpdate,
};
use crate::repos::error::{RepoError, RepoResult};
use crate::repos::message_repo::{
    ContactMessage, Feedback, MessageStore, NewContactMessage, NewFeedback,
};

#[derive(Debug, Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.db).await
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Account>> {
        let row = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, email, username, first_name, last_name, phone_number,
                   profile_picture, password_hash, created_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(row)
    }

    async fn exists(&self, email: &str) -> RepoResult<bool> {
        let found: bool =
            sqlx::query_scalar(r#"SELECT EXISTS (SELECT 1 FROM accounts WHERE email = $1)"#)
                .bind(email)
                .fetch_one(&self.db)
                .await?;

        Ok(found)
    }

    async fn create(&self, new: NewAccount) -> RepoResult<Account> {
        let row = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts
                (id, email, username, first_name, last_name, phone_number,
                 profile_picture, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, email, username, first_name, last_name, phone_number,
                      profile_picture, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.email)
        .bind(&new.username)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.phone_number)
        .bind(DEFAULT_PROFILE_PICTURE)
        .bind(&new.password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(row)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: ProfileUpdate,
    ) -> RepoResult<Option<Account>> {
        let row = sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
            SET
                first_name   = COALESCE($2, first_name),
                last_name    = COALESCE($3, last_name),
                username     = COALESCE($4, username),
                phone_number = COALESCE($5, phone_number)
            WHERE id = $1
            RETURNING id, email, username, first_name, last_name, phone_number,
                      profile_picture, password_hash, created_at
            "#,
        )
        .bind(id)
        .bind(update.first_name)
        .bind(update.last_name)
        .bind(update.username)
        .bind(update.phone_number)
        .fetch_optional(&self.db)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(row)
    }
}

#[async_trait]
impl MessageStore for PgStore {
    async fn add_feedback(&self, new: NewFeedback) -> RepoResult<Feedback> {
        let row = sqlx::query_as::<_, Feedback>(
            r#"
            INSERT INTO feedback (id, account_id, message, rating)
            VALUES ($1, $2, $3, $4)
            RETURNING id, account_id, message, rating, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.account_id)
        .bind(&new.message)
        .bind(new.rating)
        .fetch_one(&self.db)
        .await?;

        Ok(row)
    }

    async fn add_contact(&self, new: NewContactMessage) -> RepoResult<ContactMessage> {
        let row = sqlx::query_as::<_, ContactMessage>(
            r#"
            INSERT INTO contact_messages (id, full_name, email, message)
            VALUES ($1, $2, $3, $4)
            RETURNING id, full_name, email, message, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.full_name)
        .bind(&new.email)
        .bind(&new.message)
        .fetch_one(&self.db)
        .await?;

        Ok(row)
    }
}
