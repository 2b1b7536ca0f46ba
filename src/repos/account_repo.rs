/*
 * Responsibility
 * - Account record and the AccountStore contract
 * - The auth gate only reads through find_by_email; registration and
 *   profile edits go through create / update_profile
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::repos::error::RepoResult;

pub const DEFAULT_PROFILE_PICTURE: &str = "profile_pictures/default_male_image.png";

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub profile_picture: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub password_hash: String,
}

impl NewAccount {
    /// Username defaults to the local part of the email.
    pub fn username_for(email: &str) -> String {
        email.split('@').next().unwrap_or(email).to_string()
    }
}

/// Fields left as `None` are not touched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub phone_number: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.username.is_none()
            && self.phone_number.is_none()
    }

    pub fn apply_to(&self, account: &mut Account) {
        if let Some(v) = &self.first_name {
            account.first_name = Some(v.clone());
        }
        if let Some(v) = &self.last_name {
            account.last_name = Some(v.clone());
        }
        if let Some(v) = &self.username {
            account.username = v.clone();
        }
        if let Some(v) = &self.phone_number {
            account.phone_number = Some(v.clone());
        }
    }
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Account>>;

    async fn exists(&self, email: &str) -> RepoResult<bool>;

    /// `RepoError::Conflict` when the email is already taken.
    async fn create(&self, new: NewAccount) -> RepoResult<Account>;

    /// `Ok(None)` when the account no longer exists.
    async fn update_profile(&self, id: Uuid, update: ProfileUpdate)
    -> RepoResult<Option<Account>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_is_local_part() {
        assert_eq!(NewAccount::username_for("jane.doe@example.com"), "jane.doe");
        assert_eq!(NewAccount::username_for("no-at-sign"), "no-at-sign");
    }

    #[test]
    fn profile_update_only_touches_given_fields() {
        let mut account = Account {
            id: Uuid::new_v4(),
            email: "a@example.com".into(),
            username: "a".into(),
            first_name: Some("Ann".into()),
            last_name: None,
            phone_number: Some("123".into()),
            profile_picture: DEFAULT_PROFILE_PICTURE.into(),
            password_hash: "x".into(),
            created_at: Utc::now(),
        };

        let update = ProfileUpdate {
            last_name: Some("Lee".into()),
            username: Some("ann".into()),
            ..Default::default()
        };
        assert!(!update.is_empty());
        update.apply_to(&mut account);

        assert_eq!(account.first_name.as_deref(), Some("Ann"));
        assert_eq!(account.last_name.as_deref(), Some("Lee"));
        assert_eq!(account.username, "ann");
        assert_eq!(account.phone_number.as_deref(), Some("123"));
        assert!(ProfileUpdate::default().is_empty());
    }
}
