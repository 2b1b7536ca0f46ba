/*
 * Responsibility
 * - In-process AccountStore / MessageStore (no DATABASE_URL, tests)
 * - Data lives for the process lifetime only
 */
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::repos::account_repo::{
    Account, AccountStore, DEFAULT_PROFILE_PICTURE, NewAccount, ProfileUpdate,
};
use crate::repos::error::{RepoError, RepoResult};
use crate::repos::message_repo::{
    ContactMessage, Feedback, MessageStore, NewContactMessage, NewFeedback,
};

#[derive(Debug, Default)]
pub struct MemoryStore {
    // keyed by email
    accounts: RwLock<HashMap<String, Account>>,
    feedback: RwLock<Vec<Feedback>>,
    contacts: RwLock<Vec<ContactMessage>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether an account was removed.
    pub async fn remove_account(&self, email: &str) -> bool {
        self.accounts.write().await.remove(email).is_some()
    }

    pub async fn feedback(&self) -> Vec<Feedback> {
        self.feedback.read().await.clone()
    }

    pub async fn contacts(&self) -> Vec<ContactMessage> {
        self.contacts.read().await.clone()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Account>> {
        Ok(self.accounts.read().await.get(email).cloned())
    }

    async fn exists(&self, email: &str) -> RepoResult<bool> {
        Ok(self.accounts.read().await.contains_key(email))
    }

    async fn create(&self, new: NewAccount) -> RepoResult<Account> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&new.email) {
            return Err(RepoError::Conflict);
        }

        let account = Account {
            id: Uuid::new_v4(),
            email: new.email,
            username: new.username,
            first_name: new.first_name,
            last_name: new.last_name,
            phone_number: new.phone_number,
            profile_picture: DEFAULT_PROFILE_PICTURE.to_string(),
            password_hash: new.password_hash,
            created_at: Utc::now(),
        };
        accounts.insert(account.email.clone(), account.clone());

        Ok(account)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: ProfileUpdate,
    ) -> RepoResult<Option<Account>> {
        let mut accounts = self.accounts.write().await;
        let Some(account) = accounts.values_mut().find(|a| a.id == id) else {
            return Ok(None);
        };

        update.apply_to(account);
        Ok(Some(account.clone()))
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn add_feedback(&self, new: NewFeedback) -> RepoResult<Feedback> {
        let row = Feedback {
            id: Uuid::new_v4(),
            account_id: new.account_id,
            message: new.message,
            rating: new.rating,
            created_at: Utc::now(),
        };
        self.feedback.write().await.push(row.clone());
        Ok(row)
    }

    async fn add_contact(&self, new: NewContactMessage) -> RepoResult<ContactMessage> {
        let row = ContactMessage {
            id: Uuid::new_v4(),
            full_name: new.full_name,
            email: new.email,
            message: new.message,
            created_at: Utc::now(),
        };
        self.contacts.write().await.push(row.clone());
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_account(email: &str) -> NewAccount {
        NewAccount {
            email: email.to_string(),
            username: NewAccount::username_for(email),
            first_name: None,
            last_name: None,
            phone_number: None,
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn create_find_and_remove() {
        let store = MemoryStore::new();
        assert!(!store.exists("a@example.com").await.unwrap());

        let created = store.create(new_account("a@example.com")).await.unwrap();
        assert_eq!(created.username, "a");
        assert_eq!(created.profile_picture, DEFAULT_PROFILE_PICTURE);

        let found = store.find_by_email("a@example.com").await.unwrap();
        assert_eq!(found, Some(created));

        assert!(store.remove_account("a@example.com").await);
        assert!(!store.remove_account("a@example.com").await);
        assert!(store.find_by_email("a@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = MemoryStore::new();
        store.create(new_account("a@example.com")).await.unwrap();

        let err = store.create(new_account("a@example.com")).await.unwrap_err();
        assert!(matches!(err, RepoError::Conflict));
    }

    #[tokio::test]
    async fn update_profile_of_missing_account_is_none() {
        let store = MemoryStore::new();
        let out = store
            .update_profile(Uuid::new_v4(), ProfileUpdate::default())
            .await
            .unwrap();
        assert!(out.is_none());
    }
}
