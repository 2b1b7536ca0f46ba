/*
 * Responsibility
 * - Users の request/response DTO
 * - validate() で形式チェック (trim 済みの値を返す)
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::{Account, ProfileUpdate};
use crate::services::auth::password::MAX_PASSWORD_BYTES;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
}

/// Registration input after validation.
#[derive(Debug)]
pub struct ValidRegistration {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<ValidRegistration, &'static str> {
        let email = non_empty(self.email).ok_or("Missing mandatory fields: email.")?;
        if !email.contains('@') {
            return Err("email is invalid");
        }

        let password = self
            .password
            .filter(|p| !p.is_empty())
            .ok_or("Missing mandatory fields: password.")?;
        if password.len() > MAX_PASSWORD_BYTES {
            return Err("password must be at most 72 bytes");
        }

        Ok(ValidRegistration {
            email,
            password,
            first_name: non_empty(self.first_name),
            last_name: non_empty(self.last_name),
            phone_number: non_empty(self.phone_number),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    /// The email is trimmed; the password is compared exactly as registered.
    pub fn validate(self) -> Result<(String, String), &'static str> {
        let password = self.password.filter(|p| !p.is_empty());
        match (non_empty(self.email), password) {
            (Some(email), Some(password)) => Ok((email, password)),
            _ => Err("Missing email or password."),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

#[derive(Debug, Deserialize, Default)]
pub struct EditUserDetailsRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub phone_number: Option<String>,
}

impl EditUserDetailsRequest {
    /// Empty strings mean "leave unchanged".
    pub fn into_update(self) -> ProfileUpdate {
        ProfileUpdate {
            first_name: non_empty(self.first_name),
            last_name: non_empty(self.last_name),
            username: non_empty(self.username),
            phone_number: non_empty(self.phone_number),
        }
    }
}

/// Everything about an account except its password hash.
#[derive(Debug, Serialize)]
pub struct UserDetails {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub profile_picture: String,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for UserDetails {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            email: a.email,
            username: a.username,
            first_name: a.first_name,
            last_name: a.last_name,
            phone_number: a.phone_number,
            profile_picture: a.profile_picture,
            created_at: a.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserDetailsResponse {
    pub success: bool,
    pub message: &'static str,
    pub user_details: UserDetails,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(email: Option<&str>, password: Option<&str>) -> RegisterRequest {
        RegisterRequest {
            email: email.map(str::to_string),
            password: password.map(str::to_string),
            first_name: Some("  ".into()),
            last_name: Some(" Lee ".into()),
            phone_number: None,
        }
    }

    #[test]
    fn register_requires_email_and_password() {
        assert!(register(None, Some("pw")).validate().is_err());
        assert!(register(Some("   "), Some("pw")).validate().is_err());
        assert!(register(Some("no-at-sign"), Some("pw")).validate().is_err());
        assert!(register(Some("a@example.com"), None).validate().is_err());
        assert!(register(Some("a@example.com"), Some("")).validate().is_err());

        let long = "x".repeat(MAX_PASSWORD_BYTES + 1);
        assert!(register(Some("a@example.com"), Some(&long)).validate().is_err());
    }

    #[test]
    fn register_trims_fields() {
        let ok = register(Some("  a@example.com "), Some("pw")).validate().unwrap();
        assert_eq!(ok.email, "a@example.com");
        assert_eq!(ok.first_name, None);
        assert_eq!(ok.last_name.as_deref(), Some("Lee"));
    }

    #[test]
    fn login_trims_email_and_requires_both() {
        let req = LoginRequest {
            email: Some(" a@example.com ".into()),
            password: Some(" pw ".into()),
        };
        assert_eq!(
            req.validate().unwrap(),
            ("a@example.com".to_string(), " pw ".to_string())
        );

        let req = LoginRequest {
            email: Some("a@example.com".into()),
            password: Some(String::new()),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn edit_ignores_blank_fields() {
        let update = EditUserDetailsRequest {
            first_name: Some("".into()),
            username: Some("neo".into()),
            ..Default::default()
        }
        .into_update();

        assert_eq!(update.first_name, None);
        assert_eq!(update.username.as_deref(), Some("neo"));
    }
}
