/*
 * Responsibility
 * - Feedback / contact-us の request/response DTO
 */
use serde::{Deserialize, Serialize};

pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub message: Option<String>,
    pub rating: Option<i16>,
}

impl FeedbackRequest {
    pub fn validate(self) -> Result<(String, i16), &'static str> {
        let message = self
            .message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .ok_or("Feedback is required.")?;
        let rating = self.rating.ok_or("Rating is required.")?;
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err("Rating must be between 1 and 5.");
        }
        Ok((message, rating))
    }
}

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub message: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

impl ContactRequest {
    /// Returns (full_name, email, message).
    pub fn validate(self) -> Result<(String, String, String), &'static str> {
        let message = required(self.message).ok_or("Message is required.")?;
        let email = required(self.email).ok_or("Email is required.")?;
        let full_name = required(self.full_name).ok_or("Full name is required.")?;
        Ok((full_name, email, message))
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feedback_rating_range() {
        let req = |rating| FeedbackRequest {
            message: Some("great".into()),
            rating,
        };
        assert!(req(None).validate().is_err());
        assert!(req(Some(0)).validate().is_err());
        assert!(req(Some(6)).validate().is_err());
        assert_eq!(req(Some(5)).validate().unwrap(), ("great".to_string(), 5));
    }

    #[test]
    fn contact_fields_are_required_in_order() {
        let req = ContactRequest {
            message: None,
            email: None,
            full_name: None,
        };
        assert_eq!(req.validate().unwrap_err(), "Message is required.");

        let req = ContactRequest {
            message: Some("hi".into()),
            email: Some("a@example.com".into()),
            full_name: Some(" ".into()),
        };
        assert_eq!(req.validate().unwrap_err(), "Full name is required.");
    }
}
