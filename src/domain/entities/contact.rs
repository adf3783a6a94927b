use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    errors::ValidationFailure,
    utils::html::{escape_html, newlines_to_breaks},
};

/// Raw body of `POST /api/contact`. Every field is optional here so that a
/// missing field is reported as such instead of as a JSON error.
///
/// Only the upper bounds are enforced server side; format and minimum length
/// are the form's concern.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct ContactRequest {
    #[validate(length(max = 100))]
    pub name: Option<String>,

    #[validate(length(max = 255))]
    pub email: Option<String>,

    #[validate(length(max = 1000))]
    pub message: Option<String>,
}

/// A structurally valid submission with surrounding whitespace removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl TryFrom<ContactRequest> for ContactSubmission {
    type Error = ValidationFailure;

    fn try_from(request: ContactRequest) -> Result<Self, Self::Error> {
        let present = |field: &Option<String>| field.as_deref().is_some_and(|s| !s.is_empty());
        if !(present(&request.name) && present(&request.email) && present(&request.message)) {
            return Err(ValidationFailure::MissingFields);
        }

        request.validate()?;

        match (request.name, request.email, request.message) {
            (Some(name), Some(email), Some(message)) => Ok(ContactSubmission {
                name: name.trim().to_string(),
                email: email.trim().to_string(),
                message: message.trim().to_string(),
            }),
            _ => Err(ValidationFailure::MissingFields),
        }
    }
}

/// HTML-safe rendition of a submission, ready to embed in the email body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedContact {
    pub name: String,
    pub email: String,
    pub message_html: String,
}

impl From<&ContactSubmission> for SanitizedContact {
    fn from(submission: &ContactSubmission) -> Self {
        SanitizedContact {
            name: escape_html(&submission.name),
            email: escape_html(&submission.email),
            message_html: newlines_to_breaks(&escape_html(&submission.message)),
        }
    }
}

/// Row written to `contact_messages`. Holds the unescaped values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessageInsert {
    pub name: String,
    pub email: String,
    pub message: String,
    pub ip_address: Option<String>,
}

impl ContactMessageInsert {
    pub fn new(submission: ContactSubmission, ip_address: Option<String>) -> Self {
        ContactMessageInsert {
            name: submission.name,
            email: submission.email,
            message: submission.message,
            ip_address,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}

impl ContactResponse {
    pub fn sent() -> Self {
        ContactResponse {
            success: true,
            message: "Email sent successfully".to_string(),
        }
    }
}
