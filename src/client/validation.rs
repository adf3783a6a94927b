use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_EMAIL_CHARS, MAX_MESSAGE_CHARS, MAX_NAME_CHARS, MIN_MESSAGE_CHARS};

use super::messages::Language;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

/// What the visitor typed into the contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactFields {
    pub fn new(name: impl Into<String>, email: impl Into<String>, message: impl Into<String>) -> Self {
        ContactFields {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    /// Copy with surrounding whitespace removed, as sent over the wire.
    pub fn trimmed(&self) -> Self {
        ContactFields::new(self.name.trim(), self.email.trim(), self.message.trim())
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Message => &self.message,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            Field::Message => self.message = value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Message,
}

/// The rule a field broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldIssue {
    NameRequired,
    NameTooLong,
    EmailRequired,
    EmailInvalid,
    EmailTooLong,
    MessageRequired,
    MessageTooShort,
    MessageTooLong,
}

impl FieldIssue {
    pub fn text(self, language: Language) -> &'static str {
        use FieldIssue::*;
        match language {
            Language::English => match self {
                NameRequired => "Name is required",
                NameTooLong => "Name must be 100 characters or fewer",
                EmailRequired => "Email is required",
                EmailInvalid => "Please enter a valid email address",
                EmailTooLong => "Email must be 255 characters or fewer",
                MessageRequired => "Message is required",
                MessageTooShort => "Message must be at least 10 characters",
                MessageTooLong => "Message must be 1000 characters or fewer",
            },
            Language::Spanish => match self {
                NameRequired => "El nombre es obligatorio",
                NameTooLong => "El nombre debe tener 100 caracteres o menos",
                EmailRequired => "El correo electrónico es obligatorio",
                EmailInvalid => "Introduce un correo electrónico válido",
                EmailTooLong => "El correo electrónico debe tener 255 caracteres o menos",
                MessageRequired => "El mensaje es obligatorio",
                MessageTooShort => "El mensaje debe tener al menos 10 caracteres",
                MessageTooLong => "El mensaje debe tener 1000 caracteres o menos",
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub issue: FieldIssue,
    pub message: &'static str,
}

impl FieldError {
    fn new(issue: FieldIssue, language: Language) -> Self {
        FieldError { issue, message: issue.text(language) }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub name: Option<FieldError>,
    pub email: Option<FieldError>,
    pub message: Option<FieldError>,
}

impl FieldErrors {
    pub fn get(&self, field: Field) -> Option<FieldError> {
        match field {
            Field::Name => self.name,
            Field::Email => self.email,
            Field::Message => self.message,
        }
    }

    pub fn clear(&mut self, field: Field) {
        match field {
            Field::Name => self.name = None,
            Field::Email => self.email = None,
            Field::Message => self.message = None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.message.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: FieldErrors,
}

/// Checks every field and reports the first broken rule of each. Lengths are
/// counted in characters after trimming.
pub fn validate(fields: &ContactFields, language: Language) -> ValidationResult {
    let errors = FieldErrors {
        name: name_issue(fields.name.trim()).map(|issue| FieldError::new(issue, language)),
        email: email_issue(fields.email.trim()).map(|issue| FieldError::new(issue, language)),
        message: message_issue(fields.message.trim()).map(|issue| FieldError::new(issue, language)),
    };

    ValidationResult {
        valid: errors.is_empty(),
        errors,
    }
}

fn name_issue(name: &str) -> Option<FieldIssue> {
    if name.is_empty() {
        Some(FieldIssue::NameRequired)
    } else if name.chars().count() > MAX_NAME_CHARS {
        Some(FieldIssue::NameTooLong)
    } else {
        None
    }
}

fn email_issue(email: &str) -> Option<FieldIssue> {
    if email.is_empty() {
        Some(FieldIssue::EmailRequired)
    } else if !EMAIL_PATTERN.is_match(email) {
        Some(FieldIssue::EmailInvalid)
    } else if email.chars().count() > MAX_EMAIL_CHARS {
        Some(FieldIssue::EmailTooLong)
    } else {
        None
    }
}

fn message_issue(message: &str) -> Option<FieldIssue> {
    let len = message.chars().count();
    if message.is_empty() {
        Some(FieldIssue::MessageRequired)
    } else if len < MIN_MESSAGE_CHARS {
        Some(FieldIssue::MessageTooShort)
    } else if len > MAX_MESSAGE_CHARS {
        Some(FieldIssue::MessageTooLong)
    } else {
        None
    }
}
