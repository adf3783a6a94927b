use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse
};
use derive_more::Display;
use serde_json::json;

pub const RATE_LIMITED_MESSAGE: &str = "Too many requests. Please try again later.";
pub const EMAIL_FAILED_MESSAGE: &str = "Failed to send email. Please try again later.";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Errors raised by storage and other backing services.
#[derive(Debug, Display)]
pub enum AppError {
    #[display("Database error: {_0}")]
    Database(String),

    #[display("Not configured: {_0}")]
    NotConfigured(String),
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

/// Structural problems with a submitted contact payload.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum ValidationFailure {
    #[display("Missing required fields")]
    MissingFields,

    #[display("Input too long")]
    InputTooLong,
}

impl From<validator::ValidationErrors> for ValidationFailure {
    fn from(_: validator::ValidationErrors) -> Self {
        ValidationFailure::InputTooLong
    }
}

#[derive(Debug, Display)]
pub enum EmailError {
    #[display("Email provider not configured: {_0}")]
    NotConfigured(String),

    #[display("Email provider rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[display("Email transport error: {_0}")]
    Transport(String),
}

impl std::error::Error for EmailError {}

impl From<reqwest::Error> for EmailError {
    fn from(err: reqwest::Error) -> Self {
        EmailError::Transport(err.to_string())
    }
}

/// Everything that can end a contact submission. `Display` carries the full
/// detail for the log stream; the HTTP body only ever carries a generic message.
#[derive(Debug, Display)]
pub enum ContactError {
    #[display("Validation error: {_0}")]
    Validation(ValidationFailure),

    #[display("Rate limit exceeded for client {client_id}")]
    RateLimitExceeded { client_id: String },

    #[display("Email dispatch failed: {_0}")]
    EmailDispatchFailure(EmailError),

    #[display("Persistence failed: {_0}")]
    PersistenceFailure(AppError),

    #[display("Unexpected failure: {_0}")]
    UnexpectedFailure(String),
}

impl std::error::Error for ContactError {}

impl From<ValidationFailure> for ContactError {
    fn from(failure: ValidationFailure) -> Self {
        ContactError::Validation(failure)
    }
}

impl From<EmailError> for ContactError {
    fn from(err: EmailError) -> Self {
        ContactError::EmailDispatchFailure(err)
    }
}

impl ResponseError for ContactError {
    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ContactError::Validation(failure) => json!({ "error": failure.to_string() }),
            ContactError::RateLimitExceeded { .. } => json!({ "error": RATE_LIMITED_MESSAGE }),
            ContactError::EmailDispatchFailure(_) => json!({
                "error": EMAIL_FAILED_MESSAGE,
                "code": "EMAIL_SEND_FAILED"
            }),
            ContactError::PersistenceFailure(_) | ContactError::UnexpectedFailure(_) => json!({
                "error": INTERNAL_ERROR_MESSAGE,
                "code": "INTERNAL_ERROR"
            }),
        };

        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ContactError::Validation(_) => StatusCode::BAD_REQUEST,
            ContactError::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            ContactError::EmailDispatchFailure(_)
            | ContactError::PersistenceFailure(_)
            | ContactError::UnexpectedFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Failure of the browser-side submit call.
#[derive(Debug, Display)]
pub enum SubmitError {
    #[display("Contact endpoint answered with status {_0}")]
    Status(u16),

    #[display("Network error: {_0}")]
    Network(String),
}

impl std::error::Error for SubmitError {}

impl From<reqwest::Error> for SubmitError {
    fn from(err: reqwest::Error) -> Self {
        SubmitError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_json(err: ContactError) -> (StatusCode, serde_json::Value) {
        let response = err.error_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn validation_errors_map_to_400_with_failure_text() {
        let (status, body) = body_json(ValidationFailure::MissingFields.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Missing required fields" }));

        let (_, body) = body_json(ValidationFailure::InputTooLong.into()).await;
        assert_eq!(body, json!({ "error": "Input too long" }));
    }

    #[actix_web::test]
    async fn rate_limit_maps_to_429() {
        let err = ContactError::RateLimitExceeded { client_id: "203.0.113.7".into() };
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["error"], RATE_LIMITED_MESSAGE);
    }

    #[actix_web::test]
    async fn email_failure_hides_provider_detail() {
        let err = EmailError::Rejected {
            status: 422,
            body: r#"{"message":"invalid api key re_secret"}"#.into(),
        };
        let (status, body) = body_json(err.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "EMAIL_SEND_FAILED");
        assert!(!body.to_string().contains("re_secret"));
    }

    #[test]
    fn sqlx_errors_become_database_errors() {
        assert!(matches!(AppError::from(sqlx::Error::RowNotFound), AppError::Database(_)));
    }

    #[actix_web::test]
    async fn unexpected_failure_is_generic() {
        let err = ContactError::UnexpectedFailure("stack trace here".into());
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], INTERNAL_ERROR_MESSAGE);
        assert!(!body.to_string().contains("stack trace"));
    }
}
