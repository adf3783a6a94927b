#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::NormalizePath,
    web, App, Error,
};
use async_trait::async_trait;
use mockall::mock;
use portfolio_contact::{
    entities::{contact::ContactMessageInsert, email::{Mailbox, OutboundEmail}},
    errors::{AppError, EmailError},
    limiter::rate_limiter::{InMemoryRateLimiter, RateLimitPolicy},
    middlewares::cors::{cors_headers, cors_layer},
    repositories::{contact::ContactRepository, mailer::EmailSender},
    routes::configure_routes,
    use_cases::contact::ContactHandler,
    AppState,
};
use serde_json::{json, Value};
use uuid::Uuid;

mock! {
    pub ContactRepo {}

    #[async_trait]
    impl ContactRepository for ContactRepo {
        async fn check_connection(&self) -> Result<(), AppError>;
        async fn insert_contact_message(&self, msg: &ContactMessageInsert) -> Result<Uuid, AppError>;
    }
}

mock! {
    pub Mailer {}

    #[async_trait]
    impl EmailSender for Mailer {
        async fn send(&self, email: &OutboundEmail) -> Result<String, EmailError>;
    }
}

pub const CONTACT_PATH: &str = "/api/contact";

pub fn test_mailbox() -> Mailbox {
    Mailbox {
        from: "Portfolio <contact@example.dev>".into(),
        to: "owner@example.dev".into(),
    }
}

pub fn test_limiter() -> InMemoryRateLimiter {
    InMemoryRateLimiter::new(RateLimitPolicy::new(5, Duration::from_secs(3600)))
}

pub fn valid_payload() -> Value {
    json!({
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "message": "Hello! I'd like to talk about a project."
    })
}

/// Mailer that accepts every message.
pub fn accepting_mailer() -> MockMailer {
    let mut mailer = MockMailer::new();
    mailer.expect_send().returning(|_| Ok("email_test_id".to_string()));
    mailer
}

/// Repository that stores every message.
pub fn accepting_repo() -> MockContactRepo {
    let mut repo = MockContactRepo::new();
    repo.expect_insert_contact_message().returning(|_| Ok(Uuid::new_v4()));
    repo.expect_check_connection().returning(|| Ok(()));
    repo
}

pub fn build_state(repo: MockContactRepo, mailer: MockMailer) -> web::Data<AppState<MockContactRepo, MockMailer>> {
    let handler = ContactHandler::new(repo, mailer, Arc::new(test_limiter()), test_mailbox());
    web::Data::new(AppState::with_handler(handler))
}

/// Same middleware stack and routes as the binary, over mocked collaborators.
pub fn test_app(
    state: web::Data<AppState<MockContactRepo, MockMailer>>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let origins = vec!["*".to_string()];

    App::new()
        .app_data(state)
        .wrap(cors_headers(&origins))
        .wrap(cors_layer(&origins))
        .wrap(NormalizePath::trim())
        .configure(configure_routes::<MockContactRepo, MockMailer>)
}
