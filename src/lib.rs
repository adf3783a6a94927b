use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod client;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod telemetry;
pub mod graceful_shutdown;
pub mod background_task;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::{db, email, limiter, utils};

use email::resend::ResendMailer;
use entities::email::Mailbox;
use limiter::rate_limiter::RateLimitStore;
use repositories::{contact::ContactRepository, mailer::EmailSender, sqlx_repo::SqlxContactRepo};
use use_cases::contact::ContactHandler;

pub struct AppState<R = SqlxContactRepo, E = ResendMailer>
where
    R: ContactRepository,
    E: EmailSender,
{
    pub contact_handler: ContactHandler<R, E>,
}

impl AppState {
    pub fn new(
        config: &settings::AppConfig,
        pool: Option<sqlx::PgPool>,
        limiter: Arc<dyn RateLimitStore>,
    ) -> Self {
        let contact_repo = SqlxContactRepo::new(pool);
        let mailer = ResendMailer::new(config);
        let mailbox = Mailbox::from(config);

        AppState {
            contact_handler: ContactHandler::new(contact_repo, mailer, limiter, mailbox),
        }
    }
}

impl<R, E> AppState<R, E>
where
    R: ContactRepository,
    E: EmailSender,
{
    pub fn with_handler(contact_handler: ContactHandler<R, E>) -> Self {
        AppState { contact_handler }
    }
}
