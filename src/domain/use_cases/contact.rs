use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    constants::UNKNOWN_CLIENT,
    email::template::contact_notification,
    entities::{
        contact::{ContactMessageInsert, ContactRequest, ContactResponse, ContactSubmission},
        email::Mailbox,
    },
    errors::{ContactError, ValidationFailure},
    limiter::rate_limiter::{RateDecision, RateLimitStore},
    repositories::{contact::ContactRepository, mailer::EmailSender},
};

/// Server side of the contact form: rate limit, structural checks, escape,
/// notify the owner, then record the message if the store cooperates.
pub struct ContactHandler<R, E>
where
    R: ContactRepository,
    E: EmailSender,
{
    pub contact_repo: R,
    pub mailer: E,
    pub limiter: Arc<dyn RateLimitStore>,
    pub mailbox: Mailbox,
}

impl<R, E> ContactHandler<R, E>
where
    R: ContactRepository,
    E: EmailSender,
{
    pub fn new(contact_repo: R, mailer: E, limiter: Arc<dyn RateLimitStore>, mailbox: Mailbox) -> Self {
        ContactHandler {
            contact_repo,
            mailer,
            limiter,
            mailbox,
        }
    }

    /// Processes one raw request body from `client_ip` (`None` when no proxy
    /// header named one).
    ///
    /// The rate limit is consulted before the body is parsed, so a malformed
    /// request still uses up a slot.
    pub async fn submit(
        &self,
        client_ip: Option<String>,
        body: &[u8],
        now: DateTime<Utc>,
    ) -> Result<ContactResponse, ContactError> {
        self.admit(client_ip.as_deref(), now).await?;
        self.process(client_ip, body, now).await
    }

    /// Takes one slot from the caller's window, or fails with
    /// `RateLimitExceeded` when the window is full.
    pub async fn admit(&self, client_ip: Option<&str>, now: DateTime<Utc>) -> Result<(), ContactError> {
        let client_id = client_ip.unwrap_or(UNKNOWN_CLIENT);

        match self.limiter.check(client_id, now).await {
            RateDecision::Allowed { .. } => Ok(()),
            RateDecision::Denied { reset_time } => {
                tracing::warn!(client_id, %reset_time, "Contact rate limit exceeded");
                Err(ContactError::RateLimitExceeded { client_id: client_id.to_string() })
            }
        }
    }

    /// Everything after admission: parse, notify the owner, then store.
    pub async fn process(
        &self,
        client_ip: Option<String>,
        body: &[u8],
        now: DateTime<Utc>,
    ) -> Result<ContactResponse, ContactError> {
        let client_id = client_ip.as_deref().unwrap_or(UNKNOWN_CLIENT);
        let submission = parse_submission(body)?;

        let email = contact_notification(&self.mailbox, &submission, now);
        let email_id = self.mailer.send(&email).await.map_err(|e| {
            tracing::error!(error = %e, client_id, "Failed to send contact notification");
            ContactError::from(e)
        })?;
        tracing::info!(email_id = %email_id, client_id, "Contact notification sent");

        // The owner already has the message; a failed insert is only worth a log line.
        let record = ContactMessageInsert::new(submission, client_ip);
        match self.persist_best_effort(&record).await {
            Ok(id) => tracing::info!(%id, "Contact message stored"),
            Err(e) => tracing::error!(error = %e, "Failed to store contact message"),
        }

        Ok(ContactResponse::sent())
    }

    /// Inserts the record. The result is for logging only and never changes
    /// what the caller is told.
    pub async fn persist_best_effort(&self, record: &ContactMessageInsert) -> Result<Uuid, ContactError> {
        self.contact_repo
            .insert_contact_message(record)
            .await
            .map_err(ContactError::PersistenceFailure)
    }
}

fn parse_submission(body: &[u8]) -> Result<ContactSubmission, ContactError> {
    let request: ContactRequest = serde_json::from_slice(body).map_err(|e| {
        tracing::warn!(error = %e, "Unreadable contact payload");
        ContactError::Validation(ValidationFailure::MissingFields)
    })?;

    let submission = ContactSubmission::try_from(request).map_err(|failure| {
        tracing::warn!(%failure, "Rejected contact payload");
        ContactError::Validation(failure)
    })?;

    Ok(submission)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{sync::Mutex, time::Duration};

    use async_trait::async_trait;
    use chrono::TimeDelta;

    use crate::{
        entities::email::OutboundEmail,
        errors::{AppError, EmailError},
        limiter::rate_limiter::{InMemoryRateLimiter, RateLimitPolicy},
    };

    #[derive(Default)]
    struct RecordingMailer {
        fail: bool,
        sent: Mutex<Vec<OutboundEmail>>,
    }

    #[async_trait]
    impl EmailSender for RecordingMailer {
        async fn send(&self, email: &OutboundEmail) -> Result<String, EmailError> {
            if self.fail {
                return Err(EmailError::Rejected { status: 401, body: "bad key".into() });
            }
            self.sent.lock().unwrap().push(email.clone());
            Ok("email_123".into())
        }
    }

    #[derive(Default)]
    struct RecordingRepo {
        fail: bool,
        rows: Mutex<Vec<ContactMessageInsert>>,
    }

    #[async_trait]
    impl ContactRepository for RecordingRepo {
        async fn check_connection(&self) -> Result<(), AppError> {
            Ok(())
        }

        async fn insert_contact_message(&self, msg: &ContactMessageInsert) -> Result<Uuid, AppError> {
            if self.fail {
                return Err(AppError::Database("connection refused".into()));
            }
            self.rows.lock().unwrap().push(msg.clone());
            Ok(Uuid::new_v4())
        }
    }

    fn handler(mailer: RecordingMailer, repo: RecordingRepo) -> ContactHandler<RecordingRepo, RecordingMailer> {
        let limiter = InMemoryRateLimiter::new(RateLimitPolicy::new(5, Duration::from_secs(3600)));
        ContactHandler::new(
            repo,
            mailer,
            Arc::new(limiter),
            Mailbox { from: "site@example.dev".into(), to: "owner@example.dev".into() },
        )
    }

    const VALID: &[u8] = br#"{"name":" Ada ","email":"ada@example.com","message":"Hello there,\nnice site!"}"#;

    #[tokio::test]
    async fn successful_submission_emails_then_stores_unescaped_values() {
        let handler = handler(RecordingMailer::default(), RecordingRepo::default());

        let response = handler
            .submit(Some("203.0.113.7".into()), VALID, Utc::now())
            .await
            .unwrap();
        assert_eq!(response, ContactResponse::sent());

        let sent = handler.mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].html.contains("Hello there,<br>nice site!"));

        let rows = handler.contact_repo.rows.lock().unwrap();
        assert_eq!(rows[0].name, "Ada");
        assert_eq!(rows[0].message, "Hello there,\nnice site!");
        assert_eq!(rows[0].ip_address.as_deref(), Some("203.0.113.7"));
    }

    #[tokio::test]
    async fn unknown_client_is_stored_without_address() {
        let handler = handler(RecordingMailer::default(), RecordingRepo::default());
        handler.submit(None, VALID, Utc::now()).await.unwrap();

        assert_eq!(handler.contact_repo.rows.lock().unwrap()[0].ip_address, None);
    }

    #[tokio::test]
    async fn email_failure_is_fatal_and_skips_the_insert() {
        let mailer = RecordingMailer { fail: true, ..Default::default() };
        let handler = handler(mailer, RecordingRepo::default());

        let err = handler.submit(None, VALID, Utc::now()).await.unwrap_err();
        assert!(matches!(err, ContactError::EmailDispatchFailure(_)));
        assert!(handler.contact_repo.rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn insert_failure_still_reports_success() {
        let repo = RecordingRepo { fail: true, ..Default::default() };
        let handler = handler(RecordingMailer::default(), repo);

        let response = handler.submit(None, VALID, Utc::now()).await.unwrap();
        assert!(response.success);
        assert_eq!(handler.mailer.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn persist_best_effort_surfaces_the_failure_for_logging() {
        let repo = RecordingRepo { fail: true, ..Default::default() };
        let handler = handler(RecordingMailer::default(), repo);
        let record = ContactMessageInsert {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            message: "hello there".into(),
            ip_address: None,
        };

        assert!(matches!(
            handler.persist_best_effort(&record).await,
            Err(ContactError::PersistenceFailure(AppError::Database(_)))
        ));
    }

    #[tokio::test]
    async fn malformed_bodies_are_validation_errors_and_consume_a_slot() {
        let handler = handler(RecordingMailer::default(), RecordingRepo::default());
        let now = Utc::now();

        for body in [&b"not json"[..], b"", b"null", br#"{"name":1}"#, br#"{"name":"Ada","email":"a@b.co"}"#] {
            let err = handler.submit(Some("198.51.100.9".into()), body, now).await.unwrap_err();
            assert!(matches!(err, ContactError::Validation(ValidationFailure::MissingFields)));
        }

        let err = handler.submit(Some("198.51.100.9".into()), VALID, now).await.unwrap_err();
        assert!(matches!(err, ContactError::RateLimitExceeded { .. }));
        assert!(handler.mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn admission_takes_a_slot_before_any_body_is_seen() {
        let handler = handler(RecordingMailer::default(), RecordingRepo::default());
        let now = Utc::now();

        for _ in 0..5 {
            handler.admit(Some("192.0.2.1"), now).await.unwrap();
        }

        let err = handler.admit(Some("192.0.2.1"), now).await.unwrap_err();
        assert!(matches!(err, ContactError::RateLimitExceeded { .. }));
        assert!(handler.admit(None, now).await.is_ok());
        assert!(handler.mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn rate_limited_requests_have_no_side_effects() {
        let handler = handler(RecordingMailer::default(), RecordingRepo::default());
        let now = Utc::now();
        for _ in 0..5 {
            handler.submit(Some("203.0.113.7".into()), VALID, now).await.unwrap();
        }

        let err = handler.submit(Some("203.0.113.7".into()), VALID, now).await.unwrap_err();
        assert!(matches!(err, ContactError::RateLimitExceeded { .. }));
        assert_eq!(handler.mailer.sent.lock().unwrap().len(), 5);
        assert_eq!(handler.contact_repo.rows.lock().unwrap().len(), 5);

        let later = now + TimeDelta::hours(1) + TimeDelta::seconds(1);
        assert!(handler.submit(Some("203.0.113.7".into()), VALID, later).await.is_ok());
    }
}
