use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;

use crate::{
    constants::MAX_CONTACT_BODY_BYTES,
    errors::{ContactError, ValidationFailure},
    repositories::{contact::ContactRepository, mailer::EmailSender},
    utils::get_client_ip::get_client_ip,
    AppState,
};

/// `POST /api/contact`. The body is read only after the caller has been
/// admitted by the rate limiter, so oversized and malformed requests still
/// use up a slot.
pub async fn submit_contact<R, E>(
    req: HttpRequest,
    payload: web::Payload,
    state: web::Data<AppState<R, E>>,
) -> Result<HttpResponse, ContactError>
where
    R: ContactRepository + 'static,
    E: EmailSender + 'static,
{
    let client_ip = get_client_ip(&req);
    let handler = &state.contact_handler;
    let now = Utc::now();

    handler.admit(client_ip.as_deref(), now).await?;
    let body = read_body(payload).await?;
    let response = handler.process(client_ip, &body, now).await?;

    Ok(HttpResponse::Ok().json(response))
}

async fn read_body(payload: web::Payload) -> Result<web::Bytes, ContactError> {
    match payload.to_bytes_limited(MAX_CONTACT_BODY_BYTES).await {
        Ok(Ok(body)) => Ok(body),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Failed to read contact payload");
            Err(ContactError::UnexpectedFailure(e.to_string()))
        }
        Err(_) => {
            tracing::warn!(limit = MAX_CONTACT_BODY_BYTES, "Contact payload too large");
            Err(ValidationFailure::InputTooLong.into())
        }
    }
}

/// `OPTIONS /api/contact`: headers only, nothing else runs.
pub async fn contact_preflight() -> HttpResponse {
    HttpResponse::Ok().finish()
}
