use actix_web::{http::Method, web};

use crate::{
    handlers::contact,
    repositories::{contact::ContactRepository, mailer::EmailSender},
};

pub fn config_routes<R, E>(cfg: &mut web::ServiceConfig)
where
    R: ContactRepository + 'static,
    E: EmailSender + 'static,
{
    cfg.service(
        web::resource("/contact")
            .route(web::post().to(contact::submit_contact::<R, E>))
            .route(web::method(Method::OPTIONS).to(contact::contact_preflight))
    );
}
