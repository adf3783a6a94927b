use actix_web::web;

use crate::{
    handlers::system,
    repositories::{contact::ContactRepository, mailer::EmailSender},
};

pub fn config_routes<R, E>(cfg: &mut web::ServiceConfig)
where
    R: ContactRepository + 'static,
    E: EmailSender + 'static,
{
    cfg.service(
        web::resource("/health")
            .route(web::get().to(system::health_check::<R, E>))
    );
}
