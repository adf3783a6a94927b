use actix_web::web;

use crate::{
    handlers::home::home,
    repositories::{contact::ContactRepository, mailer::EmailSender},
};

mod contact;
mod system;

pub fn configure_routes<R, E>(cfg: &mut web::ServiceConfig)
where
    R: ContactRepository + 'static,
    E: EmailSender + 'static,
{
    cfg.service(web::resource("/").route(web::get().to(home)));

    cfg.configure(system::config_routes::<R, E>);

    cfg.service(
        web::scope("/api")
            .configure(contact::config_routes::<R, E>)
    );
}
