pub mod contact;
pub mod mailer;
pub mod sqlx_repo;
