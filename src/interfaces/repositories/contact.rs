use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    entities::contact::ContactMessageInsert,
    errors::AppError,
    repositories::sqlx_repo::SqlxContactRepo,
};

#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;

    /// Appends one contact record. Rows are never updated or deleted.
    async fn insert_contact_message(&self, msg: &ContactMessageInsert) -> Result<Uuid, AppError>;
}

impl SqlxContactRepo {
    pub fn new(pool: Option<PgPool>) -> Self {
        SqlxContactRepo { pool }
    }

    fn pool(&self) -> Result<&PgPool, AppError> {
        self.pool
            .as_ref()
            .ok_or_else(|| AppError::NotConfigured("database URL is not set".into()))
    }
}

#[async_trait]
impl ContactRepository for SqlxContactRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool()?)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    async fn insert_contact_message(&self, msg: &ContactMessageInsert) -> Result<Uuid, AppError> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO contact_messages (name, email, message, ip_address)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&msg.name)
        .bind(&msg.email)
        .bind(&msg.message)
        .bind(&msg.ip_address)
        .fetch_one(self.pool()?)
        .await?;

        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_store_reports_not_configured() {
        let repo = SqlxContactRepo::new(None);
        let insert = ContactMessageInsert {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            message: "hello there".into(),
            ip_address: None,
        };

        assert!(matches!(
            repo.insert_contact_message(&insert).await,
            Err(AppError::NotConfigured(_))
        ));
        assert!(matches!(repo.check_connection().await, Err(AppError::NotConfigured(_))));
    }
}
