use async_trait::async_trait;

use crate::{entities::email::OutboundEmail, errors::EmailError};

#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Hands the message to the provider and returns the provider's message id.
    async fn send(&self, email: &OutboundEmail) -> Result<String, EmailError>;
}
