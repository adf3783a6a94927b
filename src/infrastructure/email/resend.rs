use async_trait::async_trait;
use reqwest::Client;
use url::Url;
use zeroize::Zeroizing;

use crate::{
    entities::email::{OutboundEmail, SentEmail},
    errors::EmailError,
    repositories::mailer::EmailSender,
    settings::AppConfig,
};

/// Client for a Resend-compatible transactional email API (`POST {base}/emails`).
#[derive(Clone)]
pub struct ResendMailer {
    client: Client,
    api_url: Url,
    api_key: Option<Zeroizing<String>>,
}

impl ResendMailer {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_client(
            Client::new(),
            config.email_api_url.clone(),
            config.email_api_key.clone(),
        )
    }

    pub fn with_client(client: Client, api_url: Url, api_key: Option<String>) -> Self {
        ResendMailer {
            client,
            api_url,
            api_key: api_key
                .filter(|key| !key.trim().is_empty())
                .map(Zeroizing::new),
        }
    }

    pub fn endpoint(&self) -> Result<Url, EmailError> {
        self.api_url
            .join("emails")
            .map_err(|e| EmailError::NotConfigured(format!("invalid email API URL: {}", e)))
    }
}

#[async_trait]
impl EmailSender for ResendMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<String, EmailError> {
        let api_key = self.api_key
            .as_ref()
            .ok_or_else(|| EmailError::NotConfigured("missing email API key".into()))?;

        let response = self.client
            .post(self.endpoint()?)
            .bearer_auth(api_key.as_str())
            .json(email)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmailError::Rejected { status: status.as_u16(), body });
        }

        let sent: SentEmail = response.json().await?;
        Ok(sent.id)
    }
}

impl std::fmt::Debug for ResendMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendMailer")
            .field("api_url", &self.api_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
