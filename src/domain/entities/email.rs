use serde::{Deserialize, Serialize};

use crate::settings::AppConfig;

/// Sender and the site owner's fixed inbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    pub from: String,
    pub to: String,
}

impl From<&AppConfig> for Mailbox {
    fn from(config: &AppConfig) -> Self {
        Mailbox {
            from: config.email_from.clone(),
            to: config.contact_recipient.clone(),
        }
    }
}

/// Payload accepted by the transactional email provider.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Deserialize)]
pub struct SentEmail {
    pub id: String,
}
