use std::sync::Arc;

use async_trait::async_trait;
use derive_more::Display;

use crate::settings::AppConfig;

pub mod smtp;
pub mod templates;

pub use smtp::SmtpMailer;

#[derive(Debug, Display)]
pub enum MailError {
    #[display("Mail delivery is not configured")]
    NotConfigured,

    #[display("Invalid email address: {_0}")]
    Address(String),

    #[display("Email build error: {_0}")]
    Build(String),

    #[display("SMTP transport error: {_0}")]
    Transport(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;
}

/// Used when no SMTP host is configured. Every send fails.
#[derive(Debug, Default, Clone)]
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        tracing::warn!(subject = %email.subject, "Mailer disabled, dropping email");
        Err(MailError::NotConfigured)
    }
}

pub fn build_mailer(config: &AppConfig) -> Result<Arc<dyn Mailer>, MailError> {
    if !config.mail_enabled() {
        tracing::warn!("SMTP host not set, contact notifications will fail");
        return Ok(Arc::new(DisabledMailer));
    }
    Ok(Arc::new(SmtpMailer::new(config)?))
}
