//! Email Notifications
//!
//! Sends static HTML notifications through a fixed SMTP relay. Delivery is
//! fire-and-forget: failures are logged and never reach the caller, and
//! nothing is retried.

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;
use thiserror::Error;

use crate::config::SmtpConfig;

/// A rendered message
#[derive(Debug, Clone, PartialEq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub html: String,
}

impl Email {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            html: html.into(),
        }
    }
}

/// Mail errors; only ever logged by [`Mailer`]
#[derive(Debug, Error)]
pub enum MailError {
    #[error("Invalid address '{address}': {error}")]
    Address { address: String, error: String },

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("SMTP error: {0}")]
    Transport(String),
}

/// Something that can deliver an [`Email`]
#[async_trait]
pub trait Outbox: Send + Sync {
    fn name(&self) -> &str;

    async fn deliver(&self, email: &Email) -> Result<(), MailError>;
}

/// Delivery through an authenticated STARTTLS relay
pub struct SmtpOutbox {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpOutbox {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let from = parse_mailbox(&config.from)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Outbox for SmtpOutbox {
    fn name(&self) -> &str {
        "smtp"
    }

    async fn deliver(&self, email: &Email) -> Result<(), MailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(parse_mailbox(&email.to)?)
            .subject(email.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(email.html.clone())
            .map_err(|e| MailError::Build(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;
        Ok(())
    }
}

/// Used while SMTP is disabled: logs and drops
pub struct DisabledOutbox;

#[async_trait]
impl Outbox for DisabledOutbox {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn deliver(&self, email: &Email) -> Result<(), MailError> {
        tracing::debug!(to = %email.to, subject = %email.subject, "SMTP disabled, email dropped");
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse::<Mailbox>().map_err(|e| MailError::Address {
        address: address.to_string(),
        error: e.to_string(),
    })
}

/// Front door for notifications
#[derive(Clone)]
pub struct Mailer {
    outbox: Arc<dyn Outbox>,
}

impl Mailer {
    pub fn new(outbox: Arc<dyn Outbox>) -> Self {
        Self { outbox }
    }

    /// Build from config; a broken SMTP config degrades to a disabled outbox
    pub fn from_config(config: &SmtpConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }

        match SmtpOutbox::new(config) {
            Ok(outbox) => Self::new(Arc::new(outbox)),
            Err(e) => {
                tracing::error!(error = %e, "Invalid SMTP configuration, notifications disabled");
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self::new(Arc::new(DisabledOutbox))
    }

    pub fn outbox_name(&self) -> &str {
        self.outbox.name()
    }

    /// Send and wait; errors are logged, never returned
    pub async fn send(&self, to: &str, subject: &str, html: &str) {
        self.deliver(Email::new(to, subject, html)).await;
    }

    /// Send in the background
    pub fn dispatch(&self, email: Email) -> tokio::task::JoinHandle<()> {
        let mailer = self.clone();
        tokio::spawn(async move { mailer.deliver(email).await })
    }

    async fn deliver(&self, email: Email) {
        match self.outbox.deliver(&email).await {
            Ok(()) => {
                tracing::info!(to = %email.to, subject = %email.subject, outbox = self.outbox.name(), "Email sent");
            }
            Err(e) => {
                tracing::error!(to = %email.to, subject = %email.subject, error = %e, "Failed to send email");
            }
        }
    }
}

/// Static notification bodies
pub mod templates {
    use super::Email;

    pub fn team_registered(to: &str, team_name: &str) -> Email {
        Email::new(
            to,
            "Team registration confirmed",
            format!(
                "<h2>Welcome to the hackathon!</h2>\
                 <p>Your team <strong>{}</strong> has been registered.</p>\
                 <p>Upload your payment screenshot from the dashboard to complete registration.</p>",
                escape(team_name)
            ),
        )
    }

    pub fn payment_reviewed(to: &str, team_name: &str, verified: bool) -> Email {
        let (subject, line) = if verified {
            ("Payment verified", "has been verified. You're all set.")
        } else {
            (
                "Payment rejected",
                "could not be verified. Please upload a clearer screenshot.",
            )
        };
        Email::new(
            to,
            subject,
            format!(
                "<p>The payment for team <strong>{}</strong> {}</p>",
                escape(team_name),
                line
            ),
        )
    }

    fn escape(s: &str) -> String {
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
    }
}
