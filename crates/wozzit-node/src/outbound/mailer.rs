//! SMTP mailer (lettre, tokio executor).
//!
//! - `SSL: true` uses an implicit-TLS connection, otherwise plain SMTP.
//! - Login only when both username and password are configured.
//! - One SMTP connection per message.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use wozzit_core::error::{Result, WozzitError};

use super::Mailer;
use crate::config::SmtpConfig;

#[derive(Debug, Default)]
pub struct SmtpMailer;

impl SmtpMailer {
    pub fn new() -> Self {
        Self
    }
}

fn mailbox(name: Option<&str>, email: &str) -> Result<Mailbox> {
    let address: Address = email
        .parse()
        .map_err(|e| WozzitError::Mail(format!("invalid address {email}: {e}")))?;
    Ok(Mailbox::new(name.map(str::to_string), address))
}

/// Build the plain-text message `From: fromName <fromEmail>`, `To: toName <toEmail>`.
pub fn build_message(
    smtp: &SmtpConfig,
    to_name: &str,
    to_email: &str,
    subject: &str,
    body: &str,
) -> Result<Message> {
    let from_email = smtp
        .from_email
        .as_deref()
        .ok_or_else(|| WozzitError::Mail("smtp.fromEmail not configured".into()))?;

    Message::builder()
        .from(mailbox(smtp.from_name.as_deref(), from_email)?)
        .to(mailbox(Some(to_name), to_email)?)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body.to_string())
        .map_err(|e| WozzitError::Mail(format!("message build failed: {e}")))
}

fn transport(smtp: &SmtpConfig, host: &str) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
    let builder = if smtp.ssl {
        AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|e| WozzitError::Mail(format!("tls setup failed: {e}")))?
    } else {
        AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
    };
    let builder = builder.port(smtp.port);

    let builder = match (&smtp.username, &smtp.password) {
        (Some(user), Some(pass)) => builder.credentials(Credentials::new(user.clone(), pass.clone())),
        _ => builder,
    };
    Ok(builder.build())
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(
        &self,
        smtp: &SmtpConfig,
        to_name: &str,
        to_email: &str,
        subject: &str,
        body: &str,
    ) -> Result<()> {
        let host = smtp.host.as_deref().ok_or(WozzitError::SmtpNotConfigured)?;
        let message = build_message(smtp, to_name, to_email, subject, body)?;

        transport(smtp, host)?
            .send(message)
            .await
            .map_err(|e| WozzitError::Mail(format!("send failed: {e}")))?;

        tracing::info!(to = to_email, "email sent");
        Ok(())
    }
}
