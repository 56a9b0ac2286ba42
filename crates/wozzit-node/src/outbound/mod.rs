//! Outbound collaborators used by action handlers and the client.
//!
//! Each concern sits behind a trait so the dispatcher stays platform-agnostic:
//! the host picks concrete adapters once at startup.

pub mod http;
pub mod mailer;
pub mod notifier;

use async_trait::async_trait;

use wozzit_core::error::Result;
use wozzit_core::Envelope;

use crate::config::SmtpConfig;

pub use http::HttpTransport;
pub use mailer::SmtpMailer;
pub use notifier::{DesktopNotifier, LogNotifier};

/// Delivers an envelope to another node and returns its reply.
///
/// Success requires a 200 status and a body that parses back into an envelope.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_envelope(&self, url: &str, env: &Envelope) -> Result<Envelope>;
}

/// Desktop alerting. Fire-and-forget; failures are logged by the adapter.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, message: &str);
}

/// Sends a plain-text email using the node's SMTP settings.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(
        &self,
        smtp: &SmtpConfig,
        to_name: &str,
        to_email: &str,
        subject: &str,
        body: &str,
    ) -> Result<()>;
}
