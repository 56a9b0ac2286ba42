//! Built-in handler semantics for each action kind.

use std::sync::Arc;

use wozzit_core::error::{Result, WozzitError};
use wozzit_core::Envelope;

use super::dispatcher::Adapters;
use super::rule::{Action, ActionRule};

/// Title of desktop notifications.
pub(crate) const NOTIFY_TITLE: &str = "Wozzit";

/// Run the handler bound to `rule` for `env`.
pub(crate) async fn invoke(
    adapters: Arc<Adapters>,
    rule: Arc<ActionRule>,
    env: Arc<Envelope>,
) -> Result<()> {
    match &rule.action {
        Action::Log => {
            tracing::info!(target: "wozzit", "{}", env.to_json());
            Ok(())
        }
        Action::Callback(cb) => {
            tracing::debug!("invoking callback");
            // synchronous callbacks must not block the async workers
            let cb = Arc::clone(cb);
            let rule = Arc::clone(&rule);
            tokio::task::spawn_blocking(move || cb(rule.as_ref(), env.as_ref()))
                .await
                .map_err(|e| WozzitError::Panicked(e.to_string()))?
        }
        Action::Forward { to } => {
            tracing::info!(%to, "forwarding message");
            adapters.transport.send_envelope(to, &env).await.map(|_| ())
        }
        Action::DesktopNotify { message } => {
            tracing::info!("triggering desktop notification");
            let notifier = Arc::clone(&adapters.notifier);
            let message = message.clone();
            tokio::task::spawn_blocking(move || notifier.notify(NOTIFY_TITLE, &message))
                .await
                .map_err(|e| WozzitError::Panicked(e.to_string()))
        }
        Action::Email(mail) => {
            adapters
                .mailer
                .send(&adapters.smtp, &mail.to_name, &mail.to_email, &mail.subject, &mail.body)
                .await
        }
    }
}
