//! Outbound client: send an envelope to another node.

use std::sync::Arc;
use std::time::Duration;

use wozzit_core::error::{Result, WozzitError};
use wozzit_core::Envelope;

use crate::hook::{self, ErrorHook, TAG_INVALID_RESPONSE, TAG_NO_SERVER, TAG_SEND};
use crate::outbound::{HttpTransport, Transport};

pub struct WozzitClient {
    transport: Arc<dyn Transport>,
    on_error: Option<ErrorHook>,
}

impl WozzitClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            on_error: None,
        }
    }

    /// Client over HTTP with a per-request timeout.
    pub fn http(timeout: Duration) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpTransport::new(timeout)?)))
    }

    pub fn with_error_hook(mut self, hook: ErrorHook) -> Self {
        self.on_error = Some(hook);
        self
    }

    /// Post `env` to the node at `to` and return its reply.
    ///
    /// Failures are reported to the error hook (`noserver`, `send`,
    /// `invalidresponse`) and returned.
    pub async fn send(&self, env: &Envelope, to: &str) -> Result<Envelope> {
        tracing::info!(%to, "sending");
        match self.transport.send_envelope(to, env).await {
            Ok(reply) => Ok(reply),
            Err(e) => {
                hook::report(self.on_error.as_ref(), send_tag(&e), &e);
                Err(e)
            }
        }
    }
}

fn send_tag(e: &WozzitError) -> &'static str {
    match e {
        WozzitError::NoServer(_) => TAG_NO_SERVER,
        WozzitError::InvalidResponse(_) => TAG_INVALID_RESPONSE,
        _ => TAG_SEND,
    }
}
