//! HTTP transport (reqwest).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use wozzit_core::error::{Result, WozzitError};
use wozzit_core::protocol::parse_value;
use wozzit_core::Envelope;

use super::Transport;

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WozzitError::Internal(format!("http client build failed: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send_envelope(&self, url: &str, env: &Envelope) -> Result<Envelope> {
        let resp = self
            .client
            .post(url)
            .json(env)
            .send()
            .await
            .map_err(|e| WozzitError::NoServer(e.to_string()))?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(WozzitError::Status(status.as_u16()));
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| WozzitError::InvalidResponse(format!("invalid json: {e}")))?;
        tracing::debug!(%body, "reply received");

        parse_value(&body, None).map_err(|e| WozzitError::InvalidResponse(e.to_string()))
    }
}
