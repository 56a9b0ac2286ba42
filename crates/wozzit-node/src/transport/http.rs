//! HTTP handlers.
//!
//! Every response is `200 application/json` carrying an envelope; errors are
//! expressed in the envelope, not in the status line.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;

use wozzit_core::Envelope;

use crate::app_state::AppState;

fn envelope_response(env: &Envelope) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        env.to_json(),
    )
        .into_response()
}

fn peer_ip(peer: Option<ConnectInfo<SocketAddr>>) -> Option<String> {
    peer.map(|ConnectInfo(addr)| addr.ip().to_string())
}

/// `POST`: validate the haver, run the rules, answer with the outcome.
pub async fn receive(
    State(app): State<AppState>,
    peer: Option<ConnectInfo<SocketAddr>>,
    body: Bytes,
) -> Response {
    let source = peer_ip(peer);
    tracing::info!(source = source.as_deref().unwrap_or("-"), "POST received");
    tracing::debug!(body = %String::from_utf8_lossy(&body));

    let reply = app.dispatcher().process(&body, source.as_deref()).await;
    envelope_response(&reply)
}

pub async fn not_found(peer: Option<ConnectInfo<SocketAddr>>) -> Response {
    tracing::info!(source = peer_ip(peer).as_deref().unwrap_or("-"), "GET received");
    envelope_response(&Envelope::not_found())
}

pub async fn head() -> Response {
    (StatusCode::OK, [(header::CONTENT_TYPE, "application/json")]).into_response()
}

/// `PUT` / `PATCH` / `DELETE`.
pub async fn not_implemented(peer: Option<ConnectInfo<SocketAddr>>) -> Response {
    tracing::debug!(source = peer_ip(peer).as_deref().unwrap_or("-"), "unsupported method");
    envelope_response(&Envelope::not_implemented())
}
