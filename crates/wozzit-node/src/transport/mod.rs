//! Inbound transport (HTTP).
//!
//! Havers arrive as `POST` bodies; every reply is a JSON envelope.

pub mod http;
