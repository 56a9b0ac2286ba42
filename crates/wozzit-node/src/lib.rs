//! Wozzit node library entry.
//!
//! This crate wires the HTTP listener, the dispatch engine, its outbound
//! adapters, and the config loader into a runnable node. It is consumed by the
//! binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod hook;
pub mod outbound;
pub mod router;
pub mod transport;
