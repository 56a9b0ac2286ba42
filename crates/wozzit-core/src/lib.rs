//! Wozzit core: transport-agnostic envelope primitives and error types.
//!
//! This crate defines the "Haver" wire envelope, its canonical presets, and the
//! parser/validator shared by the node, its outbound client, and test tooling.
//! It carries no transport or runtime dependencies.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Malformed input is
//! surfaced as a `ValidationError` value, never as a panic.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{Result, ValidationError, WozzitError};
pub use protocol::{Envelope, ProtocolRange, ProtocolVersion};
