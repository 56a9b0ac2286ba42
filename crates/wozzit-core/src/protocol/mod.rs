//! Protocol modules: the envelope model and its parser.
//!
//! The wire shape is fixed:
//! `{ "wozzit": { "protocol": [u32,u32,u32], "schema": str, "version": int, "payload": any? } }`.
//! Parsing is panic-free and reports every failure as a `ValidationError`.

pub mod envelope;
pub mod parse;

pub use envelope::{Envelope, ProtocolVersion};
pub use parse::{parse, parse_value, parse_value_with, parse_with, ProtocolRange};
