//! Haver envelope (JSON).
//!
//! `source_address` and `psk` never appear on the wire when serializing; the
//! address is attached by the transport that received the envelope.

use std::fmt;

use serde::ser::{Serialize, Serializer};
use serde_json::{json, Value};

/// Schema of an envelope that carries nothing.
pub const SCHEMA_NULL: &str = "wozzit.null";
/// Schema of error envelopes (`payload = {code, message}`).
pub const SCHEMA_ERROR: &str = "wozzit.error";
/// Schema of the "accepted, processed" acknowledgement.
pub const SCHEMA_RECEIPT: &str = "wozzit.receipt";

/// Semantic protocol version. Ordering is lexicographic over the triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProtocolVersion(pub u32, pub u32, pub u32);

impl ProtocolVersion {
    /// Oldest protocol this build accepts.
    pub const MIN_SUPPORTED: ProtocolVersion = ProtocolVersion(0, 0, 1);
    /// Newest protocol this build accepts.
    pub const MAX_SUPPORTED: ProtocolVersion = ProtocolVersion(0, 0, 1);

    pub fn to_value(self) -> Value {
        json!([self.0, self.1, self.2])
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.0, self.1, self.2)
    }
}

impl Serialize for ProtocolVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        [self.0, self.1, self.2].serialize(serializer)
    }
}

/// A message exchanged between nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// Protocol version the sender speaks.
    pub protocol: ProtocolVersion,
    /// Reverse-domain classifier of the payload shape.
    pub schema: String,
    /// Schema version; meaning is defined per schema.
    pub version: i64,
    /// Pre-shared key, passed through unvalidated.
    pub psk: Option<String>,
    /// Schema-dictated payload. `None` means absent on the wire.
    pub payload: Option<Value>,
    /// Sender address, set only for inbound envelopes.
    pub source_address: Option<String>,
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            protocol: ProtocolVersion::MIN_SUPPORTED,
            schema: SCHEMA_NULL.to_string(),
            version: 1,
            psk: None,
            payload: None,
            source_address: None,
        }
    }
}

impl Envelope {
    /// `wozzit.null` envelope at the minimum supported protocol.
    pub fn new() -> Self {
        Self::default()
    }

    /// Envelope of the given schema, otherwise default.
    pub fn with_schema(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            ..Self::default()
        }
    }

    /// Attach a payload. `Value::Null` is stored as absent.
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = if payload.is_null() { None } else { Some(payload) };
        self
    }

    /// `wozzit.error` envelope with `payload = {code, message}`.
    pub fn error(code: u16, message: impl Into<String>) -> Self {
        Self::with_schema(SCHEMA_ERROR).with_payload(json!({
            "code": code,
            "message": message.into(),
        }))
    }

    /// Generic fallback error (500, "Error").
    pub fn internal_error() -> Self {
        Self::error(500, "Error")
    }

    pub fn not_found() -> Self {
        Self::error(404, "Not found")
    }

    pub fn not_implemented() -> Self {
        Self::error(501, "Not implemented")
    }

    /// Acknowledgement of a received envelope. Carries no payload.
    pub fn receipt() -> Self {
        Self::with_schema(SCHEMA_RECEIPT)
    }

    pub fn is_error(&self) -> bool {
        self.schema == SCHEMA_ERROR
    }

    /// `(code, message)` of an error envelope, if this is one.
    pub fn error_details(&self) -> Option<(u64, &str)> {
        if !self.is_error() {
            return None;
        }
        let payload = self.payload.as_ref()?;
        let code = payload.get("code")?.as_u64()?;
        let message = payload.get("message")?.as_str()?;
        Some((code, message))
    }

    /// Wire structure as a JSON value.
    pub fn to_value(&self) -> Value {
        let mut body = json!({
            "protocol": self.protocol.to_value(),
            "schema": self.schema,
            "version": self.version,
        });
        if let (Some(payload), Some(obj)) = (&self.payload, body.as_object_mut()) {
            obj.insert("payload".to_string(), payload.clone());
        }
        json!({ "wozzit": body })
    }

    /// Wire structure as JSON text.
    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }
}

impl Serialize for Envelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}
