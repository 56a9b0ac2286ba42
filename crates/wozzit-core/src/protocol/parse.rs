//! Envelope parsing and validation (panic-free).
//!
//! Validation order is fixed and short-circuits on the first failure:
//! 1. body is an object with a `wozzit` key
//! 2. `protocol` present, then within the supported range
//! 3. `schema` present
//! 4. `version` present
//!
//! A mistyped `schema` or `version` fails its own step with the same message
//! as a missing one; the debug log tells the two apart.
//!
//! `psk` and `payload` are copied when present; unknown keys are ignored.

use serde_json::Value;

use crate::error::ValidationError;
use crate::protocol::envelope::{Envelope, ProtocolVersion};

type Result<T> = std::result::Result<T, ValidationError>;

/// Inclusive range of protocol versions a node accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolRange {
    pub min: ProtocolVersion,
    pub max: ProtocolVersion,
}

impl ProtocolRange {
    /// Range this build supports.
    pub const SUPPORTED: ProtocolRange = ProtocolRange {
        min: ProtocolVersion::MIN_SUPPORTED,
        max: ProtocolVersion::MAX_SUPPORTED,
    };

    pub fn contains(&self, v: ProtocolVersion) -> bool {
        self.min <= v && v <= self.max
    }
}

impl Default for ProtocolRange {
    fn default() -> Self {
        Self::SUPPORTED
    }
}

/// Parse raw JSON bytes against the supported protocol range.
pub fn parse(raw: &[u8], source_address: Option<&str>) -> Result<Envelope> {
    parse_with(raw, source_address, ProtocolRange::SUPPORTED)
}

/// Parse raw JSON bytes against an explicit protocol range.
pub fn parse_with(
    raw: &[u8],
    source_address: Option<&str>,
    range: ProtocolRange,
) -> Result<Envelope> {
    let value: Value = serde_json::from_slice(raw).map_err(|e| {
        tracing::debug!(error = %e, "envelope body is not json");
        ValidationError::BadRequest
    })?;
    parse_value_with(&value, source_address, range)
}

/// Validate an already-decoded JSON value against the supported protocol range.
pub fn parse_value(value: &Value, source_address: Option<&str>) -> Result<Envelope> {
    parse_value_with(value, source_address, ProtocolRange::SUPPORTED)
}

/// Validate an already-decoded JSON value against an explicit protocol range.
pub fn parse_value_with(
    value: &Value,
    source_address: Option<&str>,
    range: ProtocolRange,
) -> Result<Envelope> {
    let msg = value
        .as_object()
        .and_then(|outer| outer.get("wozzit"))
        .ok_or(ValidationError::BadRequest)?;

    let protocol = msg.get("protocol").ok_or(ValidationError::NoProtocol)?;
    let protocol = protocol_triple(protocol).ok_or(ValidationError::UnsupportedProtocol)?;
    if !range.contains(protocol) {
        return Err(ValidationError::UnsupportedProtocol);
    }

    let schema = msg.get("schema").ok_or(ValidationError::NoSchema)?;
    let schema = schema.as_str().ok_or_else(|| {
        tracing::debug!(%schema, "schema present but not a string");
        ValidationError::NoSchema
    })?;

    let version = msg.get("version").ok_or(ValidationError::NoVersion)?;
    let version = version.as_i64().ok_or_else(|| {
        tracing::debug!(%version, "version present but not an integer");
        ValidationError::NoVersion
    })?;

    let psk = msg.get("psk").and_then(|v| match v {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        // opaque: keep the JSON text of non-string keys
        other => Some(other.to_string()),
    });

    let payload = msg.get("payload").filter(|v| !v.is_null()).cloned();

    Ok(Envelope {
        protocol,
        schema: schema.to_string(),
        version,
        psk,
        payload,
        source_address: source_address.map(str::to_string),
    })
}

/// `[major, minor, patch]` of non-negative integers; anything else is `None`.
fn protocol_triple(v: &Value) -> Option<ProtocolVersion> {
    let parts = v.as_array()?;
    if parts.len() != 3 {
        return None;
    }
    let mut out = [0u32; 3];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = u32::try_from(part.as_u64()?).ok()?;
    }
    Some(ProtocolVersion(out[0], out[1], out[2]))
}
