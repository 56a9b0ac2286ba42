//! Rule matching (pure, never blocks).

use serde_json::Value;

use wozzit_core::Envelope;

use super::rule::{MatchCriteria, MatchField};

/// Does `env` satisfy `criteria`?
///
/// Wildcard always matches. A field mapping is a conjunction: each field must be
/// present on the envelope and structurally equal to the expected value.
pub fn matches(criteria: &MatchCriteria, env: &Envelope) -> bool {
    match criteria {
        MatchCriteria::Any => true,
        MatchCriteria::Fields(pairs) => pairs
            .iter()
            .all(|(field, expected)| field_matches(*field, env, expected)),
    }
}

fn field_matches(field: MatchField, env: &Envelope, expected: &Value) -> bool {
    match field {
        MatchField::Protocol => env.protocol.to_value() == *expected,
        MatchField::Schema => expected.as_str() == Some(env.schema.as_str()),
        MatchField::Version => Value::from(env.version) == *expected,
        MatchField::Psk => opt_str_eq(env.psk.as_deref(), expected),
        MatchField::Payload => env.payload.as_ref() == Some(expected),
        MatchField::SourceAddress => opt_str_eq(env.source_address.as_deref(), expected),
    }
}

fn opt_str_eq(actual: Option<&str>, expected: &Value) -> bool {
    match actual {
        Some(a) => expected.as_str() == Some(a),
        None => false,
    }
}
