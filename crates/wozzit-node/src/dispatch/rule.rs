//! Action rules: a match criterion bound to a handler.
//!
//! Match criteria are compiled at registration time. Field names are resolved
//! against a closed table, so a typo in a rule fails when the rule is added,
//! never silently at match time.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;

use wozzit_core::error::{Result, WozzitError};
use wozzit_core::Envelope;

/// Programmatic handler. Receives the rule that fired and the inbound envelope.
pub type Callback = Arc<dyn Fn(&ActionRule, &Envelope) -> Result<()> + Send + Sync>;

/// Envelope field a rule can match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchField {
    Protocol,
    Schema,
    Version,
    Psk,
    Payload,
    SourceAddress,
}

impl MatchField {
    /// The closed set of matchable fields.
    pub const ALL: [MatchField; 6] = [
        MatchField::Protocol,
        MatchField::Schema,
        MatchField::Version,
        MatchField::Psk,
        MatchField::Payload,
        MatchField::SourceAddress,
    ];

    /// Name used in rule mappings and config files.
    pub fn as_str(self) -> &'static str {
        match self {
            MatchField::Protocol => "protocol",
            MatchField::Schema => "schema",
            MatchField::Version => "version",
            MatchField::Psk => "psk",
            MatchField::Payload => "payload",
            MatchField::SourceAddress => "sourceAddress",
        }
    }
}

impl FromStr for MatchField {
    type Err = WozzitError;

    fn from_str(s: &str) -> Result<Self> {
        MatchField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| WozzitError::InvalidRule(format!("unknown match field: {s}")))
    }
}

impl fmt::Display for MatchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When a rule fires.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MatchCriteria {
    /// Wildcard (`"*"`): every envelope.
    #[default]
    Any,
    /// Every `(field, expected)` pair must hold.
    Fields(Vec<(MatchField, Value)>),
}

impl MatchCriteria {
    pub fn any() -> Self {
        MatchCriteria::Any
    }

    /// Single-field criterion.
    pub fn field(field: MatchField, expected: impl Into<Value>) -> Self {
        MatchCriteria::Fields(vec![(field, expected.into())])
    }

    /// Shorthand for `field(MatchField::Schema, schema)`.
    pub fn schema(schema: impl Into<String>) -> Self {
        Self::field(MatchField::Schema, Value::String(schema.into()))
    }

    /// Narrow with one more required pair.
    pub fn and(self, field: MatchField, expected: impl Into<Value>) -> Self {
        let mut pairs = match self {
            MatchCriteria::Any => Vec::new(),
            MatchCriteria::Fields(pairs) => pairs,
        };
        pairs.push((field, expected.into()));
        MatchCriteria::Fields(pairs)
    }

    /// Compile `(name, expected)` pairs, rejecting unknown field names.
    pub fn from_pairs<K, I>(pairs: I) -> Result<Self>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let pairs = pairs
            .into_iter()
            .map(|(name, expected)| Ok((name.as_ref().parse::<MatchField>()?, expected)))
            .collect::<Result<Vec<_>>>()?;
        Ok(MatchCriteria::Fields(pairs))
    }

    /// Compile the declarative form: `"*"` or an object of field -> expected value.
    pub fn from_value(v: &Value) -> Result<Self> {
        match v {
            Value::String(s) if s == "*" => Ok(MatchCriteria::Any),
            Value::Object(map) => Self::from_pairs(map.iter().map(|(k, v)| (k, v.clone()))),
            other => Err(WozzitError::InvalidRule(format!(
                "match must be \"*\" or a mapping, got {other}"
            ))),
        }
    }
}

/// Parameters of an `email` action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAction {
    pub to_name: String,
    pub to_email: String,
    pub subject: String,
    pub body: String,
}

/// Handler bound to a rule.
#[derive(Clone)]
pub enum Action {
    /// Emit the serialized envelope through the log.
    Log,
    Callback(Callback),
    /// Re-send the envelope to another node.
    Forward { to: String },
    DesktopNotify { message: String },
    Email(EmailAction),
}

/// Handler kind; its string form is also the error-hook tag for handler failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Log,
    Callback,
    Forward,
    DesktopNotify,
    Email,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Log => "log",
            ActionKind::Callback => "callback",
            ActionKind::Forward => "forward",
            ActionKind::DesktopNotify => "desktopNotify",
            ActionKind::Email => "email",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Log => ActionKind::Log,
            Action::Callback(_) => ActionKind::Callback,
            Action::Forward { .. } => ActionKind::Forward,
            Action::DesktopNotify { .. } => ActionKind::DesktopNotify,
            Action::Email(_) => ActionKind::Email,
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Log => f.write_str("Log"),
            Action::Callback(_) => f.write_str("Callback(..)"),
            Action::Forward { to } => f.debug_struct("Forward").field("to", to).finish(),
            Action::DesktopNotify { message } => f
                .debug_struct("DesktopNotify")
                .field("message", message)
                .finish(),
            Action::Email(e) => f.debug_tuple("Email").field(e).finish(),
        }
    }
}

/// A registered (criteria, handler) pair.
#[derive(Debug, Clone)]
pub struct ActionRule {
    pub criteria: MatchCriteria,
    pub action: Action,
}

impl ActionRule {
    pub fn new(criteria: MatchCriteria, action: Action) -> Self {
        Self { criteria, action }
    }

    pub fn kind(&self) -> ActionKind {
        self.action.kind()
    }

    /// Forward destination, for `forward` rules.
    pub fn to(&self) -> Option<&str> {
        match &self.action {
            Action::Forward { to } => Some(to),
            _ => None,
        }
    }
}
