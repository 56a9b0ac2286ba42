use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use wozzit_core::error::{Result, WozzitError};

use crate::dispatch::{Action, ActionRule, EmailAction, MatchCriteria};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeConfig {
    pub version: u32,

    #[serde(default)]
    pub node: NodeSection,

    #[serde(default)]
    pub smtp: SmtpConfig,

    /// Declarative rules, registered in file order.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

impl NodeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(WozzitError::UnsupportedVersion);
        }

        self.node.validate()?;
        self.smtp.validate()?;

        for (i, rule) in self.rules.iter().enumerate() {
            rule.compile()
                .map_err(|e| WozzitError::Config(format!("rules[{i}]: {e}")))?;
        }

        Ok(())
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            version: 1,
            node: NodeSection::default(),
            smtp: SmtpConfig::default(),
            rules: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct NodeSection {
    #[serde(default = "default_port")]
    pub port: u16,

    /// Empty or `*` means all interfaces.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default)]
    pub log_level: LogLevel,

    #[serde(default = "default_handler_timeout_ms")]
    pub handler_timeout_ms: u64,

    /// `false` turns desktop notifications into log lines (headless hosts).
    #[serde(default = "default_true")]
    pub desktop_notifications: bool,
}

impl Default for NodeSection {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_address: default_bind_address(),
            log_level: LogLevel::default(),
            handler_timeout_ms: default_handler_timeout_ms(),
            desktop_notifications: true,
        }
    }
}

impl NodeSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=600_000).contains(&self.handler_timeout_ms) {
            return Err(WozzitError::Config(
                "node.handlerTimeoutMs must be between 1 and 600000".into(),
            ));
        }
        self.listen_addr()?;
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        let ip = match self.bind_address.trim() {
            "" | "*" => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            other => other.parse().map_err(|_| {
                WozzitError::Config(format!("node.bindAddress is not an ip address: {other}"))
            })?,
        };
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn handler_timeout(&self) -> Duration {
        Duration::from_millis(self.handler_timeout_ms)
    }
}

fn default_port() -> u16 {
    10207
}
fn default_bind_address() -> String {
    "0.0.0.0".into()
}
fn default_handler_timeout_ms() -> u64 {
    10_000
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[default]
    Info,
    Warning,
    Debug,
    None,
}

impl LogLevel {
    /// `EnvFilter` directive for this level.
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Debug => "debug",
            LogLevel::None => "off",
        }
    }
}

/// Process-wide SMTP settings. Read-only once serving starts.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct SmtpConfig {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    #[serde(default, rename = "SSL", alias = "ssl")]
    pub ssl: bool,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub from_name: Option<String>,
    #[serde(default)]
    pub from_email: Option<String>,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: default_smtp_port(),
            ssl: false,
            username: None,
            password: None,
            from_name: None,
            from_email: None,
        }
    }
}

impl SmtpConfig {
    /// Email actions can only succeed when a host is set.
    pub fn is_configured(&self) -> bool {
        self.host.is_some()
    }

    pub fn validate(&self) -> Result<()> {
        if self.is_configured() && self.from_email.is_none() {
            return Err(WozzitError::Config(
                "smtp.fromEmail is required when smtp.host is set".into(),
            ));
        }
        Ok(())
    }
}

fn default_smtp_port() -> u16 {
    25
}

/// One declarative rule: `match`, an `action` kind, and that kind's parameters.
///
/// Parameters sit flat next to `action`; every key is checked, and a parameter
/// that belongs to another action kind is rejected by [`RuleConfig::compile`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct RuleConfig {
    #[serde(rename = "match", default = "wildcard")]
    pub matches: Value,
    pub action: ActionConfig,

    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub to_name: Option<String>,
    #[serde(default)]
    pub to_email: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

fn wildcard() -> Value {
    Value::String("*".into())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionConfig {
    Log,
    Forward,
    DesktopNotify,
    Email,
}

impl ActionConfig {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionConfig::Log => "log",
            ActionConfig::Forward => "forward",
            ActionConfig::DesktopNotify => "desktopNotify",
            ActionConfig::Email => "email",
        }
    }

    /// Parameter keys this action accepts.
    fn params(self) -> &'static [&'static str] {
        match self {
            ActionConfig::Log => &[],
            ActionConfig::Forward => &["to"],
            ActionConfig::DesktopNotify => &["message"],
            ActionConfig::Email => &["toName", "toEmail", "subject", "body"],
        }
    }
}

impl RuleConfig {
    fn present_params(&self) -> impl Iterator<Item = &'static str> + '_ {
        [
            ("to", &self.to),
            ("message", &self.message),
            ("toName", &self.to_name),
            ("toEmail", &self.to_email),
            ("subject", &self.subject),
            ("body", &self.body),
        ]
        .into_iter()
        .filter(|(_, v)| v.is_some())
        .map(|(k, _)| k)
    }

    fn required(&self, key: &str, value: &Option<String>) -> Result<String> {
        value.clone().ok_or_else(|| {
            WozzitError::InvalidRule(format!("{} action requires `{key}`", self.action.as_str()))
        })
    }

    /// Compile into a registrable rule; unknown match fields and stray
    /// parameters are rejected here.
    pub fn compile(&self) -> Result<ActionRule> {
        let criteria = MatchCriteria::from_value(&self.matches)?;

        let allowed = self.action.params();
        if let Some(stray) = self.present_params().find(|k| !allowed.contains(k)) {
            return Err(WozzitError::InvalidRule(format!(
                "`{stray}` is not a parameter of {} actions",
                self.action.as_str()
            )));
        }

        let action = match self.action {
            ActionConfig::Log => Action::Log,
            ActionConfig::Forward => {
                let to = self.required("to", &self.to)?;
                if to.trim().is_empty() {
                    return Err(WozzitError::InvalidRule("forward.to must not be empty".into()));
                }
                Action::Forward { to }
            }
            ActionConfig::DesktopNotify => Action::DesktopNotify {
                message: self.required("message", &self.message)?,
            },
            ActionConfig::Email => Action::Email(EmailAction {
                to_name: self.required("toName", &self.to_name)?,
                to_email: self.required("toEmail", &self.to_email)?,
                subject: self.required("subject", &self.subject)?,
                body: self.required("body", &self.body)?,
            }),
        };
        Ok(ActionRule::new(criteria, action))
    }
}
