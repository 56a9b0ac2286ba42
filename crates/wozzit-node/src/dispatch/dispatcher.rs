use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use serde_json::Value;

use wozzit_core::error::{Result, WozzitError};
use wozzit_core::protocol::{parse_value_with, parse_with, ProtocolRange};
use wozzit_core::{Envelope, ValidationError};

use crate::config::{NodeConfig, SmtpConfig};
use crate::hook::{self, ErrorHook};
use crate::outbound::{
    DesktopNotifier, HttpTransport, LogNotifier, Mailer, Notifier, SmtpMailer, Transport,
};

use super::actions;
use super::matcher::matches;
use super::rule::{Action, ActionRule, EmailAction, MatchCriteria};

/// Collaborators the built-in handlers call out to.
///
/// Chosen once at startup and read-only while serving.
#[derive(Clone)]
pub struct Adapters {
    pub transport: Arc<dyn Transport>,
    pub notifier: Arc<dyn Notifier>,
    pub mailer: Arc<dyn Mailer>,
    pub smtp: SmtpConfig,
    pub on_error: Option<ErrorHook>,
    /// Upper bound for one handler invocation.
    pub handler_timeout: Duration,
}

impl Adapters {
    pub fn new(
        transport: Arc<dyn Transport>,
        notifier: Arc<dyn Notifier>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            transport,
            notifier,
            mailer,
            smtp: SmtpConfig::default(),
            on_error: None,
            handler_timeout: Duration::from_secs(10),
        }
    }

    /// Production adapters: reqwest transport, desktop (or log) notifier, SMTP mailer.
    pub fn from_config(cfg: &NodeConfig) -> Result<Self> {
        let timeout = cfg.node.handler_timeout();
        let notifier: Arc<dyn Notifier> = if cfg.node.desktop_notifications {
            Arc::new(DesktopNotifier::new())
        } else {
            Arc::new(LogNotifier)
        };

        Ok(Self::new(
            Arc::new(HttpTransport::new(timeout)?),
            notifier,
            Arc::new(SmtpMailer::new()),
        )
        .with_smtp(cfg.smtp.clone())
        .with_handler_timeout(timeout))
    }

    pub fn with_smtp(mut self, smtp: SmtpConfig) -> Self {
        self.smtp = smtp;
        self
    }

    pub fn with_error_hook(mut self, hook: ErrorHook) -> Self {
        self.on_error = Some(hook);
        self
    }

    pub fn with_handler_timeout(mut self, timeout: Duration) -> Self {
        self.handler_timeout = timeout;
        self
    }

    fn report(&self, tag: &str, err: &WozzitError) {
        hook::report(self.on_error.as_ref(), tag, err);
    }
}

type RuleSet = Arc<Vec<Arc<ActionRule>>>;

/// Owns the ordered rule set and turns inbound envelopes into responses.
///
/// Rules are copy-on-write: registration swaps in a new vector, `process`
/// works on the snapshot it started with. Safe to share across tasks.
pub struct Dispatcher {
    rules: RwLock<RuleSet>,
    adapters: Arc<Adapters>,
    range: ProtocolRange,
}

impl Dispatcher {
    pub fn new(adapters: Adapters) -> Self {
        Self {
            rules: RwLock::new(Arc::new(Vec::new())),
            adapters: Arc::new(adapters),
            range: ProtocolRange::SUPPORTED,
        }
    }

    /// Accept a different protocol range than this build's default.
    pub fn with_protocol_range(mut self, range: ProtocolRange) -> Self {
        self.range = range;
        self
    }

    pub fn adapters(&self) -> &Adapters {
        &self.adapters
    }

    /// Append a rule. Evaluation order is registration order.
    pub fn add_rule(&self, rule: ActionRule) {
        // a poisoned lock still holds a whole vector: pushes are never partial
        let mut guard = self.rules.write().unwrap_or_else(PoisonError::into_inner);
        Arc::make_mut(&mut *guard).push(Arc::new(rule));
    }

    pub fn add_log(&self, criteria: MatchCriteria) {
        self.add_rule(ActionRule::new(criteria, Action::Log));
    }

    pub fn add_listener<F>(&self, criteria: MatchCriteria, callback: F)
    where
        F: Fn(&ActionRule, &Envelope) -> Result<()> + Send + Sync + 'static,
    {
        self.add_rule(ActionRule::new(criteria, Action::Callback(Arc::new(callback))));
    }

    pub fn add_forwarder(&self, criteria: MatchCriteria, to: impl Into<String>) {
        self.add_rule(ActionRule::new(criteria, Action::Forward { to: to.into() }));
    }

    pub fn add_desktop_notification(&self, criteria: MatchCriteria, message: impl Into<String>) {
        self.add_rule(ActionRule::new(
            criteria,
            Action::DesktopNotify {
                message: message.into(),
            },
        ));
    }

    pub fn add_email(&self, criteria: MatchCriteria, email: EmailAction) {
        self.add_rule(ActionRule::new(criteria, Action::Email(email)));
    }

    pub fn rule_count(&self) -> usize {
        self.snapshot().len()
    }

    fn snapshot(&self) -> RuleSet {
        let guard = self.rules.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Validate a raw body and dispatch it. Always yields a response envelope.
    pub async fn process(&self, raw: &[u8], source_address: Option<&str>) -> Envelope {
        let parsed = parse_with(raw, source_address, self.range);
        self.process_parsed(parsed).await
    }

    /// Same as [`Dispatcher::process`] for an already-decoded body.
    pub async fn process_value(&self, value: &Value, source_address: Option<&str>) -> Envelope {
        let parsed = parse_value_with(value, source_address, self.range);
        self.process_parsed(parsed).await
    }

    async fn process_parsed(
        &self,
        parsed: std::result::Result<Envelope, ValidationError>,
    ) -> Envelope {
        match parsed {
            Ok(env) => {
                tracing::debug!(schema = %env.schema, "message accepted");
                self.dispatch(env).await
            }
            Err(e) => {
                tracing::warn!(reason = %e, "rejecting message");
                e.to_envelope()
            }
        }
    }

    /// Evaluate every rule in order and fire each match. Handler failures are
    /// reported, never returned: the answer is a receipt once all rules ran.
    pub async fn dispatch(&self, env: Envelope) -> Envelope {
        let rules = self.snapshot();
        if rules.is_empty() {
            tracing::debug!("no actions registered");
            return Envelope::not_implemented();
        }

        let env = Arc::new(env);
        for (idx, rule) in rules.iter().enumerate() {
            let kind = rule.kind();
            if !matches(&rule.criteria, &env) {
                tracing::debug!(rule = idx, action = %kind, "rule not matched");
                continue;
            }

            tracing::debug!(rule = idx, action = %kind, "rule matched");
            if let Err(e) = self.run_isolated(Arc::clone(rule), Arc::clone(&env)).await {
                self.adapters.report(kind.as_str(), &e);
            }
        }

        Envelope::receipt()
    }

    /// Run one handler on its own task: panics surface as `JoinError`, and the
    /// invocation is aborted once the handler timeout elapses.
    async fn run_isolated(&self, rule: Arc<ActionRule>, env: Arc<Envelope>) -> Result<()> {
        let timeout = self.adapters.handler_timeout;
        let mut task = tokio::spawn(actions::invoke(Arc::clone(&self.adapters), rule, env));

        match tokio::time::timeout(timeout, &mut task).await {
            Ok(Ok(res)) => res,
            Ok(Err(join)) => Err(WozzitError::Panicked(join.to_string())),
            Err(_) => {
                task.abort();
                Err(WozzitError::Timeout(timeout))
            }
        }
    }
}
