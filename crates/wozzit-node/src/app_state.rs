//! Shared application state for a Wozzit node.

use std::sync::Arc;

use wozzit_core::error::{Result, WozzitError};

use crate::config::NodeConfig;
use crate::dispatch::{Adapters, Dispatcher};

/// Handed to every axum handler; cheap to clone.
#[derive(Clone)]
pub struct AppState {
    dispatcher: Arc<Dispatcher>,
}

impl AppState {
    /// Build state with the production adapters selected by `cfg`.
    pub fn new(cfg: &NodeConfig) -> Result<Self> {
        Self::with_adapters(cfg, Adapters::from_config(cfg)?)
    }

    /// Build state around caller-supplied adapters (embedding, tests).
    /// Declarative rules from `cfg` are registered in file order.
    pub fn with_adapters(cfg: &NodeConfig, adapters: Adapters) -> Result<Self> {
        let dispatcher = Dispatcher::new(adapters);
        for (i, rule) in cfg.rules.iter().enumerate() {
            let compiled = rule
                .compile()
                .map_err(|e| WozzitError::Config(format!("rules[{i}]: {e}")))?;
            dispatcher.add_rule(compiled);
        }
        tracing::info!(rules = dispatcher.rule_count(), "rules registered");

        Ok(Self {
            dispatcher: Arc::new(dispatcher),
        })
    }

    pub fn dispatcher(&self) -> Arc<Dispatcher> {
        Arc::clone(&self.dispatcher)
    }
}
