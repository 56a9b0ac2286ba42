//! Node config loader (strict parsing).

pub mod schema;

use std::fs;
use std::path::Path;

use wozzit_core::error::{Result, WozzitError};

pub use schema::{ActionConfig, LogLevel, NodeConfig, NodeSection, RuleConfig, SmtpConfig};

/// Read and validate a YAML config file.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<NodeConfig> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .map_err(|e| WozzitError::Config(format!("read {} failed: {e}", path.display())))?;
    load_from_str(&text)
}

/// Parse YAML text; unknown keys and invalid rules are errors.
pub fn load_from_str(text: &str) -> Result<NodeConfig> {
    let cfg: NodeConfig = serde_yaml::from_str(text)
        .map_err(|e| WozzitError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
