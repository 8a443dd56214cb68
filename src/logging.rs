//! Diagnostic logging on stderr via `tracing`.
//!
//! Stdout carries the command report only, so every log line goes to stderr.
//! `RUST_LOG` overrides the configured level when set.

use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::OrchestratorError;
use crate::settings::LogSettings;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    pub fn parse(format: &str) -> Result<Self, OrchestratorError> {
        match format {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(OrchestratorError::InvalidValue {
                key: "log.format".into(),
                reason: format!("expected 'text' or 'json', got '{other}'"),
            }),
        }
    }
}

/// Filter from `RUST_LOG`, falling back to `level`.
pub fn build_filter(level: &str) -> Result<EnvFilter, OrchestratorError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level).map_err(|e| OrchestratorError::InvalidValue {
        key: "log.level".into(),
        reason: e.to_string(),
    })
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(settings: &LogSettings) -> Result<(), OrchestratorError> {
    let format = LogFormat::parse(&settings.format)?;
    let filter = build_filter(&settings.level)?;
    let registry = Registry::default().with(filter);

    let installed = match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init(),
    };
    installed.map_err(|e| OrchestratorError::Logging(e.to_string()))
}
