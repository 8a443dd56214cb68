//! Process-wide settings, read once at startup.
//!
//! Resolved by [`SettingsLoader`](crate::SettingsLoader) from compiled
//! defaults, the `extra."drupal-config-orchestrator"` section of the nearest
//! `composer.json`, `DRUPAL_CONFIG_*` environment variables and CLI flags,
//! in that order of increasing priority.

use std::path::PathBuf;

use confique::Config;
use serde::{Deserialize, Serialize};

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OrchestratorSettings {
    /// Namespace prefixed to the identifiers of providers declared in `provider_path`.
    #[config(default = "YourNamespace\\Config\\Provider\\Configuration")]
    pub provider_namespace: String,

    /// Directory scanned for declarative provider files (`*.toml`).
    #[config(default = "config/providers")]
    pub provider_path: PathBuf,

    /// Configuration store directory, one `<name>.toml` file per configuration object.
    #[config(default = "config/sync")]
    pub store_path: PathBuf,

    /// Built-in providers to register, in order (`site-settings`, `database`).
    #[config(default = ["site-settings"])]
    pub builtin_providers: Vec<String>,

    /// Environment used when `DRUPAL_ENV` is not set.
    pub environment: Option<String>,

    /// Diagnostic logging.
    #[config(nested)]
    pub log: LogSettings,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LogSettings {
    /// Filter directive (`warn`, `info`, `config_orchestrator=debug`, ...).
    /// `RUST_LOG` takes precedence when set.
    #[config(default = "warn")]
    pub level: String,

    /// Output format: `text` or `json`.
    #[config(default = "text")]
    pub format: String,
}
