//! Environment-aware configuration overrides for Drupal sites.
//!
//! Providers describe, per environment, which settings of which
//! configuration objects should change. The [`OverlayManager`] runs every
//! provider that applies to the target environment, writes its settings into
//! a configuration store and reports how many objects were updated.
//!
//! ```ignore
//! let settings = SettingsLoader::new().load()?;
//!
//! let mut manager = OverlayManager::new();
//! register_providers(&mut manager, &settings)?;
//!
//! let detector = EnvironmentDetector::new(DetectionContext::from_process(
//!     settings.environment.clone(),
//! ));
//! let store = TomlDirStore::new(&settings.store_path);
//!
//! Orchestrator::new(manager, detector, store).handle_and_print(ApplyAction::Apply {
//!     environment: None,
//!     dry_run: true,
//! })?;
//! ```
//!
//! # Providers
//!
//! A provider implements [`ConfigProvider`]: it lists the environments it
//! applies to and returns [`ConfigOverrides`], an ordered map from
//! configuration object name (`system.site`) to a table of settings. Two
//! providers ship with the crate ([`SiteSettingsProvider`] and
//! [`DatabaseProvider`]); more can be declared as TOML files in the provider
//! directory, see [`DeclarativeProvider`].
//!
//! Providers run in registration order. When two providers touch the same
//! key of the same object, the later one wins.
//!
//! # Applying
//!
//! For every object a provider returns, the manager loads the object from
//! the store, sets each key and saves it. An object the store cannot load is
//! reported and skipped without counting toward the total; a failed save is
//! counted but not successful. Neither stops the run. A dry run only loads
//! objects and reports the settings it would have written.
//!
//! # Settings
//!
//! The tool's own settings ([`OrchestratorSettings`]) resolve through these
//! layers, later ones winning:
//!
//! ```text
//! Compiled defaults     #[config(default = ...)]
//!        ↑ overridden by
//! composer.json         extra."drupal-config-orchestrator", nearest ancestor
//!        ↑ overridden by
//! Environment vars      DRUPAL_CONFIG_<KEY>, `__` for nesting
//!        ↑ overridden by
//! CLI flags             .cli_override()
//! ```
//!
//! # Environment
//!
//! The target environment is `--env` when given. Otherwise `DRUPAL_ENV` is
//! used if it names a valid environment, then the `environment` setting.
//! With none of these the command fails before anything is applied.

pub mod error;
pub mod types;

#[cfg(feature = "clap")]
mod cli;
mod command;
mod env;
mod environment;
mod file;
mod loader;
mod logging;
mod manager;
mod manifest;
pub(crate) mod merge;
mod overrides;
mod provider;
pub mod providers;
mod report;
mod resolve;
mod settings;
pub mod store;
mod validate;

#[cfg(test)]
mod fixtures;

#[cfg(feature = "clap")]
pub use cli::ApplyConfigArgs;
pub use command::{CommandOutcome, Orchestrator};
pub use environment::{
    DetectionContext, ENVIRONMENT_VAR, EnvironmentDetector, Tier, require_env, require_var,
};
pub use error::OrchestratorError;
pub use loader::{ENV_PREFIX, SettingsLoader};
pub use logging::{LogFormat, build_filter, init_logging};
pub use manager::OverlayManager;
pub use provider::{ConfigOverrides, ConfigProvider, ProviderInfo};
pub use providers::{
    DatabaseProvider, DeclarativeProvider, SiteSettingsProvider, builtin, register_providers,
};
pub use report::{AggregateResult, ApplyResult, ProviderReport};
pub use settings::{LogSettings, OrchestratorSettings};
pub use store::{ConfigSource, ConfigStore, EditableConfig, StoreError, TomlDirStore};
pub use types::{ApplyAction, Boundary, SearchPath};
