//! Built-in providers and the registry that wires providers into a manager.

mod database;
mod declarative;
mod site_settings;

pub use database::{DatabaseProvider, PASSWORD_VAR};
pub use declarative::DeclarativeProvider;
pub use site_settings::SiteSettingsProvider;

use crate::error::OrchestratorError;
use crate::manager::OverlayManager;
use crate::provider::ConfigProvider;
use crate::settings::OrchestratorSettings;

/// Identifiers accepted by [`builtin`].
pub const BUILTIN_PROVIDERS: &[&str] = &[site_settings::ID, database::ID];

/// Construct a built-in provider by id. `lookup` resolves process variables
/// the provider needs (the database password). A missing password does not
/// fail construction; the database provider reports it when applied.
pub fn builtin(
    name: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Box<dyn ConfigProvider>, OrchestratorError> {
    match name {
        site_settings::ID => Ok(Box::new(SiteSettingsProvider::default())),
        database::ID => Ok(Box::new(DatabaseProvider::from_lookup(lookup))),
        _ => Err(OrchestratorError::UnknownProvider {
            name: name.to_string(),
            available: BUILTIN_PROVIDERS.join(", "),
        }),
    }
}

/// Register the configured built-ins, in order, followed by the declarative
/// providers found in `provider_path`.
pub fn register_providers(
    manager: &mut OverlayManager,
    settings: &OrchestratorSettings,
) -> Result<(), OrchestratorError> {
    register_providers_with(manager, settings, |name| std::env::var(name).ok())
}

/// [`register_providers`] with an explicit variable lookup.
pub fn register_providers_with(
    manager: &mut OverlayManager,
    settings: &OrchestratorSettings,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), OrchestratorError> {
    for name in &settings.builtin_providers {
        manager.add_provider(builtin(name, &lookup)?);
    }

    for provider in
        DeclarativeProvider::discover(&settings.provider_path, &settings.provider_namespace)?
    {
        manager.add_provider(Box::new(provider));
    }

    tracing::debug!(count = manager.providers().len(), "providers registered");
    Ok(())
}
