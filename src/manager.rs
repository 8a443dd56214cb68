//! The overlay manager: applies provider overrides against a store.
//!
//! Providers run in registration order and each configuration object in the
//! order its provider declared it. A load or save failure is recorded for
//! that object only; the run carries on with the next one. Only a provider
//! error aborts the run.

use toml::Table;

use crate::error::OrchestratorError;
use crate::provider::ConfigProvider;
use crate::report::{AggregateResult, ApplyResult, ProviderReport};
use crate::store::{ConfigSource, ConfigStore, StoreError};

/// What happened to one configuration object.
#[derive(Debug)]
enum ObjectOutcome {
    /// The store has no such object.
    Missing,
    /// Dry run: the object exists and these settings would be written.
    Previewed(Table),
    Updated,
    Failed(StoreError),
}

#[derive(Default)]
pub struct OverlayManager {
    providers: Vec<Box<dyn ConfigProvider>>,
}

impl OverlayManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider. Duplicates and overlapping objects are allowed;
    /// later providers win key by key.
    pub fn add_provider(&mut self, provider: Box<dyn ConfigProvider>) {
        self.providers.push(provider);
    }

    pub fn with_provider(mut self, provider: impl ConfigProvider + 'static) -> Self {
        self.add_provider(Box::new(provider));
        self
    }

    /// Registered providers, in registration order.
    pub fn providers(&self) -> &[Box<dyn ConfigProvider>] {
        &self.providers
    }

    /// Apply every provider that lists `environment` against `store`.
    ///
    /// With `dry_run` the store is only read. Per-object failures end up as
    /// failed details; an error is returned only when a provider fails to
    /// produce its overrides.
    pub fn apply_configurations<S: ConfigStore>(
        &self,
        store: &mut S,
        environment: &str,
        dry_run: bool,
    ) -> Result<AggregateResult, OrchestratorError> {
        let mut aggregate = AggregateResult::default();

        for provider in &self.providers {
            let id = &provider.info().id;
            if !provider.applies_to(environment) {
                tracing::debug!(provider = %id, environment, "provider does not apply, skipping");
                continue;
            }

            let overrides = provider.configuration_overrides(environment)?;
            let mut report = ProviderReport::new(id.as_str());

            for (name, settings) in overrides {
                let outcome = if dry_run {
                    preview(&*store, &name, settings)
                } else {
                    apply(store, &name, settings)
                };
                record(&mut report, &name, outcome);
            }

            tracing::debug!(
                provider = %id,
                success = report.success_count,
                total = report.total_count,
                "provider applied"
            );
            aggregate.push(report);
        }

        Ok(aggregate)
    }
}

fn preview<S: ConfigSource + ?Sized>(store: &S, name: &str, settings: Table) -> ObjectOutcome {
    match store.get_editable(name) {
        Some(_) => ObjectOutcome::Previewed(settings),
        None => ObjectOutcome::Missing,
    }
}

fn apply<S: ConfigStore + ?Sized>(store: &mut S, name: &str, settings: Table) -> ObjectOutcome {
    let Some(mut config) = store.get_editable(name) else {
        return ObjectOutcome::Missing;
    };
    for (key, value) in settings {
        config.set(&key, value);
    }
    match store.save(config) {
        Ok(()) => ObjectOutcome::Updated,
        Err(e) => ObjectOutcome::Failed(e),
    }
}

fn record(report: &mut ProviderReport, name: &str, outcome: ObjectOutcome) {
    let detail = match outcome {
        ObjectOutcome::Missing => {
            tracing::warn!(config = name, "could not load configuration object");
            report.details.push(ApplyResult::failed(format!(
                "Could not load configuration: {name}"
            )));
            return;
        }
        ObjectOutcome::Previewed(changes) => {
            report.success_count += 1;
            ApplyResult::preview(format!("Would update configuration: {name}"), changes)
        }
        ObjectOutcome::Updated => {
            tracing::info!(config = name, "configuration updated");
            report.success_count += 1;
            ApplyResult::succeeded(format!("Updated configuration: {name}"))
        }
        ObjectOutcome::Failed(e) => {
            tracing::warn!(config = name, error = %e, "failed to save configuration object");
            ApplyResult::failed(format!("Failed to update configuration {name}: {e}"))
        }
    };
    report.total_count += 1;
    report.details.push(detail);
}
