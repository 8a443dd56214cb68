//! The `apply-config` command, independent of any argument parser.
//!
//! Build an [`ApplyAction`] however you like (the `clap` adapter in
//! [`cli`](crate::cli) is one way), then hand it to
//! [`Orchestrator::handle`] for a [`CommandOutcome`] you can display.

use std::fmt;

use crate::environment::EnvironmentDetector;
use crate::error::OrchestratorError;
use crate::manager::OverlayManager;
use crate::report::AggregateResult;
use crate::store::ConfigStore;
use crate::types::ApplyAction;

/// Result of a command. Display it to get the user-facing report.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// Registered provider ids with their environments.
    Providers { entries: Vec<(String, Vec<String>)> },
    Applied {
        environment: String,
        dry_run: bool,
        result: AggregateResult,
    },
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandOutcome::Providers { entries } if entries.is_empty() => {
                write!(f, "No configuration providers registered")
            }
            CommandOutcome::Providers { entries } => {
                write!(f, "Registered configuration providers:")?;
                for (id, environments) in entries {
                    write!(f, "\n- {id} ({})", environments.join(", "))?;
                }
                Ok(())
            }
            CommandOutcome::Applied {
                environment,
                dry_run,
                result,
            } => {
                if *dry_run {
                    writeln!(f, "Dry run mode - showing changes for environment: {environment}")?;
                } else {
                    writeln!(f, "Applying configuration for environment: {environment}")?;
                }
                write!(f, "{result}")
            }
        }
    }
}

pub struct Orchestrator<S: ConfigStore> {
    manager: OverlayManager,
    detector: EnvironmentDetector,
    store: S,
}

impl<S: ConfigStore> Orchestrator<S> {
    pub fn new(manager: OverlayManager, detector: EnvironmentDetector, store: S) -> Self {
        Self {
            manager,
            detector,
            store,
        }
    }

    pub fn manager(&self) -> &OverlayManager {
        &self.manager
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run one action. Listing wins over applying and never needs an
    /// environment.
    pub fn handle(&mut self, action: ApplyAction) -> Result<CommandOutcome, OrchestratorError> {
        match action {
            ApplyAction::ListProviders => Ok(CommandOutcome::Providers {
                entries: self
                    .manager
                    .providers()
                    .iter()
                    .map(|p| (p.info().id.clone(), p.applicable_environments().to_vec()))
                    .collect(),
            }),
            ApplyAction::Apply {
                environment,
                dry_run,
            } => {
                let environment = self.detector.resolve(environment.as_deref())?;
                tracing::info!(environment = %environment, dry_run, "applying configuration");
                let result =
                    self.manager
                        .apply_configurations(&mut self.store, &environment, dry_run)?;
                Ok(CommandOutcome::Applied {
                    environment,
                    dry_run,
                    result,
                })
            }
        }
    }

    /// Run an action and print the outcome to stdout.
    pub fn handle_and_print(&mut self, action: ApplyAction) -> Result<(), OrchestratorError> {
        let outcome = self.handle(action)?;
        println!("{outcome}");
        Ok(())
    }
}
