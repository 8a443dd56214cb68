//! Clap adapter for the `apply-config` command.
//!
//! Compiled only with the `clap` feature (on by default). The one bridge to
//! the core is [`ApplyConfigArgs::into_action()`]; everything after that
//! goes through [`Orchestrator::handle`](crate::Orchestrator::handle), so
//! callers with another argument parser can build an
//! [`ApplyAction`](crate::ApplyAction) themselves.

use clap::Args;

use crate::types::ApplyAction;

/// Arguments of `apply-config`.
///
/// ```ignore
/// #[derive(Subcommand)]
/// enum Commands {
///     ApplyConfig(ApplyConfigArgs),
/// }
/// ```
#[derive(Debug, Args)]
pub struct ApplyConfigArgs {
    /// Target environment (dev, test, prod). Detected when omitted.
    #[arg(short, long)]
    pub env: Option<String>,

    /// List all registered configuration providers.
    #[arg(short, long)]
    pub list_providers: bool,

    /// Show configuration changes without applying them.
    #[arg(short, long)]
    pub dry_run: bool,
}

impl ApplyConfigArgs {
    /// Listing takes precedence; `--env` and `--dry-run` are ignored with it.
    pub fn into_action(self) -> ApplyAction {
        if self.list_providers {
            return ApplyAction::ListProviders;
        }
        ApplyAction::Apply {
            environment: self.env,
            dry_run: self.dry_run,
        }
    }
}
