//! `config-orchestrator` binary: applies environment overrides to a
//! configuration sync directory.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use config_orchestrator::{
    ApplyConfigArgs, DetectionContext, EnvironmentDetector, Orchestrator, OrchestratorError,
    OverlayManager, SettingsLoader, TomlDirStore, init_logging, register_providers,
};

#[derive(Parser)]
#[command(name = "config-orchestrator", version, about)]
struct Cli {
    /// Configuration store directory (overrides `store_path`).
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Directory of declarative provider files (overrides `provider_path`).
    #[arg(long, global = true)]
    provider_path: Option<PathBuf>,

    /// Log filter directive (overrides `log.level`).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply environment-specific configuration overrides.
    ApplyConfig(ApplyConfigArgs),
}

fn path_override(path: Option<PathBuf>) -> Option<String> {
    path.map(|p| p.to_string_lossy().into_owned())
}

fn run(cli: Cli) -> Result<(), OrchestratorError> {
    let settings = SettingsLoader::new()
        .cli_override("store_path", path_override(cli.store))
        .cli_override("provider_path", path_override(cli.provider_path))
        .cli_override("log.level", cli.log_level)
        .load()?;

    init_logging(&settings.log)?;
    tracing::debug!(?settings, "settings resolved");

    let mut manager = OverlayManager::new();
    register_providers(&mut manager, &settings)?;

    let detector =
        EnvironmentDetector::new(DetectionContext::from_process(settings.environment.clone()));
    let store = TomlDirStore::new(&settings.store_path);
    let mut orchestrator = Orchestrator::new(manager, detector, store);

    match cli.command {
        Commands::ApplyConfig(args) => orchestrator.handle_and_print(args.into_action()),
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
