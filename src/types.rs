//! Shared value types: manifest search locations and command actions.

use std::path::PathBuf;

/// Where to look for the project manifest.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPath {
    /// Current working directory.
    Cwd,
    /// An explicit directory.
    Path(PathBuf),
    /// Walk up from the working directory. Expands into one directory per
    /// level, shallowest first, so the working directory has the highest
    /// priority.
    Ancestors(Boundary),
}

/// How far an [`Ancestors`](SearchPath::Ancestors) walk goes.
#[derive(Debug, Clone, PartialEq)]
pub enum Boundary {
    /// Continue to the filesystem root.
    Root,
    /// Stop (inclusive) at the first directory containing an entry with this name.
    Marker(&'static str),
}

/// An `apply-config` operation, independent of any CLI framework.
/// The clap adapter converts parsed arguments into this.
#[derive(Debug, Clone, PartialEq)]
pub enum ApplyAction {
    /// Print the registered providers and their environments.
    ListProviders,
    /// Apply (or preview) overrides for an environment. `None` means detect it.
    Apply {
        environment: Option<String>,
        dry_run: bool,
    },
}
