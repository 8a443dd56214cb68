use std::marker::PhantomData;
use std::path::PathBuf;

use confique::Config;
use serde::Deserialize;

use crate::error::OrchestratorError;
use crate::file;
use crate::manifest::{self, MANIFEST_FILE, MANIFEST_SECTION};
use crate::resolve::{self, ResolveInput};
use crate::settings::OrchestratorSettings;
use crate::types::{Boundary, SearchPath};

/// Default prefix for settings environment variables.
pub const ENV_PREFIX: &str = "DRUPAL_CONFIG";

/// Builder that discovers and resolves settings layers.
///
/// Layers, lowest priority first: compiled defaults, the nearest manifest,
/// `DRUPAL_CONFIG_*` environment variables, CLI overrides.
pub struct SettingsLoader<C: Config = OrchestratorSettings> {
    manifest_name: String,
    manifest_section: String,
    search_paths: Vec<SearchPath>,
    cwd: Option<PathBuf>,
    env_prefix: Option<String>,
    strict: bool,
    cli_overrides: Vec<(String, toml::Value)>,
    _phantom: PhantomData<C>,
}

impl SettingsLoader<OrchestratorSettings> {
    pub fn new() -> Self {
        Self::for_config()
    }
}

impl Default for SettingsLoader<OrchestratorSettings> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Config> SettingsLoader<C> {
    /// Loader for an arbitrary confique settings type.
    pub fn for_config() -> Self {
        Self {
            manifest_name: MANIFEST_FILE.to_string(),
            manifest_section: MANIFEST_SECTION.to_string(),
            search_paths: vec![SearchPath::Ancestors(Boundary::Root)],
            cwd: None,
            env_prefix: Some(ENV_PREFIX.to_string()),
            strict: true,
            cli_overrides: Vec::new(),
            _phantom: PhantomData,
        }
    }

    /// Override the manifest file name (default: `composer.json`).
    pub fn manifest_name(mut self, name: &str) -> Self {
        self.manifest_name = name.to_string();
        self
    }

    /// Override the `extra` key holding the settings section.
    pub fn manifest_section(mut self, section: &str) -> Self {
        self.manifest_section = section.to_string();
        self
    }

    /// Replace the manifest search paths (priority-ascending; the last entry wins).
    pub fn search_paths(mut self, paths: Vec<SearchPath>) -> Self {
        self.search_paths = paths;
        self
    }

    /// Anchor `Cwd` and `Ancestors` at `dir` instead of the process working directory.
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Override the environment variable prefix (default: `DRUPAL_CONFIG`).
    pub fn env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Disable environment variable loading entirely.
    pub fn no_env(mut self) -> Self {
        self.env_prefix = None;
        self
    }

    /// Enable or disable strict mode (default: `true`).
    /// In strict mode, unknown keys in the manifest section produce errors.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Add a CLI override. `None` values are ignored (useful for optional clap args).
    pub fn cli_override<V: Into<toml::Value>>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.cli_overrides.push((key.to_string(), v.into()));
        }
        self
    }

    fn effective_cwd(&self) -> Option<PathBuf> {
        self.cwd
            .clone()
            .or_else(|| std::env::current_dir().ok())
    }

    fn build_input(&self) -> Result<ResolveInput, OrchestratorError> {
        let cwd = self.effective_cwd();
        let dirs = file::expand_search_paths(&self.search_paths, cwd.as_deref());

        let manifest = match file::load_nearest(&dirs, &self.manifest_name)? {
            Some((path, content)) => {
                tracing::debug!(manifest = %path.display(), "found project manifest");
                manifest::extract_section(&path, &content, &self.manifest_section)?
                    .map(|section| (path, section))
            }
            None => None,
        };

        let env_vars = match self.env_prefix {
            Some(_) => std::env::vars().collect(),
            None => Vec::new(),
        };

        Ok(ResolveInput {
            manifest,
            env_vars,
            env_prefix: self.env_prefix.clone(),
            cli_overrides: self.cli_overrides.clone(),
            strict: self.strict,
        })
    }

    /// Discover and resolve the settings through all layers.
    pub fn load(self) -> Result<C, OrchestratorError>
    where
        C::Layer: for<'de> Deserialize<'de>,
    {
        let input = self.build_input()?;
        resolve::resolve(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_manifest(dir: &std::path::Path, section: &str) {
        let content = format!(
            r#"{{"name": "acme/site", "extra": {{"drupal-config-orchestrator": {section}}}}}"#
        );
        fs::write(dir.join("composer.json"), content).unwrap();
    }

    #[test]
    fn defaults_when_no_manifest() {
        let dir = TempDir::new().unwrap();
        let settings = SettingsLoader::new()
            .search_paths(vec![SearchPath::Cwd])
            .working_dir(dir.path())
            .no_env()
            .load()
            .unwrap();
        assert_eq!(settings.provider_path, PathBuf::from("config/providers"));
    }

    #[test]
    fn manifest_found_in_ancestor() {
        let root = TempDir::new().unwrap();
        write_manifest(root.path(), r#"{"provider-path": "config/overrides"}"#);
        let deep = root.path().join("web").join("sites").join("default");
        fs::create_dir_all(&deep).unwrap();

        let settings = SettingsLoader::new()
            .search_paths(vec![SearchPath::Ancestors(Boundary::Marker("composer.json"))])
            .working_dir(&deep)
            .no_env()
            .load()
            .unwrap();
        assert_eq!(settings.provider_path, PathBuf::from("config/overrides"));
    }

    #[test]
    fn nearest_manifest_without_section_uses_defaults() {
        let root = TempDir::new().unwrap();
        write_manifest(root.path(), r#"{"provider-path": "outer"}"#);
        let inner = root.path().join("inner");
        fs::create_dir_all(&inner).unwrap();
        fs::write(inner.join("composer.json"), r#"{"name": "acme/inner"}"#).unwrap();

        let settings = SettingsLoader::new()
            .search_paths(vec![SearchPath::Ancestors(Boundary::Root)])
            .working_dir(&inner)
            .no_env()
            .load()
            .unwrap();
        assert_eq!(settings.provider_path, PathBuf::from("config/providers"));
    }

    #[test]
    fn cli_override_beats_manifest() {
        let dir = TempDir::new().unwrap();
        write_manifest(dir.path(), r#"{"store-path": "manifest/sync"}"#);

        let settings = SettingsLoader::new()
            .search_paths(vec![SearchPath::Path(dir.path().to_path_buf())])
            .no_env()
            .cli_override("store_path", Some("cli/sync"))
            .load()
            .unwrap();
        assert_eq!(settings.store_path, PathBuf::from("cli/sync"));
    }

    #[test]
    fn cli_override_none_skipped() {
        let loader = SettingsLoader::new().cli_override::<String>("store_path", None);
        assert!(loader.cli_overrides.is_empty());
    }

    #[test]
    fn strict_manifest_typo_fails() {
        let dir = TempDir::new().unwrap();
        write_manifest(dir.path(), r#"{"provider-paht": "typo"}"#);

        let result = SettingsLoader::new()
            .search_paths(vec![SearchPath::Path(dir.path().to_path_buf())])
            .no_env()
            .load();
        assert!(matches!(result, Err(OrchestratorError::UnknownKeys(_))));
    }

    #[test]
    fn custom_manifest_name_and_section() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("project.json"),
            r#"{"extra": {"orchestrator": {"store-path": "custom"}}}"#,
        )
        .unwrap();

        let settings = SettingsLoader::new()
            .manifest_name("project.json")
            .manifest_section("orchestrator")
            .search_paths(vec![SearchPath::Path(dir.path().to_path_buf())])
            .no_env()
            .load()
            .unwrap();
        assert_eq!(settings.store_path, PathBuf::from("custom"));
    }
}
