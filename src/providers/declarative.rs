//! Providers declared in TOML files instead of code.
//!
//! ```toml
//! id = "search"
//! description = "Search API backends"
//! environments = ["dev", "prod"]
//!
//! [common."search_api.server.default"]
//! backend = "search_api_solr"
//!
//! [overrides.dev."search_api.server.default"]
//! backend_config = { host = "localhost" }
//! ```
//!
//! The settings for an environment are `common` deep-merged with that
//! environment's `overrides` block.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use toml::{Table, Value};

use crate::error::OrchestratorError;
use crate::merge::deep_merge;
use crate::provider::{ConfigOverrides, ConfigProvider, ProviderInfo};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProviderFile {
    id: Option<String>,
    name: Option<String>,
    description: Option<String>,
    environments: Vec<String>,
    #[serde(default)]
    common: Table,
    #[serde(default)]
    overrides: Table,
}

#[derive(Debug, Clone)]
pub struct DeclarativeProvider {
    info: ProviderInfo,
    source: PathBuf,
    common: Table,
    overrides: Table,
}

impl DeclarativeProvider {
    /// Parse a provider definition. `path` names the source in errors and
    /// supplies the default id (its file stem).
    pub fn parse(content: &str, path: &Path, namespace: &str) -> Result<Self, OrchestratorError> {
        let invalid = |reason: String| OrchestratorError::InvalidProvider {
            path: path.to_path_buf(),
            reason,
        };

        let file: ProviderFile =
            toml::from_str(content).map_err(|e| invalid(e.message().to_string()))?;

        if file.environments.is_empty() {
            return Err(invalid("environments must not be empty".into()));
        }
        check_objects("common", &file.common).map_err(invalid)?;
        for (env, objects) in &file.overrides {
            if !file.environments.contains(env) {
                return Err(invalid(format!(
                    "overrides for '{env}' which is not listed in environments"
                )));
            }
            let Value::Table(objects) = objects else {
                return Err(invalid(format!("overrides.{env} must be a table")));
            };
            check_objects(&format!("overrides.{env}"), objects).map_err(invalid)?;
        }

        let id = match file.id {
            Some(id) => id,
            None => path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .ok_or_else(|| invalid("cannot derive an id from the file name".into()))?,
        };
        let name = file.name.unwrap_or_else(|| id.clone());
        let qualified = if namespace.is_empty() {
            id
        } else {
            format!("{namespace}\\{id}")
        };

        Ok(Self {
            info: ProviderInfo::new(
                qualified,
                name,
                file.description.unwrap_or_default(),
                file.environments,
            ),
            source: path.to_path_buf(),
            common: file.common,
            overrides: file.overrides,
        })
    }

    pub fn from_file(path: &Path, namespace: &str) -> Result<Self, OrchestratorError> {
        let content = std::fs::read_to_string(path).map_err(|e| OrchestratorError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content, path, namespace)
    }

    /// Load every `*.toml` file in `dir`, sorted by file name. A missing
    /// directory yields no providers.
    pub fn discover(dir: &Path, namespace: &str) -> Result<Vec<Self>, OrchestratorError> {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(dir = %dir.display(), "provider directory does not exist");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(OrchestratorError::IoError {
                    path: dir.to_path_buf(),
                    source: e,
                });
            }
        };

        let mut files: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| OrchestratorError::IoError {
                    path: dir.to_path_buf(),
                    source: e,
                })?
                .path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "toml") {
                files.push(path);
            }
        }
        files.sort();

        files
            .iter()
            .map(|path| {
                tracing::debug!(file = %path.display(), "loading declarative provider");
                Self::from_file(path, namespace)
            })
            .collect()
    }

    /// File the provider was loaded from.
    pub fn source(&self) -> &Path {
        &self.source
    }
}

fn check_objects(location: &str, objects: &Table) -> Result<(), String> {
    match objects.iter().find(|(_, settings)| !settings.is_table()) {
        Some((name, _)) => Err(format!("{location}.\"{name}\" must be a table of settings")),
        None => Ok(()),
    }
}

impl ConfigProvider for DeclarativeProvider {
    fn info(&self) -> &ProviderInfo {
        &self.info
    }

    fn configuration_overrides(
        &self,
        environment: &str,
    ) -> Result<ConfigOverrides, OrchestratorError> {
        if !self.applies_to(environment) {
            return Err(OrchestratorError::Provider {
                provider: self.info.id.clone(),
                environment: environment.to_string(),
                reason: format!(
                    "environment is not one of: {}",
                    self.info.environments().join(", ")
                ),
            });
        }

        let specific = match self.overrides.get(environment) {
            Some(Value::Table(t)) => t.clone(),
            _ => Table::new(),
        };

        Ok(deep_merge(self.common.clone(), specific)
            .into_iter()
            .filter_map(|(name, settings)| match settings {
                Value::Table(t) => Some((name, t)),
                _ => None,
            })
            .collect())
    }
}
