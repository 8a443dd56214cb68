//! Project manifest (`composer.json`) settings extraction.
//!
//! Settings live under `extra."drupal-config-orchestrator"` with kebab-case
//! keys, mirroring the rest of the manifest:
//!
//! ```json
//! {
//!   "extra": {
//!     "drupal-config-orchestrator": {
//!       "provider-namespace": "Acme\\Config\\Provider",
//!       "provider-path": "config/providers"
//!     }
//!   }
//! }
//! ```
//!
//! The section is converted to a `toml::Table` with snake_case keys so it
//! merges like any other layer.

use std::path::Path;

use toml::{Table, Value};

use crate::error::OrchestratorError;

/// Manifest file searched for in the working directory and its ancestors.
pub const MANIFEST_FILE: &str = "composer.json";

/// Key under `extra` holding this crate's settings.
pub const MANIFEST_SECTION: &str = "drupal-config-orchestrator";

/// Parse `content` and return the settings section, if the manifest has one.
pub fn extract_section(
    path: &Path,
    content: &str,
    section: &str,
) -> Result<Option<Table>, OrchestratorError> {
    let manifest: serde_json::Value =
        serde_json::from_str(content).map_err(|e| OrchestratorError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let Some(raw) = manifest.get("extra").and_then(|extra| extra.get(section)) else {
        return Ok(None);
    };

    let value = Value::try_from(raw).map_err(|e| OrchestratorError::ParseError {
        path: path.to_path_buf(),
        reason: format!("extra.{section}: {e}"),
    })?;

    match value {
        Value::Table(table) => Ok(Some(snake_case_keys(table))),
        other => Err(OrchestratorError::InvalidValue {
            key: format!("extra.{section}"),
            reason: format!("expected an object, found {}", other.type_str()),
        }),
    }
}

fn snake_case_keys(table: Table) -> Table {
    table
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::Table(inner) => Value::Table(snake_case_keys(inner)),
                other => other,
            };
            (key.replace('-', "_"), value)
        })
        .collect()
}
