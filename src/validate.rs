//! Strict-mode validation: reject unknown keys in the manifest settings section.
//!
//! Uses `serde_ignored` to deserialize into `C::Layer` (all-optional fields)
//! and capture every key the layer doesn't consume.

use std::path::Path;

use confique::Config;
use serde::Deserialize;
use toml::{Table, Value};

use crate::error::OrchestratorError;

/// Validate that `section` contains no keys unknown to settings type `C`.
pub fn validate_unknown_keys<C: Config>(
    section: &Table,
    path: &Path,
) -> Result<(), OrchestratorError>
where
    C::Layer: for<'de> Deserialize<'de>,
{
    let mut unknown_keys: Vec<String> = Vec::new();

    let _layer: C::Layer = serde_ignored::deserialize(Value::Table(section.clone()), |ignored| {
        unknown_keys.push(ignored.to_string());
    })
    .map_err(|e: toml::de::Error| OrchestratorError::ParseError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    if unknown_keys.is_empty() {
        return Ok(());
    }

    let errors = unknown_keys
        .into_iter()
        .map(|key| OrchestratorError::UnknownKey {
            key,
            path: path.to_path_buf(),
        })
        .collect();

    Err(OrchestratorError::UnknownKeys(errors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::OrchestratorSettings;

    fn path() -> &'static Path {
        Path::new("/srv/site/composer.json")
    }

    fn section(toml_str: &str) -> Table {
        toml_str.parse().unwrap()
    }

    #[test]
    fn known_keys_pass() {
        let table = section(
            "provider_namespace = \"Acme\"\nprovider_path = \"p\"\n[log]\nlevel = \"info\"\n",
        );
        assert!(validate_unknown_keys::<OrchestratorSettings>(&table, path()).is_ok());
    }

    #[test]
    fn empty_section_passes() {
        assert!(validate_unknown_keys::<OrchestratorSettings>(&Table::new(), path()).is_ok());
    }

    #[test]
    fn unknown_top_level_key() {
        let table = section("provider_paht = \"typo\"\n");
        let err = validate_unknown_keys::<OrchestratorSettings>(&table, path()).unwrap_err();
        match err {
            OrchestratorError::UnknownKeys(keys) => {
                assert_eq!(keys.len(), 1);
                match &keys[0] {
                    OrchestratorError::UnknownKey { key, path } => {
                        assert_eq!(key, "provider_paht");
                        assert!(path.ends_with("composer.json"));
                    }
                    other => panic!("Expected UnknownKey, got: {other:?}"),
                }
            }
            other => panic!("Expected UnknownKeys, got: {other:?}"),
        }
    }

    #[test]
    fn unknown_nested_key_is_dotted() {
        let table = section("[log]\nlevle = \"debug\"\n");
        let err = validate_unknown_keys::<OrchestratorSettings>(&table, path()).unwrap_err();
        match err {
            OrchestratorError::UnknownKeys(keys) => match &keys[0] {
                OrchestratorError::UnknownKey { key, .. } => assert_eq!(key, "log.levle"),
                other => panic!("Expected UnknownKey, got: {other:?}"),
            },
            other => panic!("Expected UnknownKeys, got: {other:?}"),
        }
    }

    #[test]
    fn wrong_type_is_a_parse_error() {
        let table = section("builtin_providers = 5\n");
        let err = validate_unknown_keys::<OrchestratorSettings>(&table, path()).unwrap_err();
        assert!(matches!(err, OrchestratorError::ParseError { .. }));
    }
}
