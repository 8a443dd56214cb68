//! Settings resolution: merge all layers and produce typed settings.
//!
//! Operates on pre-loaded data (`ResolveInput`) with no I/O, so the whole
//! pipeline is testable with synthetic inputs. Steps:
//!
//! 1. Validate the manifest section (if strict mode)
//! 2. Environment variables on top of the manifest, unknown names dropped.
//!    A value keeps its inferred type only if the field accepts it;
//!    otherwise it stays a string (`DRUPAL_CONFIG_PROVIDER_PATH=2024`)
//! 3. CLI overrides on top (highest priority)
//! 4. Deserialize the merged table into `C::Layer`
//! 5. Let confique fill defaults and validate required fields

use std::path::PathBuf;

use confique::Config;
use serde::Deserialize;
use toml::{Table, Value};

use crate::env;
use crate::error::OrchestratorError;
use crate::merge::deep_merge;
use crate::overrides;
use crate::validate;

/// All pre-loaded data needed to resolve settings. No I/O happens here.
pub struct ResolveInput {
    /// The manifest path and its settings section, when one was found.
    pub manifest: Option<(PathBuf, Table)>,
    /// Raw environment variable pairs (pass `std::env::vars().collect()` or synthetic data).
    pub env_vars: Vec<(String, String)>,
    /// Env var prefix (e.g. `"DRUPAL_CONFIG"`). `None` means env disabled.
    pub env_prefix: Option<String>,
    /// CLI overrides as `(dotted_key, value)` pairs.
    pub cli_overrides: Vec<(String, Value)>,
    /// Whether to reject unknown keys in the manifest section.
    pub strict: bool,
}

/// Resolve settings from pre-loaded inputs.
pub fn resolve<C: Config>(input: ResolveInput) -> Result<C, OrchestratorError>
where
    C::Layer: for<'de> Deserialize<'de>,
{
    let mut merged = Table::new();

    if let Some((path, section)) = input.manifest {
        if input.strict {
            validate::validate_unknown_keys::<C>(&section, &path)?;
        }
        merged = deep_merge(merged, section);
    }

    if let Some(prefix) = &input.env_prefix {
        let known = overrides::valid_keys(&C::META);
        let pairs: Vec<(String, Value)> = env::env_to_pairs(prefix, input.env_vars)
            .into_iter()
            .filter(|(key, _)| known.contains(key))
            .map(|(key, raw)| {
                let value = env_value::<C>(&key, raw);
                (key, value)
            })
            .collect();
        merged = deep_merge(merged, overrides::overrides_to_table(&pairs));
    }

    if !input.cli_overrides.is_empty() {
        let cli_table = overrides::overrides_to_table(&input.cli_overrides);
        merged = deep_merge(merged, cli_table);
    }

    let layer: C::Layer = Value::Table(merged)
        .try_into()
        .map_err(|e: toml::de::Error| OrchestratorError::InvalidValue {
            key: "<merged>".into(),
            reason: e.to_string(),
        })?;

    C::builder()
        .preloaded(layer)
        .load()
        .map_err(OrchestratorError::from)
}

/// Type an env var value for `key`, falling back to the raw string when the
/// settings layer rejects the inferred type.
fn env_value<C: Config>(key: &str, raw: String) -> Value
where
    C::Layer: for<'de> Deserialize<'de>,
{
    let typed = env::parse_env_value(&raw);
    if typed.is_str() {
        return typed;
    }
    let single = overrides::overrides_to_table(&[(key.to_string(), typed.clone())]);
    match Value::Table(single).try_into::<C::Layer>() {
        Ok(_) => typed,
        Err(_) => Value::String(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::OrchestratorSettings;

    fn empty_input() -> ResolveInput {
        ResolveInput {
            manifest: None,
            env_vars: vec![],
            env_prefix: Some("DRUPAL_CONFIG".into()),
            cli_overrides: vec![],
            strict: true,
        }
    }

    fn manifest(toml_str: &str) -> Option<(PathBuf, Table)> {
        Some(("composer.json".into(), toml_str.parse().unwrap()))
    }

    #[test]
    fn defaults_only() {
        let settings: OrchestratorSettings = resolve(empty_input()).unwrap();
        assert_eq!(settings.provider_path, PathBuf::from("config/providers"));
        assert_eq!(settings.store_path, PathBuf::from("config/sync"));
    }

    #[test]
    fn manifest_overrides_default() {
        let input = ResolveInput {
            manifest: manifest("provider_namespace = \"Acme\\\\Provider\"\n"),
            ..empty_input()
        };
        let settings: OrchestratorSettings = resolve(input).unwrap();
        assert_eq!(settings.provider_namespace, "Acme\\Provider");
        assert_eq!(settings.provider_path, PathBuf::from("config/providers"));
    }

    #[test]
    fn env_overrides_manifest() {
        let input = ResolveInput {
            manifest: manifest("provider_path = \"from/manifest\"\n"),
            env_vars: vec![("DRUPAL_CONFIG_PROVIDER_PATH".into(), "from/env".into())],
            ..empty_input()
        };
        let settings: OrchestratorSettings = resolve(input).unwrap();
        assert_eq!(settings.provider_path, PathBuf::from("from/env"));
    }

    #[test]
    fn empty_env_value_falls_through_to_manifest() {
        let input = ResolveInput {
            manifest: manifest("provider_path = \"from/manifest\"\n"),
            env_vars: vec![("DRUPAL_CONFIG_PROVIDER_PATH".into(), String::new())],
            ..empty_input()
        };
        let settings: OrchestratorSettings = resolve(input).unwrap();
        assert_eq!(settings.provider_path, PathBuf::from("from/manifest"));
    }

    #[test]
    fn numeric_env_value_for_path_stays_a_string() {
        let input = ResolveInput {
            env_vars: vec![
                ("DRUPAL_CONFIG_PROVIDER_PATH".into(), "2024".into()),
                ("DRUPAL_CONFIG_STORE_PATH".into(), "1.5".into()),
                ("DRUPAL_CONFIG_ENVIRONMENT".into(), "true".into()),
            ],
            ..empty_input()
        };
        let settings: OrchestratorSettings = resolve(input).unwrap();
        assert_eq!(settings.provider_path, PathBuf::from("2024"));
        assert_eq!(settings.store_path, PathBuf::from("1.5"));
        assert_eq!(settings.environment.as_deref(), Some("true"));
    }

    #[test]
    fn unknown_env_names_are_ignored() {
        let input = ResolveInput {
            env_vars: vec![("DRUPAL_CONFIG_SOMETHING_ELSE".into(), "x".into())],
            ..empty_input()
        };
        assert!(resolve::<OrchestratorSettings>(input).is_ok());
    }

    #[test]
    fn disabled_env_is_not_read() {
        let input = ResolveInput {
            env_vars: vec![("DRUPAL_CONFIG_STORE_PATH".into(), "elsewhere".into())],
            env_prefix: None,
            ..empty_input()
        };
        let settings: OrchestratorSettings = resolve(input).unwrap();
        assert_eq!(settings.store_path, PathBuf::from("config/sync"));
    }

    #[test]
    fn cli_overrides_everything() {
        let input = ResolveInput {
            manifest: manifest("store_path = \"manifest\"\n"),
            env_vars: vec![("DRUPAL_CONFIG_STORE_PATH".into(), "env".into())],
            cli_overrides: vec![("store_path".into(), Value::String("cli".into()))],
            ..empty_input()
        };
        let settings: OrchestratorSettings = resolve(input).unwrap();
        assert_eq!(settings.store_path, PathBuf::from("cli"));
    }

    #[test]
    fn nested_layers_merge_sparsely() {
        let input = ResolveInput {
            manifest: manifest("[log]\nformat = \"json\"\n"),
            env_vars: vec![("DRUPAL_CONFIG_LOG__LEVEL".into(), "debug".into())],
            ..empty_input()
        };
        let settings: OrchestratorSettings = resolve(input).unwrap();
        assert_eq!(settings.log.format, "json");
        assert_eq!(settings.log.level, "debug");
    }

    #[test]
    fn environment_setting_from_manifest() {
        let input = ResolveInput {
            manifest: manifest("environment = \"test\"\n"),
            ..empty_input()
        };
        let settings: OrchestratorSettings = resolve(input).unwrap();
        assert_eq!(settings.environment.as_deref(), Some("test"));
    }

    #[test]
    fn strict_rejects_unknown_manifest_key() {
        let input = ResolveInput {
            manifest: manifest("typo = 1\n"),
            ..empty_input()
        };
        let result = resolve::<OrchestratorSettings>(input);
        assert!(matches!(result, Err(OrchestratorError::UnknownKeys(_))));
    }

    #[test]
    fn lenient_allows_unknown_manifest_key() {
        let input = ResolveInput {
            manifest: manifest("typo = 1\nstore_path = \"sync\"\n"),
            strict: false,
            ..empty_input()
        };
        let settings: OrchestratorSettings = resolve(input).unwrap();
        assert_eq!(settings.store_path, PathBuf::from("sync"));
    }
}
