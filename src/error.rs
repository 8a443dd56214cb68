use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("No environment specified and could not detect environment")]
    EnvironmentUndetermined,

    #[error("Provider '{provider}' failed for environment '{environment}': {reason}")]
    Provider {
        provider: String,
        environment: String,
        reason: String,
    },

    #[error("{name} environment variable is not set.")]
    MissingEnv { name: String },

    #[error("Unknown built-in provider '{name}' (available: {available})")]
    UnknownProvider { name: String, available: String },

    #[error("Invalid provider definition in {path}: {reason}")]
    InvalidProvider { path: PathBuf, reason: String },

    #[error("Unknown key '{key}' in {path}")]
    UnknownKey { key: String, path: PathBuf },

    #[error("Unknown keys in settings manifest:{}", list(.0))]
    UnknownKeys(Vec<OrchestratorError>),

    #[error("Failed to parse {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(#[from] confique::Error),

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

fn list(errors: &[OrchestratorError]) -> String {
    errors.iter().map(|e| format!("\n  {e}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_undetermined_formats() {
        let err = OrchestratorError::EnvironmentUndetermined;
        assert!(err.to_string().contains("No environment specified"));
    }

    #[test]
    fn missing_env_formats() {
        let err = OrchestratorError::MissingEnv {
            name: "DRUPAL_DB_PASSWORD".into(),
        };
        assert_eq!(
            err.to_string(),
            "DRUPAL_DB_PASSWORD environment variable is not set."
        );
    }

    #[test]
    fn unknown_key_formats_correctly() {
        let err = OrchestratorError::UnknownKey {
            key: "provider_paht".into(),
            path: "/srv/site/composer.json".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("provider_paht"));
        assert!(msg.contains("composer.json"));
    }

    #[test]
    fn provider_error_names_provider_and_environment() {
        let err = OrchestratorError::Provider {
            provider: "search".into(),
            environment: "staging".into(),
            reason: "boom".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("search"));
        assert!(msg.contains("staging"));
        assert!(msg.contains("boom"));
    }

    #[test]
    fn unknown_keys_lists_each_key() {
        let err = OrchestratorError::UnknownKeys(vec![
            OrchestratorError::UnknownKey {
                key: "provider_paht".into(),
                path: "composer.json".into(),
            },
            OrchestratorError::UnknownKey {
                key: "stroe_path".into(),
                path: "composer.json".into(),
            },
        ]);
        let msg = err.to_string();
        assert!(msg.contains("provider_paht"));
        assert!(msg.contains("stroe_path"));
    }
}
