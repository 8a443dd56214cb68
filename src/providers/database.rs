use toml::Value;

use crate::environment::{Tier, require_var};
use crate::error::OrchestratorError;
use crate::provider::{ConfigOverrides, ConfigProvider, ProviderInfo, settings};

pub const ID: &str = "database";

/// Variable the registry reads the database password from.
pub const PASSWORD_VAR: &str = "DRUPAL_DB_PASSWORD";

/// Default connection for the `databases` object.
///
/// The password is supplied at construction and never baked into the
/// provider's output per tier. A provider built without one can still be
/// listed; producing overrides then fails with a missing-variable error.
#[derive(Clone)]
pub struct DatabaseProvider {
    info: ProviderInfo,
    prefix: String,
    password: Option<String>,
}

impl DatabaseProvider {
    pub fn new(password: impl Into<String>) -> Self {
        Self::with_password(Some(password.into()))
    }

    /// Read the password through `lookup` (see [`PASSWORD_VAR`]). An unset or
    /// empty value leaves the provider without one.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self::with_password(require_var(PASSWORD_VAR, lookup).ok())
    }

    fn with_password(password: Option<String>) -> Self {
        Self {
            info: ProviderInfo::new(
                ID,
                "databases",
                "Database configuration settings",
                Tier::names(),
            ),
            prefix: "mysite".to_string(),
            password,
        }
    }

    /// Database name prefix (default `mysite`).
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

impl std::fmt::Debug for DatabaseProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseProvider")
            .field("info", &self.info)
            .field("prefix", &self.prefix)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl ConfigProvider for DatabaseProvider {
    fn info(&self) -> &ProviderInfo {
        &self.info
    }

    fn configuration_overrides(
        &self,
        environment: &str,
    ) -> Result<ConfigOverrides, OrchestratorError> {
        let password = self
            .password
            .clone()
            .ok_or_else(|| OrchestratorError::MissingEnv {
                name: PASSWORD_VAR.to_string(),
            })?;
        let tier = Tier::or_production(environment);
        let (username, host) = match tier {
            Tier::Dev => ("dev_user", "localhost"),
            Tier::Test => ("test_user", "test-db.example.com"),
            Tier::Prod => ("prod_user", "prod-db.example.com"),
        };

        let connection = settings([
            ("database", format!("{}_{}", self.prefix, tier)),
            ("username", username.to_string()),
            ("password", password),
            ("host", host.to_string()),
            ("port", "3306".to_string()),
            ("driver", "mysql".to_string()),
            ("prefix", String::new()),
        ]);
        let default = settings([("default", Value::Table(connection))]);

        Ok(ConfigOverrides::new().with("databases", settings([("default", default)])))
    }
}
