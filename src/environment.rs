//! Target environment handling: tiers, detection and variable lookups.
//!
//! Detection never reads ambient state on its own. The process variable and
//! the `environment` setting are captured into a [`DetectionContext`] at
//! startup and handed to the detector, which is then a pure function of that
//! context.

use std::fmt;
use std::str::FromStr;

use crate::error::OrchestratorError;

/// Process variable naming the current environment.
pub const ENVIRONMENT_VAR: &str = "DRUPAL_ENV";

/// The deployment tiers built-in providers know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Dev,
    Test,
    Prod,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Dev, Tier::Test, Tier::Prod];

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Dev => "dev",
            Tier::Test => "test",
            Tier::Prod => "prod",
        }
    }

    /// Exact, case-sensitive match on `dev`, `test` or `prod`.
    pub fn parse(environment: &str) -> Option<Tier> {
        Tier::ALL.into_iter().find(|t| t.as_str() == environment)
    }

    /// Map an environment string to a tier, resolving anything that is not
    /// `dev` or `test` to [`Tier::Prod`].
    ///
    /// Built-in providers select their values through this, so an
    /// unrecognized environment receives production settings rather than an
    /// error.
    pub fn or_production(environment: &str) -> Tier {
        Tier::parse(environment).unwrap_or(Tier::Prod)
    }

    /// The tier names as owned strings, in declaration order.
    pub fn names() -> Vec<String> {
        Tier::ALL.iter().map(|t| t.as_str().to_string()).collect()
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tier::parse(s).ok_or_else(|| format!("unknown environment '{s}'"))
    }
}

/// Inputs the detector consults, captured once at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionContext {
    /// Value of [`ENVIRONMENT_VAR`].
    pub variable: Option<String>,
    /// The `environment` setting.
    pub settings: Option<String>,
}

impl DetectionContext {
    pub fn new(variable: Option<String>, settings: Option<String>) -> Self {
        Self { variable, settings }
    }

    /// Capture [`ENVIRONMENT_VAR`] from the process environment.
    pub fn from_process(settings: Option<String>) -> Self {
        Self::new(std::env::var(ENVIRONMENT_VAR).ok(), settings)
    }
}

#[derive(Debug, Clone)]
pub struct EnvironmentDetector {
    valid: Vec<String>,
    context: DetectionContext,
}

impl EnvironmentDetector {
    pub fn new(context: DetectionContext) -> Self {
        Self {
            valid: Tier::names(),
            context,
        }
    }

    /// Replace the list of environments detection accepts.
    pub fn with_valid_environments(mut self, valid: Vec<String>) -> Self {
        self.valid = valid;
        self
    }

    pub fn valid_environments(&self) -> &[String] {
        &self.valid
    }

    /// The detected environment: the variable if it names a valid
    /// environment, otherwise the setting if it does, otherwise `None`.
    pub fn detect(&self) -> Option<String> {
        [&self.context.variable, &self.context.settings]
            .into_iter()
            .flatten()
            .find(|env| self.valid.contains(*env))
            .cloned()
    }

    /// Pick the environment for a run. A non-empty explicit choice is used as
    /// given, without validation; otherwise detection decides.
    pub fn resolve(&self, explicit: Option<&str>) -> Result<String, OrchestratorError> {
        if let Some(env) = explicit.filter(|env| !env.is_empty()) {
            return Ok(env.to_string());
        }
        self.detect()
            .ok_or(OrchestratorError::EnvironmentUndetermined)
    }
}

/// Read a required process variable.
pub fn require_env(name: &str) -> Result<String, OrchestratorError> {
    require_var(name, |n| std::env::var(n).ok())
}

/// Like [`require_env`] with an explicit lookup. Empty values count as unset.
pub fn require_var(
    name: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, OrchestratorError> {
    lookup(name)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| OrchestratorError::MissingEnv {
            name: name.to_string(),
        })
}
