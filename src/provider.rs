//! Provider contract: a named unit of configuration overrides.

use toml::{Table, Value};

use crate::error::OrchestratorError;

/// Descriptive metadata every provider carries.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderInfo {
    /// Identifier shown in listings and used to select built-ins.
    pub id: String,
    /// Logical grouping name, usually the main configuration object touched.
    pub name: String,
    pub description: String,
    environments: Vec<String>,
}

impl ProviderInfo {
    /// Build provider metadata. Duplicate environments are dropped, keeping
    /// the first occurrence.
    pub fn new<I, S>(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        environments: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for env in environments {
            let env = env.into();
            if !unique.contains(&env) {
                unique.push(env);
            }
        }
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            environments: unique,
        }
    }

    pub fn environments(&self) -> &[String] {
        &self.environments
    }
}

/// A source of per-environment configuration overrides.
pub trait ConfigProvider {
    fn info(&self) -> &ProviderInfo;

    /// Environments this provider applies to.
    fn applicable_environments(&self) -> &[String] {
        self.info().environments()
    }

    /// Exact, case-sensitive membership test.
    fn applies_to(&self, environment: &str) -> bool {
        self.applicable_environments()
            .iter()
            .any(|env| env == environment)
    }

    /// Overrides for `environment`, keyed by configuration object name.
    ///
    /// Must succeed for every applicable environment. An error means the
    /// provider itself is broken and aborts the whole run.
    fn configuration_overrides(&self, environment: &str)
    -> Result<ConfigOverrides, OrchestratorError>;
}

/// Insertion-ordered map of configuration object name to settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    entries: Vec<(String, Table)>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, settings: Table) -> Self {
        self.insert(name, settings);
        self
    }

    /// Add settings for an object. An existing entry is replaced where it
    /// stands, so order is that of first insertion.
    pub fn insert(&mut self, name: impl Into<String>, settings: Table) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = settings,
            None => self.entries.push((name, settings)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, settings)| settings)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Table)> {
        self.entries.iter().map(|(n, s)| (n.as_str(), s))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for ConfigOverrides {
    type Item = (String, Table);
    type IntoIter = std::vec::IntoIter<(String, Table)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<N: Into<String>> FromIterator<(N, Table)> for ConfigOverrides {
    fn from_iter<T: IntoIterator<Item = (N, Table)>>(iter: T) -> Self {
        let mut overrides = Self::new();
        for (name, settings) in iter {
            overrides.insert(name, settings);
        }
        overrides
    }
}

/// Build a settings table from key/value pairs, in order.
pub fn settings<K, V, I>(entries: I) -> Table
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    entries
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
