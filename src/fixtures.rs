//! Test doubles shared across module tests.

#[cfg(test)]
pub mod test {
    use std::cell::Cell;
    use std::collections::{HashMap, HashSet};
    use std::rc::Rc;

    use toml::Table;

    use crate::error::OrchestratorError;
    use crate::provider::{ConfigOverrides, ConfigProvider, ProviderInfo};
    use crate::store::{ConfigSource, ConfigStore, EditableConfig, StoreError};

    /// In-memory store. Objects must be seeded to be loadable.
    #[derive(Debug, Default)]
    pub struct StubStore {
        pub objects: HashMap<String, Table>,
        failing: HashSet<String>,
        forbid_writes: bool,
        pub saves: usize,
    }

    impl StubStore {
        pub fn with_objects(names: &[&str]) -> Self {
            Self {
                objects: names.iter().map(|n| (n.to_string(), Table::new())).collect(),
                ..Self::default()
            }
        }

        /// Saving `name` fails with a store error.
        pub fn failing_on(mut self, name: &str) -> Self {
            self.failing.insert(name.to_string());
            self
        }

        /// Any save panics, failing the test.
        pub fn forbid_writes(mut self) -> Self {
            self.forbid_writes = true;
            self
        }

        pub fn object(&self, name: &str) -> &Table {
            &self.objects[name]
        }
    }

    impl ConfigSource for StubStore {
        fn get_editable(&self, name: &str) -> Option<EditableConfig> {
            self.objects
                .get(name)
                .map(|data| EditableConfig::new(name, data.clone()))
        }
    }

    impl ConfigStore for StubStore {
        fn save(&mut self, config: EditableConfig) -> Result<(), StoreError> {
            assert!(!self.forbid_writes, "save called on {}", config.name());
            if self.failing.contains(config.name()) {
                return Err(StoreError::Rejected(format!(
                    "schema violation in {}",
                    config.name()
                )));
            }
            self.saves += 1;
            self.objects.insert(config.name().to_string(), config.into_data());
            Ok(())
        }
    }

    /// Provider returning the same overrides for every environment. `calls`
    /// is shared so tests can read it after handing the provider off.
    pub struct StaticProvider {
        info: ProviderInfo,
        overrides: ConfigOverrides,
        broken: bool,
        pub calls: Rc<Cell<usize>>,
    }

    impl StaticProvider {
        pub fn new(id: &str, environments: &[&str], overrides: ConfigOverrides) -> Self {
            Self {
                info: ProviderInfo::new(id, id, "", environments.iter().copied()),
                overrides,
                broken: false,
                calls: Rc::new(Cell::new(0)),
            }
        }

        /// Every call to `configuration_overrides` fails.
        pub fn broken(id: &str, environments: &[&str]) -> Self {
            Self {
                broken: true,
                ..Self::new(id, environments, ConfigOverrides::new())
            }
        }
    }

    impl ConfigProvider for StaticProvider {
        fn info(&self) -> &ProviderInfo {
            &self.info
        }

        fn configuration_overrides(
            &self,
            environment: &str,
        ) -> Result<ConfigOverrides, OrchestratorError> {
            self.calls.set(self.calls.get() + 1);
            if self.broken {
                return Err(OrchestratorError::Provider {
                    provider: self.info.id.clone(),
                    environment: environment.to_string(),
                    reason: "broken provider".into(),
                });
            }
            Ok(self.overrides.clone())
        }
    }
}
