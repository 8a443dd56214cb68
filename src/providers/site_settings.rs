use toml::{Table, Value};

use crate::environment::Tier;
use crate::error::OrchestratorError;
use crate::provider::{ConfigOverrides, ConfigProvider, ProviderInfo, settings};

pub const ID: &str = "site-settings";

/// Site identity and front-end performance settings.
///
/// Development and test sites get a suffixed name and their own admin
/// address; aggregation and page caching are switched on in production only.
#[derive(Debug, Clone)]
pub struct SiteSettingsProvider {
    info: ProviderInfo,
    site_name: String,
}

impl SiteSettingsProvider {
    pub fn new(site_name: impl Into<String>) -> Self {
        Self {
            info: ProviderInfo::new(
                ID,
                "system.site",
                "Site configuration settings",
                Tier::names(),
            ),
            site_name: site_name.into(),
        }
    }

    fn site_name(&self, tier: Tier) -> String {
        match tier {
            Tier::Dev => format!("{} (Development)", self.site_name),
            Tier::Test => format!("{} (Staging)", self.site_name),
            Tier::Prod => self.site_name.clone(),
        }
    }
}

impl Default for SiteSettingsProvider {
    fn default() -> Self {
        Self::new("My Site")
    }
}

fn admin_mail(tier: Tier) -> &'static str {
    match tier {
        Tier::Dev => "dev-admin@example.com",
        Tier::Test => "test-admin@example.com",
        Tier::Prod => "admin@example.com",
    }
}

fn aggregation(enabled: bool) -> Table {
    settings([("preprocess", enabled), ("gzip", enabled)])
}

impl ConfigProvider for SiteSettingsProvider {
    fn info(&self) -> &ProviderInfo {
        &self.info
    }

    fn configuration_overrides(
        &self,
        environment: &str,
    ) -> Result<ConfigOverrides, OrchestratorError> {
        let tier = Tier::or_production(environment);
        let prod = tier == Tier::Prod;

        let site = settings([
            ("name", self.site_name(tier)),
            ("slogan", "A Drupal Website".to_string()),
            ("mail", admin_mail(tier).to_string()),
        ]);

        let page = settings([("max_age", if prod { 3600 } else { 0 })]);
        let performance = settings([
            ("css", Value::Table(aggregation(prod))),
            ("js", Value::Table(aggregation(prod))),
            ("cache", Value::Table(settings([("page", page)]))),
        ]);

        Ok(ConfigOverrides::new()
            .with("system.site", site)
            .with("system.performance", performance))
    }
}
