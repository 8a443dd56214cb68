//! Result types returned by an apply run.

use std::fmt;

use toml::Table;

/// Outcome of applying one configuration object.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyResult {
    pub message: String,
    pub success: bool,
    /// The settings that would be written. Only set in dry-run mode.
    pub changes: Option<Table>,
}

impl ApplyResult {
    pub fn succeeded(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
            changes: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
            changes: None,
        }
    }

    pub fn preview(message: impl Into<String>, changes: Table) -> Self {
        Self {
            message: message.into(),
            success: true,
            changes: Some(changes),
        }
    }
}

/// Per-provider tally.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderReport {
    pub provider: String,
    pub success_count: usize,
    /// Objects that were loaded from the store. Objects that could not be
    /// loaded appear in `details` but not here.
    pub total_count: usize,
    pub details: Vec<ApplyResult>,
}

impl ProviderReport {
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            success_count: 0,
            total_count: 0,
            details: Vec::new(),
        }
    }
}

/// Totals across every provider that ran.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateResult {
    pub success_count: usize,
    pub total_count: usize,
    pub providers: Vec<ProviderReport>,
}

impl AggregateResult {
    pub fn push(&mut self, report: ProviderReport) {
        self.success_count += report.success_count;
        self.total_count += report.total_count;
        self.providers.push(report);
    }

    /// Every detail, in provider then object order.
    pub fn details(&self) -> impl Iterator<Item = &ApplyResult> {
        self.providers.iter().flat_map(|p| p.details.iter())
    }
}

impl fmt::Display for AggregateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Configuration updates completed: {}/{} successful",
            self.success_count, self.total_count
        )?;
        let mut details = self.details().peekable();
        if details.peek().is_some() {
            write!(f, "\nDetails:")?;
            for detail in details {
                write!(f, "\n- {}", detail.message)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_sums_counts() {
        let mut aggregate = AggregateResult::default();
        let mut first = ProviderReport::new("site-settings");
        first.success_count = 2;
        first.total_count = 2;
        let mut second = ProviderReport::new("database");
        second.total_count = 1;
        aggregate.push(first);
        aggregate.push(second);

        assert_eq!(aggregate.success_count, 2);
        assert_eq!(aggregate.total_count, 3);
        assert_eq!(aggregate.providers.len(), 2);
    }

    #[test]
    fn display_without_details() {
        let aggregate = AggregateResult::default();
        assert_eq!(
            aggregate.to_string(),
            "Configuration updates completed: 0/0 successful"
        );
    }

    #[test]
    fn display_lists_details() {
        let mut report = ProviderReport::new("site-settings");
        report.details.push(ApplyResult::succeeded("Updated configuration: system.site"));
        report
            .details
            .push(ApplyResult::failed("Could not load configuration: system.performance"));
        report.success_count = 1;
        report.total_count = 1;
        let mut aggregate = AggregateResult::default();
        aggregate.push(report);

        assert_eq!(
            aggregate.to_string(),
            "Configuration updates completed: 1/1 successful\n\
             Details:\n\
             - Updated configuration: system.site\n\
             - Could not load configuration: system.performance"
        );
    }
}
