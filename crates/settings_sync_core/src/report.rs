//! Outcome of a synchronization run.

use serde::Serialize;

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;

/// Result of running one rule against one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Applied,
    /// The element does not configure the rule
    NotConfigured,
    /// The rule is configured but cannot run on the repository
    Ineligible(&'static str),
    /// The rule raised an error, carried as its display text
    Failed(String),
}

/// A rule that failed on a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleFailure {
    pub repository: String,
    pub rule: String,
    pub message: String,
}

/// Counters over every step of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub elements: usize,
    pub repositories: usize,
    pub applied: usize,
    pub not_configured: usize,
    pub ineligible: usize,
    pub failed: usize,
    pub failures: Vec<RuleFailure>,
}

impl SyncReport {
    pub fn record(&mut self, repository: &str, rule: &str, outcome: StepOutcome) {
        match outcome {
            StepOutcome::Applied => self.applied += 1,
            StepOutcome::NotConfigured => self.not_configured += 1,
            StepOutcome::Ineligible(_) => self.ineligible += 1,
            StepOutcome::Failed(message) => {
                self.failed += 1;
                self.failures.push(RuleFailure {
                    repository: repository.to_string(),
                    rule: rule.to_string(),
                    message,
                });
            }
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
