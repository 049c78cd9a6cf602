//! Identity of the workflow run, used in commit messages.

use github_client::Committer;

#[cfg(test)]
#[path = "run_context_tests.rs"]
mod tests;

pub const DEFAULT_COMMITTER_NAME: &str = "github-actions[bot]";
pub const DEFAULT_COMMITTER_EMAIL: &str = "github-actions[bot]@users.noreply.github.com";

const UNKNOWN: &str = "<unknown>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    /// Repository the synchronization runs from
    pub self_repository: String,
    pub run_id: String,
    pub run_number: String,
}

impl Default for RunContext {
    fn default() -> Self {
        Self {
            self_repository: UNKNOWN.to_string(),
            run_id: UNKNOWN.to_string(),
            run_number: "0".to_string(),
        }
    }
}

impl RunContext {
    /// Reads `GITHUB_REPOSITORY`, `GITHUB_RUN_ID` and `GITHUB_RUN_NUMBER`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            self_repository: lookup("GITHUB_REPOSITORY").unwrap_or(defaults.self_repository),
            run_id: lookup("GITHUB_RUN_ID").unwrap_or(defaults.run_id),
            run_number: lookup("GITHUB_RUN_NUMBER").unwrap_or(defaults.run_number),
        }
    }

    pub fn sync_message(&self, destination: &str) -> String {
        format!(
            "Synchronizing file {} from {} (run {} | #{})",
            destination, self.self_repository, self.run_id, self.run_number
        )
    }

    pub fn removal_message(&self, destination: &str) -> String {
        format!(
            "Removing file {} from {} (run {} | #{})",
            destination, self.self_repository, self.run_id, self.run_number
        )
    }
}

/// The bot identity, with any configured field taking precedence.
pub fn committer(name: Option<&str>, email: Option<&str>) -> Committer {
    Committer {
        name: name.unwrap_or(DEFAULT_COMMITTER_NAME).to_string(),
        email: email.unwrap_or(DEFAULT_COMMITTER_EMAIL).to_string(),
    }
}
