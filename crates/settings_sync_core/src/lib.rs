//! Reconciliation engine for repository settings.
//!
//! For each configuration element the [`SettingsSynchronizer`] lists the owner's
//! repositories, narrows them with the selector, and runs every [`Rule`] against each
//! remaining repository. Rules read current remote state through the
//! [`github_client::RepositoryClient`] trait and issue only the writes needed to reach
//! the desired state.

pub mod cipher;
pub mod content;
pub mod errors;
pub mod property;
pub mod report;
pub mod rules;
pub mod run_context;
pub mod selector;
pub mod synchronizer;

#[cfg(test)]
mod test_support;

pub use cipher::encrypt_secret;
pub use content::{deep_merge, FileContentResolver};
pub use errors::{SyncError, SyncResult};
pub use property::{has_property, matches_all, matches_condition};
pub use report::{RuleFailure, StepOutcome, SyncReport};
pub use rules::{Desired, Rule, RuleContext};
pub use run_context::RunContext;
pub use selector::select_repositories;
pub use synchronizer::SettingsSynchronizer;
