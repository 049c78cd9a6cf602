//! Configuration document for settings synchronization.
//!
//! The document lists elements, each targeting the repositories of one owner with the
//! desired state for features, rulesets, environments, Actions settings and files. This
//! crate owns the typed model, the YAML loader, `${NAME}` substitution and the JSON
//! schema used both for validation and for editor tooling.

pub mod configuration;
pub mod errors;
pub mod loader;
pub mod schema;
pub mod substitution;

pub use configuration::{
    ActionSecret, ActionsSettings, CommitterOverride, Configuration, Element,
    EnvironmentDefinition, FileFormat, FileMapping, FilesOperation, MergeFile, MergeSource,
    PropertyCondition, ProtectionRule, SearchType, Selection,
};
pub use errors::{ConfigurationError, ConfigurationResult};
pub use loader::{
    load_configuration, load_configuration_from_str, validate_configuration, DEFAULT_CONFIG_PATH,
};
pub use schema::{configuration_schema, validate_against_schema};
pub use substitution::substitute_env_vars;
