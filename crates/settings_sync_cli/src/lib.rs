//! `settings-sync` library exports for integration testing.

pub mod commands;
pub mod credentials;
pub mod errors;
