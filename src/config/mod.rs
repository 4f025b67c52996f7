//! Configuration for joinery.
//!
//! Handles the settings file and environment variable expansion.

mod settings;

pub use settings::{expand_env_vars, DatabaseSettings, ExecutorSettings, Settings, SettingsError};
