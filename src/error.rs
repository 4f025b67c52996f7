//! Crate-level error type.

use crate::config::SettingsError;
use crate::executor::ExecError;
use crate::join::JoinError;
use crate::model::{MapError, ModelError};

/// Any error raised by the query core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Mapping error: {0}")]
    Map(#[from] MapError),

    #[error("Join error: {0}")]
    Join(#[from] JoinError),

    /// Execution errors pass through untouched.
    #[error(transparent)]
    Exec(#[from] ExecError),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
}

pub type Result<T> = std::result::Result<T, Error>;
