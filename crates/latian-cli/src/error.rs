//! CLI error types.

use latian_app::AppError;
use thiserror::Error;

/// Errors that end the `latian` process with a non-zero status.
#[derive(Error, Debug)]
pub enum CliError {
    /// Startup or supervisor failure.
    #[error(transparent)]
    App(#[from] AppError),

    /// Logging could not be installed.
    #[error("failed to initialize logging: {0}")]
    Logging(String),
}
