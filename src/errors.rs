use checkout_config::ConfigError;
use checkout_core::ConversionError;
use rustyline::error::ReadlineError;
use thiserror::Error;

/// Failures that end the shell with a non-zero exit code.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Invalid conversion settings: {0}")]
    Conversion(#[from] ConversionError),
    #[error("Line editor error: {0}")]
    Readline(#[from] ReadlineError),
    #[error("Prompt error: {0}")]
    Dialoguer(#[from] dialoguer::Error),
}
