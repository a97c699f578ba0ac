/// CLI error types
use pocket_playback::PlaybackError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown command: {0} (try `help`)")]
    UnknownCommand(String),

    #[error("Invalid argument for `{command}`: {message}")]
    InvalidArgument {
        command: &'static str,
        message: String,
    },

    #[error("Not queued: {0}")]
    NotQueued(String),

    #[error(transparent)]
    Playback(#[from] PlaybackError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        CliError::Config(err.to_string())
    }
}

impl CliError {
    pub(crate) fn invalid(command: &'static str, message: impl Into<String>) -> Self {
        CliError::InvalidArgument {
            command,
            message: message.into(),
        }
    }
}
