use std::io;

use thiserror::Error;
use wzwave_controller::ControllerError;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("Command '{0}' is already registered")]
    DuplicateCommand(String),

    #[error("Controller error: {0}")]
    Controller(#[from] ControllerError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("{0}")]
    Other(String),
}

impl ConsoleError {
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

/// Failure raised by a command handler.
pub type CommandError = ConsoleError;

pub type Result<T> = std::result::Result<T, ConsoleError>;
