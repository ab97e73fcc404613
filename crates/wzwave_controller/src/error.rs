use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Controller already started")]
    AlreadyStarted,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Other(String),
}

impl ControllerError {
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
