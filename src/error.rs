use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, NavError>;

/// Structural mismatch between the declarative input and the tree schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct DecodeError {
    pub message: String,
}

impl DecodeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(error.to_string())
    }
}

#[derive(Error, Debug)]
pub enum NavError {
    #[error("{}: invalid navigation tree: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    /// The tool ran and rejected its input; `message` is the tool's stderr.
    #[error("{tool} failed: {message}")]
    ExternalTool { tool: String, message: String },

    #[error("{tool}: command not found")]
    NotFound { tool: String },

    #[error("prompt cancelled")]
    PromptCancelled,

    /// A generated artifact did not parse; nothing was written for its source file.
    #[error("{}: generated source is not valid: {message}", path.display())]
    Syntax { path: PathBuf, message: String },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl NavError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        NavError::Io {
            path: path.into(),
            source,
        }
    }

    /// Only a cancelled prompt is recovered from; everything else fails the source file.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, NavError::PromptCancelled)
    }
}
