//! Error types for gitcommit

use thiserror::Error;

/// Result type alias for gitcommit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failure to expand a branch-name template
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubstitutionError {
    /// A placeholder names a variable that is not in the mapping
    #[error("undefined variable '{0}' in branch template")]
    UndefinedVariable(String),

    /// A `$` that does not start a valid placeholder
    #[error("invalid placeholder in branch template at byte {0}")]
    InvalidPlaceholder(usize),
}

/// Error type for gitcommit operations
#[derive(Error, Debug)]
pub enum Error {
    /// Branch template could not be expanded
    #[error("Substitution error: {0}")]
    Substitution(#[from] SubstitutionError),

    /// A git command exited with an unexpected status
    #[error("{context}: {stderr}")]
    Tool {
        /// Which step failed, e.g. "Failed to create branch"
        context: String,
        /// The full command line that was attempted
        command: String,
        /// Exit status reported by the process (-1 if killed by a signal)
        status: i32,
        /// Captured standard error
        stderr: String,
    },

    /// The git executable could not be started
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// The configured path is not a git working tree
    #[error("Not a git working tree: {0}")]
    NotARepository(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Exit status of the failing tool invocation, if this is a tool error
    pub fn exit_status(&self) -> Option<i32> {
        match self {
            Error::Tool { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Command line of the failing tool invocation, if this is a tool error
    pub fn command(&self) -> Option<&str> {
        match self {
            Error::Tool { command, .. } => Some(command),
            _ => None,
        }
    }
}
