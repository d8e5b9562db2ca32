//! Error types for the group-command library.

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum GroupCmdError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unsupported program '{name}'")]
    UnsupportedProgram { name: String },

    #[error("Unsupported test type '{test_type}' for {program} (valid: {valid})")]
    UnsupportedTestType {
        program: String,
        test_type: String,
        valid: String,
    },

    #[error("Pairing mismatch: expected {expected} {what}, got {actual}")]
    PairingMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    #[error("Subject ID error: {0}")]
    SubjectId(String),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GroupCmdError {
    /// Shorthand for a configuration error.
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        GroupCmdError::Configuration(msg.into())
    }
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, GroupCmdError>;
