//! CLI error types
//!
//! All CLI errors are fatal: the command prints a JSON error object and the
//! process exits non-zero.

use std::io;

use thiserror::Error;

use crate::schema::SchemaError;

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

/// CLI errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file missing, unreadable or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Schema registry failure
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// stdout could not be written
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Response could not be encoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Stable error code printed in the JSON error object
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(_) => "YT_CLI_CONFIG_ERROR",
            CliError::Schema(e) => e.code().code(),
            CliError::Io(_) | CliError::Json(_) => "YT_CLI_IO_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_keeps_its_code() {
        let err = CliError::from(SchemaError::unknown_module("ENTITY-STATE-MIB"));
        assert_eq!(err.code(), "YT_UNKNOWN_MODULE");
        assert!(err.to_string().contains("ENTITY-STATE-MIB"));
    }

    #[test]
    fn test_config_error_code() {
        let err = CliError::Config("schema_dir must not be empty".into());
        assert_eq!(err.code(), "YT_CLI_CONFIG_ERROR");
        assert_eq!(
            err.to_string(),
            "Configuration error: schema_dir must not be empty"
        );
    }
}
