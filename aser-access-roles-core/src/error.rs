//! Error types for access-role generation and manifest export.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::aws::AwsError;

/// Errors that abort a run. There is no partial-success mode.
#[derive(Debug, Error)]
pub enum AccessRolesError {
    /// A pending key did not split into exactly three fields.
    #[error("Malformed pending resource key '{key}': expected <stackName>:<resourceName>:<resourceType>")]
    MalformedKey { key: String },

    /// A pending resource was exported without an `arn` field.
    #[error("Pending resource '{key}' has no exported arn")]
    MissingArn { key: String },

    /// Two pending resources map to the same logical name.
    #[error("Pending resources '{first}' and '{second}' both generate logical name '{logical_name}'")]
    DuplicateLogicalName {
        logical_name: String,
        first: String,
        second: String,
    },

    /// A pending resource reached export without a recorded role output key.
    #[error("Pending resource '{key}' has no role output key; generate access roles before exporting")]
    NotGenerated { key: String },

    /// A generated role's output was not found among the deployed stack outputs.
    #[error("Output '{key}' not found in deployed stack outputs")]
    MissingOutput { key: String },

    /// A remote call to the provider failed.
    #[error(transparent)]
    Aws(#[from] AwsError),

    /// Invalid or incomplete configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem operation failed.
    #[error("Failed to {operation} '{}': {source}", .path.display())]
    Io {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AccessRolesError {
    pub fn malformed_key(key: impl Into<String>) -> Self {
        Self::MalformedKey { key: key.into() }
    }

    pub fn missing_arn(key: impl Into<String>) -> Self {
        Self::MissingArn { key: key.into() }
    }

    pub fn duplicate_logical_name(
        logical_name: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self::DuplicateLogicalName {
            logical_name: logical_name.into(),
            first: first.into(),
            second: second.into(),
        }
    }

    pub fn not_generated(key: impl Into<String>) -> Self {
        Self::NotGenerated { key: key.into() }
    }

    pub fn missing_output(key: impl Into<String>) -> Self {
        Self::MissingOutput { key: key.into() }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn io(operation: impl Into<String>, path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

pub type AccessRolesResult<T> = Result<T, AccessRolesError>;
