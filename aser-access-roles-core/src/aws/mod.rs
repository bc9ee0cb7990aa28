//! AWS integration: the export/output source boundary and its CloudFormation and static implementations.

pub(crate) mod cloudformation;
pub(crate) mod static_source;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use cloudformation::CloudFormationSource;
pub use static_source::StaticSource;

#[derive(Error, Debug)]
pub enum AwsError {
    #[error("AWS configuration error: {0}")]
    ConfigError(String),
    #[error("CloudFormation error: {0}")]
    CloudFormationError(String),
}

pub type AwsResult<T> = Result<T, AwsError>;

/// A named value published by a stack for cross-stack reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Export {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "Value")]
    pub value: String,
}

impl Export {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A resolved output of a deployed stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackOutput {
    #[serde(alias = "OutputKey")]
    pub key: String,
    #[serde(alias = "OutputValue")]
    pub value: String,
}

impl StackOutput {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Provider calls consumed by the access-role phases.
#[async_trait]
pub trait StackExportSource: Send + Sync {
    /// Every export visible in the account and region, across all pages.
    async fn list_exports(&self) -> AwsResult<Vec<Export>>;

    /// The outputs of the named deployed stack.
    async fn describe_stack_outputs(&self, stack_name: &str) -> AwsResult<Vec<StackOutput>>;
}
