//! File-backed export and output source for offline generation.
//!
//! Exports are read either as a bare array of `{ "name", "value" }` objects or as the
//! `{ "Exports": [...] }` document printed by `aws cloudformation list-exports`. Outputs
//! are read as an array of `{ "OutputKey", "OutputValue" }` objects or as a flat
//! `{ "<key>": "<value>" }` object.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::fs;

use super::{AwsError, AwsResult, Export, StackExportSource, StackOutput};
use crate::error::{AccessRolesError, AccessRolesResult};

#[derive(Deserialize)]
#[serde(untagged)]
enum ExportsFile {
    List(Vec<Export>),
    Listing {
        #[serde(rename = "Exports")]
        exports: Vec<Export>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OutputsFile {
    List(Vec<StackOutput>),
    Map(BTreeMap<String, String>),
}

/// In-memory source. A call whose data was not supplied fails.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    exports: Option<Vec<Export>>,
    outputs: Option<Vec<StackOutput>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exports(mut self, exports: Vec<Export>) -> Self {
        self.exports = Some(exports);
        self
    }

    pub fn with_outputs(mut self, outputs: Vec<StackOutput>) -> Self {
        self.outputs = Some(outputs);
        self
    }

    pub async fn load_exports(path: impl AsRef<Path>) -> AccessRolesResult<Vec<Export>> {
        let content = read(path.as_ref()).await?;
        let exports = match serde_json::from_str::<ExportsFile>(&content)? {
            ExportsFile::List(exports) | ExportsFile::Listing { exports } => exports,
        };
        Ok(exports)
    }

    pub async fn load_outputs(path: impl AsRef<Path>) -> AccessRolesResult<Vec<StackOutput>> {
        let content = read(path.as_ref()).await?;
        let outputs = match serde_json::from_str::<OutputsFile>(&content)? {
            OutputsFile::List(outputs) => outputs,
            OutputsFile::Map(map) => map
                .into_iter()
                .map(|(key, value)| StackOutput::new(key, value))
                .collect(),
        };
        Ok(outputs)
    }
}

async fn read(path: &Path) -> AccessRolesResult<String> {
    fs::read_to_string(path)
        .await
        .map_err(|e| AccessRolesError::io("read", path, e))
}

#[async_trait]
impl StackExportSource for StaticSource {
    async fn list_exports(&self) -> AwsResult<Vec<Export>> {
        self.exports
            .clone()
            .ok_or_else(|| AwsError::ConfigError("no exports were supplied".to_string()))
    }

    async fn describe_stack_outputs(&self, stack_name: &str) -> AwsResult<Vec<StackOutput>> {
        self.outputs.clone().ok_or_else(|| {
            AwsError::ConfigError(format!("no outputs were supplied for stack '{stack_name}'"))
        })
    }
}
