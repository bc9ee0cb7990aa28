//! CloudFormation client wrapper for export listing and stack output lookup

use async_trait::async_trait;
use aws_sdk_cloudformation::Client as CloudFormationClient;
use log::debug;

use super::{AwsError, AwsResult, Export, StackExportSource, StackOutput};

pub struct CloudFormationSource {
    client: CloudFormationClient,
}

impl CloudFormationSource {
    pub fn new(client: CloudFormationClient) -> Self {
        Self { client }
    }

    /// Create a source from the default credential provider chain.
    ///
    /// `region` overrides the region resolved by the provider chain when set.
    pub async fn from_env(region: Option<String>) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(aws_config::Region::new(region));
        }
        let config = loader.load().await;
        Self::new(CloudFormationClient::new(&config))
    }
}

#[async_trait]
impl StackExportSource for CloudFormationSource {
    async fn list_exports(&self) -> AwsResult<Vec<Export>> {
        let mut exports = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let response = self
                .client
                .list_exports()
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| AwsError::CloudFormationError(format!("Failed to list exports: {e}")))?;

            let page: Vec<Export> = response
                .exports()
                .iter()
                .filter_map(|export| match (export.name(), export.value()) {
                    (Some(name), Some(value)) => Some(Export::new(name, value)),
                    _ => None,
                })
                .collect();
            debug!("Fetched {} exports", page.len());
            exports.extend(page);

            next_token = response.next_token().map(str::to_string);
            if next_token.is_none() {
                break;
            }
        }

        Ok(exports)
    }

    async fn describe_stack_outputs(&self, stack_name: &str) -> AwsResult<Vec<StackOutput>> {
        let response = self
            .client
            .describe_stacks()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(|e| {
                AwsError::CloudFormationError(format!(
                    "Failed to describe stack '{stack_name}': {e}"
                ))
            })?;

        let stack = response.stacks().first().ok_or_else(|| {
            AwsError::CloudFormationError(format!("Stack '{stack_name}' not found"))
        })?;

        Ok(stack
            .outputs()
            .iter()
            .filter_map(|output| match (output.output_key(), output.output_value()) {
                (Some(key), Some(value)) => Some(StackOutput::new(key, value)),
                _ => None,
            })
            .collect())
    }
}
