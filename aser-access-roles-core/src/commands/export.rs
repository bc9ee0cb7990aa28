//! Export phase: resolve deployed role ARNs and write the manifest

use std::path::PathBuf;

use log::{error, info};

use crate::error::AccessRolesResult;
use crate::manifest::{resolve_manifest, write_manifest, Manifest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub manifest: Manifest,
}

impl super::service::AccessRolesService {
    /// Resolve every pending resource's role ARN from the deployed stack outputs and
    /// write the manifest. Nothing is written unless every role resolves.
    pub async fn export(&self) -> AccessRolesResult<ExportSummary> {
        let stack_name = self.context.stack_name();
        let outputs = self
            .source
            .describe_stack_outputs(&stack_name)
            .await
            .map_err(|e| {
                error!("{e}");
                e
            })?;

        let manifest = resolve_manifest(&outputs, &self.pending).map_err(|e| {
            error!("{e}");
            e
        })?;

        let path = self.config.manifest_path(&self.context.service_dir);
        write_manifest(&manifest, &path).await?;
        info!(
            "Exported {} access roles from stack '{}'",
            manifest.len(),
            stack_name
        );

        Ok(ExportSummary { path, manifest })
    }
}
