//! Post-deploy resolution of generated role ARNs into the service manifest.

use std::collections::BTreeMap;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::aws::StackOutput;
use crate::collector::PendingResources;
use crate::error::{AccessRolesError, AccessRolesResult};
use crate::export_key::decode_pending_key;

/// Manifest entry for one exported resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceOutput {
    pub arn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// ARN of the deployed access role.
    pub role: String,
}

/// `{ stackName: { resourceName: { arn, description, role } } }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    pub stacks: BTreeMap<String, BTreeMap<String, ResourceOutput>>,
}

impl Manifest {
    pub fn get(&self, stack_name: &str, resource_name: &str) -> Option<&ResourceOutput> {
        self.stacks.get(stack_name)?.get(resource_name)
    }

    /// Number of resource entries across all stacks.
    pub fn len(&self) -> usize {
        self.stacks.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Join every pending resource with the deployed output holding its role ARN.
///
/// Fails on the first pending resource whose output is absent, or that has no
/// role output key because generation has not run.
pub fn resolve_manifest(
    outputs: &[StackOutput],
    pending: &PendingResources,
) -> AccessRolesResult<Manifest> {
    let mut manifest = Manifest::default();

    for (key, resource) in pending {
        let pending_key = decode_pending_key(key)?;
        let output_key = resource
            .role_output_key
            .clone()
            .ok_or_else(|| AccessRolesError::not_generated(key.as_str()))?;

        let role = outputs
            .iter()
            .find(|output| output.key == output_key)
            .ok_or_else(|| AccessRolesError::missing_output(output_key.as_str()))?;
        let arn = resource
            .arn
            .clone()
            .ok_or_else(|| AccessRolesError::missing_arn(key.as_str()))?;

        debug!("Resolved {output_key} to {}", role.value);
        manifest
            .stacks
            .entry(pending_key.stack_name)
            .or_default()
            .insert(
                pending_key.resource_name,
                ResourceOutput {
                    arn,
                    description: resource.description.clone(),
                    role: role.value.clone(),
                },
            );
    }

    Ok(manifest)
}

/// Write the manifest as pretty-printed JSON, replacing any previous file.
pub async fn write_manifest(manifest: &Manifest, path: impl AsRef<Path>) -> AccessRolesResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| AccessRolesError::io("create directory", parent, e))?;
    }

    let json = serde_json::to_string_pretty(manifest)?;
    fs::write(path, json)
        .await
        .map_err(|e| AccessRolesError::io("write", path, e))?;

    info!("Service outputs written to {}", path.display());
    Ok(())
}
