//! Collects matching exports into pending resources.

use std::collections::btree_map::{self, BTreeMap};

use log::{debug, trace};
use serde::Serialize;

use crate::aws::Export;
use crate::export_key::{decode_export_name, ExportField};

/// A resource discovered from exports, awaiting its generated access role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingResource {
    pub arn: Option<String>,
    pub description: Option<String>,
    /// Key of the generated output exposing the role ARN, set during generation.
    pub role_output_key: Option<String>,
}

/// Pending resources keyed by `<stackName>:<resourceName>:<resourceType>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PendingResources {
    resources: BTreeMap<String, PendingResource>,
}

impl PendingResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&PendingResource> {
        self.resources.get(key)
    }

    pub fn entry_mut(&mut self, key: String) -> &mut PendingResource {
        self.resources.entry(key).or_default()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, PendingResource> {
        self.resources.iter()
    }

    pub fn iter_mut(&mut self) -> btree_map::IterMut<'_, String, PendingResource> {
        self.resources.iter_mut()
    }
}

impl<'a> IntoIterator for &'a PendingResources {
    type Item = (&'a String, &'a PendingResource);
    type IntoIter = btree_map::Iter<'a, String, PendingResource>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Group exports whose prefix matches `prefix` by pending key.
///
/// Exports with another prefix, an incomplete name, or a field other than `arn` or
/// `description` are ignored.
pub fn collect_pending_resources(exports: &[Export], prefix: &str) -> PendingResources {
    let mut pending = PendingResources::new();

    for export in exports {
        let decoded = decode_export_name(&export.name);
        if decoded.prefix != prefix {
            trace!("Ignoring export '{}': prefix mismatch", export.name);
            continue;
        }
        let Some(key) = decoded.pending_key() else {
            debug!("Ignoring export '{}': incomplete name", export.name);
            continue;
        };

        match decoded.field {
            Some(ExportField::Arn) => {
                pending.entry_mut(key.to_string()).arn = Some(export.value.clone());
            }
            Some(ExportField::Description) => {
                pending.entry_mut(key.to_string()).description = Some(export.value.clone());
            }
            _ => debug!("Ignoring export '{}': unsupported field", export.name),
        }
    }

    pending
}
