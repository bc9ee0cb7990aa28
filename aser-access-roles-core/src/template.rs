//! Access-role and output generation, and merging into the deployment template.

use std::collections::BTreeMap;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::collector::PendingResources;
use crate::config::PrincipalInfo;
use crate::error::{AccessRolesError, AccessRolesResult};
use crate::export_key::decode_pending_key;
use crate::policy::{generate_policy_statements, PolicyDocument, ResourceType, Statement, POLICY_VERSION};

pub const INLINE_POLICY_NAME: &str = "EmbeddedInlinePolicy";
const ROLE_RESOURCE_TYPE: &str = "AWS::IAM::Role";

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct TrustPrincipal {
    #[serde(rename = "AWS")]
    pub aws: String,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct TrustStatement {
    pub effect: String,
    pub principal: TrustPrincipal,
    pub action: String,
    pub condition: BTreeMap<String, BTreeMap<String, String>>,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct TrustPolicy {
    pub version: String,
    pub statement: Vec<TrustStatement>,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct InlinePolicy {
    pub policy_name: String,
    pub policy_document: PolicyDocument,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct RoleProperties {
    pub role_name: String,
    pub description: String,
    pub assume_role_policy_document: TrustPolicy,
    pub policies: Vec<InlinePolicy>,
}

/// An `AWS::IAM::Role` resource declaration.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct GeneratedRole {
    #[serde(rename = "Type")]
    pub resource_type: String,
    pub properties: RoleProperties,
}

/// A template output exposing a generated role's ARN.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct GeneratedOutput {
    /// `<logicalName>Arn`
    #[serde(skip)]
    pub key: String,
    pub description: String,
    pub value: Value,
}

pub fn build_role_resource(
    stack_name: &str,
    resource_name: &str,
    principal: &PrincipalInfo,
    statements: Vec<Statement>,
) -> GeneratedRole {
    let condition = BTreeMap::from([(
        "StringEquals".to_string(),
        BTreeMap::from([("sts:ExternalId".to_string(), principal.external_id.clone())]),
    )]);

    GeneratedRole {
        resource_type: ROLE_RESOURCE_TYPE.to_string(),
        properties: RoleProperties {
            role_name: format!("{stack_name}-{resource_name}"),
            description: format!("Access role to {resource_name} of {stack_name}"),
            assume_role_policy_document: TrustPolicy {
                version: POLICY_VERSION.to_string(),
                statement: vec![TrustStatement {
                    effect: "Allow".to_string(),
                    principal: TrustPrincipal {
                        aws: principal.assumed_role_arn(),
                    },
                    action: "sts:AssumeRole".to_string(),
                    condition,
                }],
            },
            policies: vec![InlinePolicy {
                policy_name: INLINE_POLICY_NAME.to_string(),
                policy_document: PolicyDocument::new(statements),
            }],
        },
    }
}

pub fn build_role_output(stack_name: &str, resource_name: &str, logical_name: &str) -> GeneratedOutput {
    GeneratedOutput {
        key: format!("{logical_name}Arn"),
        description: format!("Arn of {stack_name}-{resource_name} access role"),
        value: serde_json::json!({ "Fn::GetAtt": [logical_name, "Arn"] }),
    }
}

/// Roles and outputs generated for one run, keyed by logical name and output key.
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct GeneratedTemplate {
    pub resources: BTreeMap<String, GeneratedRole>,
    pub outputs: BTreeMap<String, GeneratedOutput>,
}

impl GeneratedTemplate {
    /// Generate one role and one output per pending resource, recording each output
    /// key on its pending resource.
    ///
    /// Fails if two pending resources collapse to the same logical name.
    pub fn generate(
        pending: &mut PendingResources,
        principal: &PrincipalInfo,
    ) -> AccessRolesResult<Self> {
        let mut generated = Self::default();
        let mut owners: BTreeMap<String, String> = BTreeMap::new();

        for (key, resource) in pending.iter_mut() {
            let pending_key = decode_pending_key(key)?;
            let arn = resource
                .arn
                .as_deref()
                .ok_or_else(|| AccessRolesError::missing_arn(key.as_str()))?;

            let resource_type = ResourceType::from(pending_key.resource_type.as_str());
            let statements = generate_policy_statements(arn, &resource_type);
            if statements.is_empty() {
                warn!("No access statements for resource type '{resource_type}' ({key})");
            }

            let logical_name = pending_key.logical_name();
            if let Some(first) = owners.insert(logical_name.clone(), key.clone()) {
                return Err(AccessRolesError::duplicate_logical_name(
                    logical_name,
                    first,
                    key.as_str(),
                ));
            }
            let role = build_role_resource(
                &pending_key.stack_name,
                &pending_key.resource_name,
                principal,
                statements,
            );
            let output = build_role_output(
                &pending_key.stack_name,
                &pending_key.resource_name,
                &logical_name,
            );
            debug!("Generated {logical_name} for {key}");

            resource.role_output_key = Some(output.key.clone());
            generated.outputs.insert(output.key.clone(), output);
            generated.resources.insert(logical_name, role);
        }

        Ok(generated)
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// A CloudFormation template. Sections other than `Resources` and `Outputs` pass
/// through unchanged.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct DeploymentTemplate {
    #[serde(flatten)]
    pub rest: Map<String, Value>,
    #[serde(rename = "Resources", default)]
    pub resources: Map<String, Value>,
    #[serde(rename = "Outputs", default, skip_serializing_if = "Map::is_empty")]
    pub outputs: Map<String, Value>,
}

impl DeploymentTemplate {
    /// Add the generated resources and outputs by key union. A generated entry replaces
    /// an existing entry with the same key.
    pub fn merge(&mut self, generated: &GeneratedTemplate) -> AccessRolesResult<()> {
        for (logical_name, role) in &generated.resources {
            merge_entry(&mut self.resources, "resource", logical_name, serde_json::to_value(role)?);
        }
        for (key, output) in &generated.outputs {
            merge_entry(&mut self.outputs, "output", key, serde_json::to_value(output)?);
        }
        info!(
            "Merged {} access roles into deployment template",
            generated.resources.len()
        );
        Ok(())
    }
}

fn merge_entry(section: &mut Map<String, Value>, kind: &str, key: &str, value: Value) {
    if section.insert(key.to_string(), value).is_some() {
        warn!("Generated {kind} '{key}' replaced an existing template entry");
    }
}
