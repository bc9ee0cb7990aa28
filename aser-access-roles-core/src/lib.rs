//! This crate provides the core logic for ASER access roles:
//! - Export-key encoding/decoding for the `<prefix>:<stack>:<resource>:<type>:<field>` convention
//! - IAM policy-statement synthesis per resource type
//! - Access-role and output generation, merged into a CloudFormation template
//! - Post-deploy resolution of role ARNs into a JSON manifest
//!

pub mod aws;
pub mod collector;
pub mod commands;
pub mod config;
mod error;
pub mod export_key;
pub mod manifest;
pub mod policy;
pub mod template;

// Re-exports for a small, focused public API
pub use aws::{AwsError, CloudFormationSource, Export, StackExportSource, StackOutput, StaticSource};
pub use collector::{collect_pending_resources, PendingResource, PendingResources};
pub use commands::{AccessRolesService, ExportSummary};
pub use config::{AccessRolesConfig, DeploymentContext, PrincipalInfo};
pub use error::{AccessRolesError, AccessRolesResult};
pub use export_key::{
    build_logical_name, decode_export_name, decode_pending_key, encode_pending_key, ExportField,
    ExportName, PendingKey,
};
pub use manifest::{resolve_manifest, write_manifest, Manifest, ResourceOutput};
pub use policy::{
    generate_policy_statements, generate_policy_statements_with_logs, ActionType, PolicyDocument,
    ResourceRef, ResourceSpec, ResourceType, Statement,
};
pub use template::{
    build_role_output, build_role_resource, DeploymentTemplate, GeneratedOutput, GeneratedRole,
    GeneratedTemplate,
};
