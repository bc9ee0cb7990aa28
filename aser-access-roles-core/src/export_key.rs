//! Export-key naming convention.
//!
//! Exports published by service stacks are named
//! `<prefix>:<stackName>:<resourceName>:<resourceType>:<field>`. Pending resources are
//! keyed by the middle three fields, `<stackName>:<resourceName>:<resourceType>`.

use std::fmt;

use crate::error::{AccessRolesError, AccessRolesResult};

pub const KEY_DELIMITER: char = ':';
pub const DEFAULT_LOGICAL_NAME_SUFFIX: &str = "AccessRole";

/// The field an export carries for its resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportField {
    Arn,
    Description,
    Other(String),
}

impl From<&str> for ExportField {
    fn from(value: &str) -> Self {
        match value {
            "arn" => Self::Arn,
            "description" => Self::Description,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Positional decoding of an export name.
///
/// Missing positions are `None`; extra positions are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportName {
    pub prefix: String,
    pub stack_name: Option<String>,
    pub resource_name: Option<String>,
    pub resource_type: Option<String>,
    pub field: Option<ExportField>,
}

impl ExportName {
    /// The pending key for this export, if all three key positions are present.
    pub fn pending_key(&self) -> Option<PendingKey> {
        Some(PendingKey::new(
            self.stack_name.as_deref()?,
            self.resource_name.as_deref()?,
            self.resource_type.as_deref()?,
        ))
    }
}

pub fn decode_export_name(name: &str) -> ExportName {
    let mut parts = name.split(KEY_DELIMITER).map(str::to_string);
    ExportName {
        prefix: parts.next().unwrap_or_default(),
        stack_name: parts.next(),
        resource_name: parts.next(),
        resource_type: parts.next(),
        field: parts.next().map(|f| ExportField::from(f.as_str())),
    }
}

/// `<stackName>:<resourceName>:<resourceType>`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PendingKey {
    pub stack_name: String,
    pub resource_name: String,
    pub resource_type: String,
}

impl PendingKey {
    pub fn new(
        stack_name: impl Into<String>,
        resource_name: impl Into<String>,
        resource_type: impl Into<String>,
    ) -> Self {
        Self {
            stack_name: stack_name.into(),
            resource_name: resource_name.into(),
            resource_type: resource_type.into(),
        }
    }

    pub fn logical_name(&self) -> String {
        build_logical_name(&self.stack_name, &self.resource_name, &self.resource_type)
    }
}

impl fmt::Display for PendingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_pending_key(
            &self.stack_name,
            &self.resource_name,
            &self.resource_type,
        ))
    }
}

pub fn encode_pending_key(stack_name: &str, resource_name: &str, resource_type: &str) -> String {
    format!("{stack_name}{KEY_DELIMITER}{resource_name}{KEY_DELIMITER}{resource_type}")
}

pub fn decode_pending_key(key: &str) -> AccessRolesResult<PendingKey> {
    let parts: Vec<&str> = key.split(KEY_DELIMITER).collect();
    match parts.as_slice() {
        [stack_name, resource_name, resource_type] => {
            Ok(PendingKey::new(*stack_name, *resource_name, *resource_type))
        }
        _ => Err(AccessRolesError::malformed_key(key)),
    }
}

/// Logical name with the default `AccessRole` suffix.
pub fn build_logical_name(stack_name: &str, resource_name: &str, resource_type: &str) -> String {
    build_logical_name_with_suffix(
        stack_name,
        resource_name,
        resource_type,
        DEFAULT_LOGICAL_NAME_SUFFIX,
    )
}

/// Each `-` segment of the stack name is PascalCased and joined, followed by the
/// PascalCased resource name and type, then `suffix`.
pub fn build_logical_name_with_suffix(
    stack_name: &str,
    resource_name: &str,
    resource_type: &str,
    suffix: &str,
) -> String {
    let stack: String = stack_name.split('-').map(pascal_case).collect();
    format!(
        "{stack}{}{}{suffix}",
        pascal_case(resource_name),
        pascal_case(resource_type)
    )
}

/// Uppercases the first character only.
fn pascal_case(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
