//! IAM policy-statement synthesis, dispatched on the exported resource type.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const POLICY_VERSION: &str = "2012-10-17";

const EXECUTION_ARN_TEMPLATE: &str =
    "arn:aws:states:${AWS::Region}:${AWS::AccountId}:execution:<name>:*";
const EXPRESS_EXECUTION_ARN_TEMPLATE: &str =
    "arn:aws:states:${AWS::Region}:${AWS::AccountId}:express:<name>:*:*";

/// Resource types with a known set of access grants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Function,
    StateMachine,
    /// Any other type; no statements are generated for it.
    Other(String),
}

impl From<&str> for ResourceType {
    fn from(value: &str) -> Self {
        match value {
            "function" => Self::Function,
            "stateMachine" => Self::StateMachine,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function => f.write_str("function"),
            Self::StateMachine => f.write_str("stateMachine"),
            Self::Other(other) => f.write_str(other),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum ActionType {
    Single(String),
    Multiple(Vec<String>),
}

/// A literal ARN or a CloudFormation `Fn::Sub` expression.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum ResourceRef {
    Arn(String),
    Sub {
        #[serde(rename = "Fn::Sub")]
        template: String,
    },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum ResourceSpec {
    Single(ResourceRef),
    Multiple(Vec<ResourceRef>),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    pub effect: String,
    pub action: ActionType,
    pub resource: ResourceSpec,
}

impl Statement {
    pub fn allow(action: ActionType, resource: ResourceSpec) -> Self {
        Self {
            effect: "Allow".to_string(),
            action,
            resource,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<Statement>,
}

impl PolicyDocument {
    pub fn new(statement: Vec<Statement>) -> Self {
        Self {
            version: POLICY_VERSION.to_string(),
            statement,
        }
    }
}

/// Statements granting the external principal access to the resource at `arn`.
///
/// Unknown resource types yield no statements.
pub fn generate_policy_statements(arn: &str, resource_type: &ResourceType) -> Vec<Statement> {
    generate_policy_statements_with_logs(arn, resource_type, None)
}

/// Like [`generate_policy_statements`], additionally granting read access to a
/// function's log group when `log_group_arn` is given.
pub fn generate_policy_statements_with_logs(
    arn: &str,
    resource_type: &ResourceType,
    log_group_arn: Option<&str>,
) -> Vec<Statement> {
    match resource_type {
        ResourceType::Function => function_statements(arn, log_group_arn),
        ResourceType::StateMachine => state_machine_statements(arn),
        ResourceType::Other(_) => Vec::new(),
    }
}

fn function_statements(arn: &str, log_group_arn: Option<&str>) -> Vec<Statement> {
    let mut statements = vec![Statement::allow(
        ActionType::Single("lambda:InvokeFunction".to_string()),
        ResourceSpec::Single(ResourceRef::Arn(arn.to_string())),
    )];

    if let Some(log_group_arn) = log_group_arn {
        statements.push(Statement::allow(
            ActionType::Multiple(vec![
                "logs:DescribeLogStreams".to_string(),
                "logs:GetLogEvents".to_string(),
                "logs:FilterLogEvents".to_string(),
            ]),
            ResourceSpec::Single(ResourceRef::Arn(log_group_arn.to_string())),
        ));
    }

    statements
}

fn state_machine_statements(arn: &str) -> Vec<Statement> {
    let name = state_machine_name(arn);
    let execution_arn = || ResourceRef::Sub {
        template: EXECUTION_ARN_TEMPLATE.replace("<name>", name),
    };

    vec![
        Statement::allow(
            ActionType::Multiple(vec![
                "states:ListExecutions".to_string(),
                "states:StartExecution".to_string(),
            ]),
            ResourceSpec::Single(ResourceRef::Arn(arn.to_string())),
        ),
        Statement::allow(
            ActionType::Single("states:DescribeExecution".to_string()),
            ResourceSpec::Multiple(vec![
                execution_arn(),
                ResourceRef::Sub {
                    template: EXPRESS_EXECUTION_ARN_TEMPLATE.replace("<name>", name),
                },
            ]),
        ),
        Statement::allow(
            ActionType::Single("states:StopExecution".to_string()),
            ResourceSpec::Single(execution_arn()),
        ),
    ]
}

/// Last colon-separated segment of a state machine ARN.
fn state_machine_name(arn: &str) -> &str {
    arn.rsplit(':').next().unwrap_or(arn)
}
