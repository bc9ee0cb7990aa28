//! Run configuration: the trusted principal, export naming, and manifest location.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AccessRolesError, AccessRolesResult};

pub const DEFAULT_EXPORT_PREFIX: &str = "aser";
pub const DEFAULT_OUT_DIR: &str = "dist/data";
pub const DEFAULT_OUT_FILENAME: &str = "service-outputs.json";

/// The external principal allowed to assume generated roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalInfo {
    pub principal_account_id: String,
    pub principal_role_name: String,
    pub external_id: String,
}

impl PrincipalInfo {
    /// `arn:aws:sts::<account>:assumed-role/<role>/CognitoIdentityCredentials`
    pub fn assumed_role_arn(&self) -> String {
        format!(
            "arn:aws:sts::{}:assumed-role/{}/CognitoIdentityCredentials",
            self.principal_account_id, self.principal_role_name
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRolesConfig {
    #[serde(flatten)]
    pub principal: PrincipalInfo,
    #[serde(default = "default_export_prefix")]
    pub export_prefix: String,
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    #[serde(default = "default_out_filename")]
    pub out_filename: String,
}

fn default_export_prefix() -> String {
    DEFAULT_EXPORT_PREFIX.to_string()
}

fn default_out_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUT_DIR)
}

fn default_out_filename() -> String {
    DEFAULT_OUT_FILENAME.to_string()
}

impl AccessRolesConfig {
    pub fn new(principal: PrincipalInfo) -> Self {
        Self {
            principal,
            export_prefix: default_export_prefix(),
            out_dir: default_out_dir(),
            out_filename: default_out_filename(),
        }
    }

    pub fn from_json(content: &str) -> AccessRolesResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| AccessRolesError::config(format!("invalid configuration: {e}")))
    }

    pub async fn load(path: impl AsRef<Path>) -> AccessRolesResult<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AccessRolesError::io("read configuration", path, e))?;
        Self::from_json(&content)
    }

    /// `<serviceDir>/<outDir>/<outFilename>`
    pub fn manifest_path(&self, service_dir: &Path) -> PathBuf {
        service_dir.join(&self.out_dir).join(&self.out_filename)
    }
}

/// What the deployment host knows about the current deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentContext {
    pub service: String,
    pub stage: String,
    pub region: Option<String>,
    pub service_dir: PathBuf,
}

impl DeploymentContext {
    /// Name of the deployed stack, `<service>-<stage>`.
    pub fn stack_name(&self) -> String {
        format!("{}-{}", self.service, self.stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "principalAccountId": "111122223333",
        "principalRoleName": "ConsoleAuthRole",
        "externalId": "ext-123"
    }"#;

    #[test]
    fn test_defaults_applied() {
        let config = AccessRolesConfig::from_json(MINIMAL).unwrap();
        assert_eq!(config.principal.principal_account_id, "111122223333");
        assert_eq!(config.export_prefix, "aser");
        assert_eq!(config.out_dir, PathBuf::from("dist/data"));
        assert_eq!(config.out_filename, "service-outputs.json");
    }

    #[test]
    fn test_overrides_honoured() {
        let config = AccessRolesConfig::from_json(
            r#"{
                "principalAccountId": "111122223333",
                "principalRoleName": "ConsoleAuthRole",
                "externalId": "ext-123",
                "exportPrefix": "acme",
                "outDir": "build",
                "outFilename": "roles.json"
            }"#,
        )
        .unwrap();
        assert_eq!(config.export_prefix, "acme");
        assert_eq!(
            config.manifest_path(Path::new("/srv/app")),
            PathBuf::from("/srv/app/build/roles.json")
        );
    }

    #[test]
    fn test_missing_required_field() {
        let result = AccessRolesConfig::from_json(r#"{"principalAccountId": "111122223333"}"#);
        match result {
            Err(AccessRolesError::Config(message)) => assert!(message.contains("principalRoleName")),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_assumed_role_arn() {
        let config = AccessRolesConfig::from_json(MINIMAL).unwrap();
        assert_eq!(
            config.principal.assumed_role_arn(),
            "arn:aws:sts::111122223333:assumed-role/ConsoleAuthRole/CognitoIdentityCredentials"
        );
    }

    #[test]
    fn test_stack_name() {
        let context = DeploymentContext {
            service: "orders".to_string(),
            stage: "prod".to_string(),
            region: None,
            service_dir: PathBuf::from("."),
        };
        assert_eq!(context.stack_name(), "orders-prod");
    }
}
