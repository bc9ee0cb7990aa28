//! Commands module - service layer for the discover, generate, and export phases

mod discover;
mod export;
mod generate;
pub(crate) mod service;

pub use export::ExportSummary;
pub use service::AccessRolesService;

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::{Path, PathBuf};

    use super::AccessRolesService;
    use crate::aws::StaticSource;
    use crate::config::{AccessRolesConfig, DeploymentContext, PrincipalInfo};

    pub(crate) fn service_in(source: StaticSource, service_dir: &Path) -> AccessRolesService {
        let config = AccessRolesConfig::new(PrincipalInfo {
            principal_account_id: "111122223333".to_string(),
            principal_role_name: "ConsoleAuthRole".to_string(),
            external_id: "ext-123".to_string(),
        });
        let context = DeploymentContext {
            service: "orders".to_string(),
            stage: "dev".to_string(),
            region: None,
            service_dir: service_dir.to_path_buf(),
        };
        AccessRolesService::new(config, context, Box::new(source))
    }

    pub(crate) fn service_with(source: StaticSource) -> AccessRolesService {
        service_in(source, &PathBuf::from("."))
    }
}
