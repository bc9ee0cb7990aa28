//! Access Roles Service Layer
//!
//! The service owns the pending resources for a single run and exposes the three
//! deployment phases, which must be called in order:
//! [`discover`](AccessRolesService::discover), [`generate`](AccessRolesService::generate)
//! (before the template is finalized), and [`export`](AccessRolesService::export)
//! (after the stack is deployed).

use crate::aws::{CloudFormationSource, StackExportSource};
use crate::collector::PendingResources;
use crate::config::{AccessRolesConfig, DeploymentContext};

/// Main service struct that holds the provider source and run state
pub struct AccessRolesService {
    pub(crate) source: Box<dyn StackExportSource>,
    pub(crate) config: AccessRolesConfig,
    pub(crate) context: DeploymentContext,
    pub(crate) pending: PendingResources,
}

impl AccessRolesService {
    pub fn new(
        config: AccessRolesConfig,
        context: DeploymentContext,
        source: Box<dyn StackExportSource>,
    ) -> Self {
        Self {
            source,
            config,
            context,
            pending: PendingResources::new(),
        }
    }

    /// Create a service backed by CloudFormation, using the default credential
    /// provider chain and the context's region override.
    pub async fn with_cloudformation(config: AccessRolesConfig, context: DeploymentContext) -> Self {
        let source = CloudFormationSource::from_env(context.region.clone()).await;
        Self::new(config, context, Box::new(source))
    }

    pub fn pending(&self) -> &PendingResources {
        &self.pending
    }

    pub fn config(&self) -> &AccessRolesConfig {
        &self.config
    }

    pub fn context(&self) -> &DeploymentContext {
        &self.context
    }

    // discover() is in discover.rs
    // generate() and generate_into() are in generate.rs
    // export() is in export.rs
}
