//! Generation phase: synthesize access roles and merge them into the template

use log::info;

use crate::error::AccessRolesResult;
use crate::template::{DeploymentTemplate, GeneratedTemplate};

impl super::service::AccessRolesService {
    /// Generate one access role and output per pending resource and record each
    /// role's output key for the export phase.
    pub fn generate(&mut self) -> AccessRolesResult<GeneratedTemplate> {
        let generated = GeneratedTemplate::generate(&mut self.pending, &self.config.principal)?;
        info!("Generated {} access roles", generated.resources.len());
        Ok(generated)
    }

    /// Generate access roles and add them to `template`.
    pub fn generate_into(
        &mut self,
        template: &mut DeploymentTemplate,
    ) -> AccessRolesResult<GeneratedTemplate> {
        let generated = self.generate()?;
        template.merge(&generated)?;
        Ok(generated)
    }
}
