//! Discovery phase: collect matching exports into pending resources

use log::{error, info};

use crate::collector::collect_pending_resources;
use crate::error::AccessRolesResult;

impl super::service::AccessRolesService {
    /// List all exports and replace the pending resources with those matching the
    /// configured prefix. Returns the number of pending resources.
    pub async fn discover(&mut self) -> AccessRolesResult<usize> {
        let exports = self.source.list_exports().await.map_err(|e| {
            error!("{e}");
            e
        })?;

        self.pending = collect_pending_resources(&exports, &self.config.export_prefix);
        info!(
            "Discovered {} exported resources from {} exports with prefix '{}'",
            self.pending.len(),
            exports.len(),
            self.config.export_prefix
        );
        Ok(self.pending.len())
    }
}

#[cfg(test)]
mod tests {
    use crate::aws::{Export, StaticSource};
    use crate::commands::test_support::service_with;

    #[tokio::test]
    async fn test_discover_collects_matching_exports() {
        let source = StaticSource::new().with_exports(vec![
            Export::new("aser:orders:createOrder:function:arn", "fn-arn"),
            Export::new("other:orders:createOrder:function:arn", "ignored"),
        ]);
        let mut service = service_with(source);

        assert_eq!(service.discover().await.unwrap(), 1);
        assert!(service.pending().get("orders:createOrder:function").is_some());
    }

    #[tokio::test]
    async fn test_discover_propagates_source_failure() {
        let mut service = service_with(StaticSource::new());
        assert!(service.discover().await.is_err());
        assert!(service.pending().is_empty());
    }
}
