//! Attaches the container chain to permission lookups.

use async_trait::async_trait;
use std::sync::Arc;

use super::reader::{PermissionReader, PermissionReaderInput, PermissionReaderOutput};
use crate::ancestry::container_chain;
use crate::error::Result;
use crate::identifier::IdentifierStrategy;
use crate::store::ResourceSet;

/// Decorates a source with knowledge of containment.
///
/// When the target does not exist yet, the output of the inner source is
/// extended with every container above the target, nearest first, ending at
/// the root. Existing targets get no ancestor list since nothing above them
/// can be created by the operation. Lookups with `report_ancestors` unset
/// pass straight through without querying the store.
#[derive(Clone)]
pub struct AncestorReportingReader {
    inner: Arc<dyn PermissionReader>,
    strategy: Arc<dyn IdentifierStrategy>,
    store: Arc<dyn ResourceSet>,
}

impl AncestorReportingReader {
    pub fn new(
        inner: Arc<dyn PermissionReader>,
        strategy: Arc<dyn IdentifierStrategy>,
        store: Arc<dyn ResourceSet>,
    ) -> Self {
        Self {
            inner,
            strategy,
            store,
        }
    }
}

#[async_trait]
impl PermissionReader for AncestorReportingReader {
    async fn read_permissions(
        &self,
        input: PermissionReaderInput<'_>,
    ) -> Result<PermissionReaderOutput> {
        let mut output = self.inner.read_permissions(input).await?;

        if input.report_ancestors && !self.store.has_resource(input.target).await? {
            let chain = container_chain(self.strategy.as_ref(), input.target);
            if !chain.is_empty() {
                output.ancestors = Some(chain);
            }
        }

        Ok(output)
    }
}
