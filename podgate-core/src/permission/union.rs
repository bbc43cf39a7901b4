//! Fan-out-and-merge over several permission sources.

use async_trait::async_trait;
use futures::future::try_join_all;
use std::sync::Arc;

use super::reader::{PermissionReader, PermissionReaderInput, PermissionReaderOutput};
use crate::error::{Error, Result};

/// Combines the results of multiple [`PermissionReader`]s.
///
/// Every source is asked with the same input. Per credential group and mode
/// the results are merged with the rule `false` > `true` > no opinion, so a
/// denial from any source wins. The ancestor list of the output is the last
/// non-empty list supplied, in source order.
///
/// A union is itself a [`PermissionReader`] and can be nested.
#[derive(Clone)]
pub struct UnionPermissionReader {
    readers: Vec<Arc<dyn PermissionReader>>,
}

impl std::fmt::Debug for UnionPermissionReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnionPermissionReader")
            .field("readers", &self.readers.len())
            .finish()
    }
}

impl UnionPermissionReader {
    /// Create a union over `readers`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `readers` is empty.
    pub fn new(readers: Vec<Arc<dyn PermissionReader>>) -> Result<Self> {
        if readers.is_empty() {
            return Err(Error::Config(
                "a permission union requires at least one source".to_string(),
            ));
        }
        Ok(Self { readers })
    }

    /// Number of combined sources.
    pub fn len(&self) -> usize {
        self.readers.len()
    }

    /// Always false: construction rejects empty unions.
    pub fn is_empty(&self) -> bool {
        self.readers.is_empty()
    }

    fn combine(results: Vec<PermissionReaderOutput>) -> PermissionReaderOutput {
        let mut combined = PermissionReaderOutput::default();
        for result in results {
            combined.permissions.merge(&result.permissions);
            if let Some(ancestors) = result.ancestors.filter(|a| !a.is_empty()) {
                combined.ancestors = Some(ancestors);
            }
        }
        combined
    }
}

#[async_trait]
impl PermissionReader for UnionPermissionReader {
    async fn read_permissions(
        &self,
        input: PermissionReaderInput<'_>,
    ) -> Result<PermissionReaderOutput> {
        // The sources are independent; only the merge below is ordered.
        let results = try_join_all(
            self.readers
                .iter()
                .map(|reader| reader.read_permissions(input)),
        )
        .await?;
        Ok(Self::combine(results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{Credential, CredentialGroup, CredentialSet};
    use crate::identifier::ResourceIdentifier;
    use crate::permission::{AccessMode, AccessModes, AllStaticReader, Permission, PermissionSet};

    /// Returns a canned output regardless of input.
    struct Canned(PermissionReaderOutput);

    #[async_trait]
    impl PermissionReader for Canned {
        async fn read_permissions(
            &self,
            _input: PermissionReaderInput<'_>,
        ) -> Result<PermissionReaderOutput> {
            Ok(self.0.clone())
        }
    }

    fn canned(permissions: PermissionSet, ancestors: Option<Vec<&str>>) -> Arc<dyn PermissionReader> {
        Arc::new(Canned(PermissionReaderOutput {
            permissions,
            ancestors: ancestors.map(|a| a.into_iter().map(ResourceIdentifier::new).collect()),
        }))
    }

    fn shared(reader: impl PermissionReader + 'static) -> Arc<dyn PermissionReader> {
        Arc::new(reader)
    }

    fn agent(permission: Permission) -> PermissionSet {
        PermissionSet::new().with(CredentialGroup::Agent, permission)
    }

    async fn read(union: &UnionPermissionReader) -> PermissionReaderOutput {
        let credentials =
            CredentialSet::new().with(CredentialGroup::Agent, Credential::with_id("https://a.example/#me"));
        let target = ResourceIdentifier::new("http://localhost:3000/foo");
        let modes = AccessModes::from([AccessMode::Read]);
        union
            .read_permissions(PermissionReaderInput {
                credentials: &credentials,
                target: &target,
                modes: &modes,
                report_ancestors: true,
            })
            .await
            .unwrap()
    }

    #[test]
    fn test_empty_union_is_rejected() {
        let err = UnionPermissionReader::new(Vec::new()).unwrap_err();
        assert!(err.is_config());
    }

    #[tokio::test]
    async fn test_single_source_passes_through() {
        let union = UnionPermissionReader::new(vec![shared(AllStaticReader::new(true))]).unwrap();
        let output = read(&union).await;
        assert_eq!(output.permissions, agent(Permission::all(true)));
        assert!(output.ancestors.is_none());
    }

    #[tokio::test]
    async fn test_denial_dominates_in_any_order() {
        let grant = shared(AllStaticReader::new(true));
        let deny = shared(AllStaticReader::new(false));

        for readers in [
            vec![grant.clone(), deny.clone()],
            vec![deny.clone(), grant.clone()],
        ] {
            let output = read(&UnionPermissionReader::new(readers).unwrap()).await;
            assert_eq!(output.permissions, agent(Permission::all(false)));
        }
    }

    #[tokio::test]
    async fn test_grant_fills_in_no_opinion() {
        let union = UnionPermissionReader::new(vec![
            canned(agent(Permission::new().with(AccessMode::Read, true)), None),
            canned(agent(Permission::new().with(AccessMode::Write, true)), None),
            canned(PermissionSet::new(), None),
        ])
        .unwrap();

        let output = read(&union).await;
        let permission = output.permissions.get(CredentialGroup::Agent).unwrap();
        assert_eq!(permission.get(AccessMode::Read), Some(true));
        assert_eq!(permission.get(AccessMode::Write), Some(true));
        assert_eq!(permission.get(AccessMode::Append), None);
    }

    #[tokio::test]
    async fn test_last_non_empty_ancestor_list_wins() {
        let union = UnionPermissionReader::new(vec![
            canned(PermissionSet::new(), Some(vec!["http://localhost:3000/a/"])),
            canned(PermissionSet::new(), Some(vec!["http://localhost:3000/b/"])),
            canned(PermissionSet::new(), Some(vec![])),
            canned(PermissionSet::new(), None),
        ])
        .unwrap();

        let output = read(&union).await;
        assert_eq!(
            output.ancestors(),
            &[ResourceIdentifier::new("http://localhost:3000/b/")]
        );
    }

    #[tokio::test]
    async fn test_nested_union() {
        let inner = UnionPermissionReader::new(vec![
            shared(AllStaticReader::new(true)),
            canned(PermissionSet::new(), Some(vec!["http://localhost:3000/a/"])),
        ])
        .unwrap();
        let outer = UnionPermissionReader::new(vec![
            shared(inner),
            canned(agent(Permission::new().with(AccessMode::Delete, false)), None),
        ])
        .unwrap();

        let output = read(&outer).await;
        let permission = output.permissions.get(CredentialGroup::Agent).unwrap();
        assert_eq!(permission.get(AccessMode::Read), Some(true));
        assert_eq!(permission.get(AccessMode::Delete), Some(false));
        assert_eq!(output.ancestors().len(), 1);
    }
}
