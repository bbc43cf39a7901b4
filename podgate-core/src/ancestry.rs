//! Resolution of the containers an operation may create implicitly.
//!
//! Writing `/a/b/c` when `/a/` does not exist also creates `/a/` and
//! `/a/b/`. The requester needs the right to create each of them, so the
//! authorizing handler asks an [`AncestorResolver`] which containers to check.
//!
//! Two strategies are provided:
//!
//! | Strategy | Source of the list | Existence queries |
//! |----------|--------------------|-------------------|
//! | [`ReportedAncestors`] | Ancestor list from the permission lookup | None (the decision engine checks) |
//! | [`ParentWalk`] | Walks parent containers upward | One per missing ancestor plus the first existing one |
//!
//! Both yield the same decision for the same store state.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::identifier::{IdentifierStrategy, ResourceIdentifier};
use crate::store::ResourceSet;

/// Decides which ancestors of a target have to be checked for creation
/// rights, nearest first.
#[async_trait]
pub trait AncestorResolver: Send + Sync {
    /// Resolve the ancestor chain of `target`.
    ///
    /// `reported` is the ancestor list from the target's permission lookup,
    /// empty when no source supplied one.
    async fn resolve(
        &self,
        target: &ResourceIdentifier,
        reported: &[ResourceIdentifier],
    ) -> Result<Vec<ResourceIdentifier>>;
}

/// Uses the ancestor list reported by the permission sources as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportedAncestors;

#[async_trait]
impl AncestorResolver for ReportedAncestors {
    async fn resolve(
        &self,
        _target: &ResourceIdentifier,
        reported: &[ResourceIdentifier],
    ) -> Result<Vec<ResourceIdentifier>> {
        Ok(reported.to_vec())
    }
}

/// Walks parent containers upward while they do not exist.
///
/// The walk stops at the first existing ancestor or at the root, which is
/// its own parent. The returned list only holds missing containers.
#[derive(Clone)]
pub struct ParentWalk {
    strategy: Arc<dyn IdentifierStrategy>,
    store: Arc<dyn ResourceSet>,
}

impl ParentWalk {
    pub fn new(strategy: Arc<dyn IdentifierStrategy>, store: Arc<dyn ResourceSet>) -> Self {
        Self { strategy, store }
    }
}

#[async_trait]
impl AncestorResolver for ParentWalk {
    async fn resolve(
        &self,
        target: &ResourceIdentifier,
        _reported: &[ResourceIdentifier],
    ) -> Result<Vec<ResourceIdentifier>> {
        let mut missing = Vec::new();
        let mut current = target.clone();

        loop {
            let parent = self.strategy.parent_container(&current);
            if parent == current || self.store.has_resource(&parent).await? {
                break;
            }
            missing.push(parent.clone());
            current = parent;
        }

        Ok(missing)
    }
}

/// Every container above `target`, nearest first, ending with the root.
///
/// Returns an empty list for the root itself.
pub fn container_chain(
    strategy: &dyn IdentifierStrategy,
    target: &ResourceIdentifier,
) -> Vec<ResourceIdentifier> {
    let mut chain = Vec::new();
    let mut current = target.clone();

    loop {
        let parent = strategy.parent_container(&current);
        if parent == current {
            return chain;
        }
        chain.push(parent.clone());
        current = parent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::SingleRootIdentifierStrategy;
    use crate::store::MemoryResourceSet;

    const BASE: &str = "http://localhost:3000/";

    fn strategy() -> Arc<SingleRootIdentifierStrategy> {
        Arc::new(SingleRootIdentifierStrategy::new(BASE).unwrap())
    }

    fn ids(paths: &[&str]) -> Vec<ResourceIdentifier> {
        paths.iter().map(|p| ResourceIdentifier::new(*p)).collect()
    }

    #[test]
    fn test_container_chain() {
        let chain = container_chain(
            strategy().as_ref(),
            &"http://localhost:3000/a/b/c".into(),
        );
        assert_eq!(
            chain,
            ids(&[
                "http://localhost:3000/a/b/",
                "http://localhost:3000/a/",
                "http://localhost:3000/",
            ])
        );
    }

    #[test]
    fn test_container_chain_of_root_is_empty() {
        let strategy = strategy();
        assert!(container_chain(strategy.as_ref(), &strategy.root()).is_empty());
    }

    #[tokio::test]
    async fn test_reported_ancestors_passes_list_through() {
        let reported = ids(&["http://localhost:3000/a/"]);
        let resolved = ReportedAncestors
            .resolve(&"http://localhost:3000/a/b".into(), &reported)
            .await
            .unwrap();
        assert_eq!(resolved, reported);
    }

    #[tokio::test]
    async fn test_parent_walk_stops_at_existing_ancestor() {
        let store = Arc::new(MemoryResourceSet::with_resources([BASE, "http://localhost:3000/a/"]));
        let walk = ParentWalk::new(strategy(), store);

        let resolved = walk
            .resolve(&"http://localhost:3000/a/b/c/d".into(), &[])
            .await
            .unwrap();
        assert_eq!(
            resolved,
            ids(&["http://localhost:3000/a/b/c/", "http://localhost:3000/a/b/"])
        );
    }

    #[tokio::test]
    async fn test_parent_walk_terminates_at_root_when_nothing_exists() {
        let walk = ParentWalk::new(strategy(), Arc::new(MemoryResourceSet::new()));

        let resolved = walk
            .resolve(&"http://localhost:3000/a/b".into(), &[])
            .await
            .unwrap();
        assert_eq!(
            resolved,
            ids(&["http://localhost:3000/a/", "http://localhost:3000/"])
        );

        let strategy = strategy();
        let resolved = walk.resolve(&strategy.root(), &[]).await.unwrap();
        assert!(resolved.is_empty());
    }

    #[tokio::test]
    async fn test_parent_walk_ignores_reported_list() {
        let store = Arc::new(MemoryResourceSet::with_resources([BASE]));
        let walk = ParentWalk::new(strategy(), store);

        let resolved = walk
            .resolve(
                &"http://localhost:3000/doc".into(),
                &ids(&["http://localhost:3000/elsewhere/"]),
            )
            .await
            .unwrap();
        assert!(resolved.is_empty());
    }
}
