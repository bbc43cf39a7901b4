//! Resource existence queries.
//!
//! The authorization layer never reads or writes resource content. It only
//! asks the store whether a resource exists, to decide whether an ancestor
//! container would be created by the operation.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashSet;

use crate::identifier::ResourceIdentifier;

/// Errors that can occur when querying the resource store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store rejected the query.
    #[error("existence check failed for {identifier}: {reason}")]
    Query {
        /// Resource the query was about
        identifier: ResourceIdentifier,
        /// What went wrong
        reason: String,
    },
}

/// Trait for resource stores that can answer existence queries.
#[async_trait]
pub trait ResourceSet: Send + Sync {
    /// Whether a resource with this identifier currently exists.
    async fn has_resource(&self, identifier: &ResourceIdentifier) -> Result<bool, StoreError>;
}

/// In-memory set of existing resources.
///
/// Used by tests and the demo server. Resources are cleared when the process
/// exits.
#[derive(Debug, Default)]
pub struct MemoryResourceSet {
    resources: RwLock<HashSet<ResourceIdentifier>>,
}

impl MemoryResourceSet {
    /// Create a new empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set containing `identifiers`.
    pub fn with_resources<I, T>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ResourceIdentifier>,
    {
        Self {
            resources: RwLock::new(identifiers.into_iter().map(Into::into).collect()),
        }
    }

    /// Mark a resource as existing.
    ///
    /// Returns `true` if it did not exist before.
    pub fn add(&self, identifier: impl Into<ResourceIdentifier>) -> bool {
        self.resources.write().insert(identifier.into())
    }

    /// Mark a resource as removed.
    ///
    /// Returns `true` if it existed.
    pub fn remove(&self, identifier: &ResourceIdentifier) -> bool {
        self.resources.write().remove(identifier)
    }

    /// Number of existing resources.
    pub fn len(&self) -> usize {
        self.resources.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.read().is_empty()
    }
}

#[async_trait]
impl ResourceSet for MemoryResourceSet {
    async fn has_resource(&self, identifier: &ResourceIdentifier) -> Result<bool, StoreError> {
        Ok(self.resources.read().contains(identifier))
    }
}
