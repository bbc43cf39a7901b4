//! The permission source capability.

use async_trait::async_trait;
use serde::Serialize;

use super::model::{AccessModes, PermissionSet};
use crate::credentials::CredentialSet;
use crate::error::Result;
use crate::identifier::ResourceIdentifier;

/// Input of a permission lookup.
#[derive(Debug, Clone, Copy)]
pub struct PermissionReaderInput<'a> {
    /// Credentials of the requester.
    pub credentials: &'a CredentialSet,
    /// Resource the permissions are requested for.
    pub target: &'a ResourceIdentifier,
    /// Modes the operation requires. Sources may ignore them.
    pub modes: &'a AccessModes,
    /// Whether containment-aware sources should attach the ancestor chain.
    ///
    /// Lookups on the ancestors themselves set this to `false`.
    pub report_ancestors: bool,
}

/// Result of a permission lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PermissionReaderOutput {
    /// Permission per credential group.
    pub permissions: PermissionSet,
    /// Containers that would be created along with the target, nearest first.
    ///
    /// Only supplied by sources that know about containment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ancestors: Option<Vec<ResourceIdentifier>>,
}

impl PermissionReaderOutput {
    /// Output carrying only permissions.
    pub fn from_permissions(permissions: PermissionSet) -> Self {
        Self {
            permissions,
            ancestors: None,
        }
    }

    /// The ancestor list, empty when none was supplied.
    pub fn ancestors(&self) -> &[ResourceIdentifier] {
        self.ancestors.as_deref().unwrap_or_default()
    }
}

/// A source of permission judgments.
///
/// Implementations must only return permissions for credential groups present
/// in `input.credentials`. A target the source knows nothing about yields an
/// empty [`PermissionSet`], never an error.
///
/// # Example
///
/// ```rust
/// use podgate_core::permission::{AllStaticReader, PermissionReader, PermissionReaderInput};
/// use podgate_core::{AccessModes, CredentialSet, ResourceIdentifier};
///
/// # tokio_test::block_on(async {
/// let reader = AllStaticReader::new(true);
/// let credentials = CredentialSet::public();
/// let target = ResourceIdentifier::new("http://localhost:3000/notes");
/// let modes = AccessModes::new();
///
/// let output = reader
///     .read_permissions(PermissionReaderInput {
///         credentials: &credentials,
///         target: &target,
///         modes: &modes,
///         report_ancestors: true,
///     })
///     .await
///     .unwrap();
/// assert_eq!(output.permissions.groups().count(), 1);
/// # });
/// ```
#[async_trait]
pub trait PermissionReader: Send + Sync {
    /// Look up the permissions of the requester on the target.
    async fn read_permissions(
        &self,
        input: PermissionReaderInput<'_>,
    ) -> Result<PermissionReaderOutput>;
}
