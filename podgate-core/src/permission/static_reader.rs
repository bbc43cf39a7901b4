//! Blanket allow-all / deny-all permission source.

use async_trait::async_trait;

use super::model::{Permission, PermissionSet};
use super::reader::{PermissionReader, PermissionReaderInput, PermissionReaderOutput};
use crate::error::Result;

/// Assigns the same permission to every credential group of the requester,
/// independent of target and requested modes.
///
/// Typical uses are "root may do anything" or "public may do nothing" rules.
#[derive(Debug, Clone)]
pub struct AllStaticReader {
    permission: Permission,
}

impl AllStaticReader {
    /// Create a reader that sets every mode to `allow`.
    pub fn new(allow: bool) -> Self {
        Self {
            permission: Permission::all(allow),
        }
    }
}

#[async_trait]
impl PermissionReader for AllStaticReader {
    async fn read_permissions(
        &self,
        input: PermissionReaderInput<'_>,
    ) -> Result<PermissionReaderOutput> {
        let permissions: PermissionSet = input
            .credentials
            .groups()
            .map(|group| (group, self.permission.clone()))
            .collect();
        Ok(PermissionReaderOutput::from_permissions(permissions))
    }
}
