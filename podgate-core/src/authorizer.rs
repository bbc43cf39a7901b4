//! The decision engine.
//!
//! An [`Authorizer`] receives the resolved permissions of a resource and
//! decides whether the requester may perform the required modes on it.
//! Denials are terminal for the request.

use async_trait::async_trait;
use std::sync::Arc;

use crate::credentials::{CredentialGroup, CredentialSet};
use crate::error::{AuthorizationError, Result};
use crate::identifier::ResourceIdentifier;
use crate::permission::{AccessMode, AccessModes, PermissionSet};
use crate::store::ResourceSet;

/// Everything the decision engine needs for one check.
#[derive(Debug, Clone, Copy)]
pub struct AuthorizerInput<'a> {
    /// Credentials of the requester
    pub credentials: &'a CredentialSet,
    /// Resource being checked
    pub target: &'a ResourceIdentifier,
    /// Modes that must all be granted
    pub modes: &'a AccessModes,
    /// Permissions resolved for `target`
    pub permissions: &'a PermissionSet,
    /// Skip the check when `target` already exists
    pub only_if_target_missing: bool,
}

/// Outcome of a check that did not deny.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Every required mode is granted
    Granted,
    /// The check was skipped because the target exists
    SkippedExisting,
}

impl Verdict {
    /// Returns true if the check was skipped for an existing target
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::SkippedExisting)
    }
}

/// Decides whether a requester may perform modes on a resource.
#[async_trait]
pub trait Authorizer: Send + Sync {
    /// Check `input`.
    ///
    /// Returns [`Error::Authorization`](crate::Error::Authorization) when the
    /// requester is denied. With `only_if_target_missing` set, an existing
    /// target yields [`Verdict::SkippedExisting`] without looking at the
    /// permissions.
    async fn authorize(&self, input: AuthorizerInput<'_>) -> Result<Verdict>;
}

/// Grants a mode when at least one credential group the requester holds has
/// it set to `true`.
///
/// Denial dominance is applied while permissions are merged, so a mode that
/// any source denied arrives here as `false` and is never granted.
#[derive(Clone)]
pub struct PermissionBasedAuthorizer {
    store: Arc<dyn ResourceSet>,
}

impl PermissionBasedAuthorizer {
    pub fn new(store: Arc<dyn ResourceSet>) -> Self {
        Self { store }
    }

    fn denial(input: &AuthorizerInput<'_>, mode: AccessMode) -> AuthorizationError {
        let target = input.target.clone();
        if input.credentials.contains(CredentialGroup::Agent) {
            AuthorizationError::Forbidden { target, mode }
        } else {
            AuthorizationError::Unauthenticated { target, mode }
        }
    }
}

#[async_trait]
impl Authorizer for PermissionBasedAuthorizer {
    async fn authorize(&self, input: AuthorizerInput<'_>) -> Result<Verdict> {
        if input.only_if_target_missing && self.store.has_resource(input.target).await? {
            return Ok(Verdict::SkippedExisting);
        }

        for mode in input.modes.iter() {
            let granted = input
                .permissions
                .iter()
                .filter(|(group, _)| input.credentials.contains(*group))
                .any(|(_, permission)| permission.allows(mode));

            if !granted {
                return Err(Self::denial(&input, mode).into());
            }
        }

        Ok(Verdict::Granted)
    }
}
