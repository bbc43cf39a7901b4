use uuid::Uuid;

use crate::authorizer::Verdict;
use crate::credentials::CredentialGroup;
use crate::identifier::ResourceIdentifier;
use crate::permission::{AccessModes, PermissionSet};

/// Events emitted while a request is authorized
///
/// Every event carries the id of the request it belongs to, so observers
/// can correlate the stages of concurrent requests.
#[derive(Debug, Clone)]
pub enum AuthorizationEvent {
    // ===== Target Checks =====
    /// Credentials were extracted from the request
    CredentialsExtracted {
        request_id: Uuid,
        /// Groups the requester qualifies for
        groups: Vec<CredentialGroup>,
    },

    /// Required modes were derived from the operation
    ModesExtracted {
        request_id: Uuid,
        target: ResourceIdentifier,
        modes: AccessModes,
    },

    /// Permissions were resolved for the target
    PermissionsRead {
        request_id: Uuid,
        target: ResourceIdentifier,
        permissions: PermissionSet,
        /// Number of ancestors reported alongside the permissions
        ancestor_count: usize,
    },

    /// The target check passed
    TargetAuthorized {
        request_id: Uuid,
        target: ResourceIdentifier,
    },

    // ===== Ancestor Checks =====
    /// An ancestor creation check passed or was skipped
    AncestorChecked {
        request_id: Uuid,
        ancestor: ResourceIdentifier,
        verdict: Verdict,
    },

    // ===== Outcome =====
    /// The request was denied or could not be decided
    AuthorizationFailed {
        request_id: Uuid,
        /// Resource whose check failed
        target: ResourceIdentifier,
        /// Error message
        error: String,
    },

    /// The authorized operation was handed to the next handler
    Delegated {
        request_id: Uuid,
        target: ResourceIdentifier,
    },
}

impl AuthorizationEvent {
    /// The request this event belongs to.
    pub fn request_id(&self) -> Uuid {
        match self {
            Self::CredentialsExtracted { request_id, .. }
            | Self::ModesExtracted { request_id, .. }
            | Self::PermissionsRead { request_id, .. }
            | Self::TargetAuthorized { request_id, .. }
            | Self::AncestorChecked { request_id, .. }
            | Self::AuthorizationFailed { request_id, .. }
            | Self::Delegated { request_id, .. } => *request_id,
        }
    }
}

/// Hook for observing authorization events
///
/// Implement this trait to receive notifications about every stage of a
/// request's authorization.
///
/// # Example
/// ```
/// use podgate_core::events::{AuthorizationEvent, AuthorizationHook};
///
/// struct DenialCounter;
///
/// impl AuthorizationHook for DenialCounter {
///     fn on_event(&self, event: &AuthorizationEvent) {
///         if let AuthorizationEvent::AuthorizationFailed { target, error, .. } = event {
///             println!("denied {}: {}", target, error);
///         }
///     }
/// }
/// ```
pub trait AuthorizationHook: Send + Sync {
    /// Called when an event occurs
    fn on_event(&self, event: &AuthorizationEvent);
}

/// Blanket implementation for closures
impl<F> AuthorizationHook for F
where
    F: Fn(&AuthorizationEvent) + Send + Sync,
{
    fn on_event(&self, event: &AuthorizationEvent) {
        self(event)
    }
}
