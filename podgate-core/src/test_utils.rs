//! Test utilities for podgate-core.
//!
//! Mock collaborators for exercising the authorizing handler without a real
//! store or policy.
//!
//! Enable with the `test-utils` feature:
//!
//! ```toml
//! [dev-dependencies]
//! podgate-core = { version = "...", features = ["test-utils"] }
//! ```
//!
//! # Example
//!
//! ```rust
//! use podgate_core::test_utils::{RecordingAuthorizer, RecordingHandler};
//! use podgate_core::permission::AllStaticReader;
//! use podgate_core::AuthorizingHandler;
//!
//! let authorizer = RecordingAuthorizer::granting().with_denied("http://localhost:3000/secret");
//! let handler = AuthorizingHandler::builder()
//!     .with_reader(AllStaticReader::new(true))
//!     .with_authorizer(authorizer.clone())
//!     .with_handler(RecordingHandler::new())
//!     .build()
//!     .unwrap();
//! assert_eq!(handler.inner().call_count(), 0);
//! ```

use async_trait::async_trait;
use http::request::Parts;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::authorizer::{Authorizer, AuthorizerInput, Verdict};
use crate::credentials::{CredentialSet, CredentialsExtractor};
use crate::error::{AuthorizationError, Result};
use crate::identifier::ResourceIdentifier;
use crate::modes::ModesExtractor;
use crate::operation::{AuthorizedOperation, Operation, OperationHandler};
use crate::permission::{
    AccessMode, AccessModes, PermissionReader, PermissionReaderInput, PermissionReaderOutput,
};
use crate::store::{ResourceSet, StoreError};

/// Returns the same credentials for every request.
#[derive(Debug, Clone)]
pub struct FixedCredentialsExtractor {
    credentials: CredentialSet,
}

impl FixedCredentialsExtractor {
    pub fn new(credentials: CredentialSet) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl CredentialsExtractor for FixedCredentialsExtractor {
    async fn extract_credentials(&self, _request: &Parts) -> CredentialSet {
        self.credentials.clone()
    }
}

/// Returns the same modes for every operation.
#[derive(Debug, Clone)]
pub struct FixedModesExtractor {
    modes: AccessModes,
}

impl FixedModesExtractor {
    pub fn new(modes: impl Into<AccessModes>) -> Self {
        Self {
            modes: modes.into(),
        }
    }
}

#[async_trait]
impl ModesExtractor for FixedModesExtractor {
    async fn extract_modes(&self, _operation: &Operation) -> Result<AccessModes> {
        Ok(self.modes.clone())
    }
}

/// A permission source with canned answers that records its lookups.
///
/// Clones share the recorded lookups.
#[derive(Clone, Default)]
pub struct FixedReader {
    default: PermissionReaderOutput,
    per_target: HashMap<ResourceIdentifier, PermissionReaderOutput>,
    lookups: Arc<Mutex<Vec<(ResourceIdentifier, AccessModes)>>>,
}

impl FixedReader {
    /// Answer every lookup with `output`.
    pub fn new(output: PermissionReaderOutput) -> Self {
        Self {
            default: output,
            ..Self::default()
        }
    }

    /// Answer lookups for `target` with `output` instead.
    pub fn with_target(
        mut self,
        target: impl Into<ResourceIdentifier>,
        output: PermissionReaderOutput,
    ) -> Self {
        self.per_target.insert(target.into(), output);
        self
    }

    /// Targets looked up so far, in order.
    pub fn requested_targets(&self) -> Vec<ResourceIdentifier> {
        self.lookups.lock().iter().map(|(target, _)| target.clone()).collect()
    }

    /// Modes of the lookups so far, in order.
    pub fn requested_modes(&self) -> Vec<AccessModes> {
        self.lookups.lock().iter().map(|(_, modes)| modes.clone()).collect()
    }
}

#[async_trait]
impl PermissionReader for FixedReader {
    async fn read_permissions(
        &self,
        input: PermissionReaderInput<'_>,
    ) -> Result<PermissionReaderOutput> {
        self.lookups
            .lock()
            .push((input.target.clone(), input.modes.clone()));

        let output = self.per_target.get(input.target).unwrap_or(&self.default);

        // Keep the contract: only groups the requester holds.
        let permissions = output
            .permissions
            .iter()
            .filter(|(group, _)| input.credentials.contains(*group))
            .map(|(group, permission)| (group, permission.clone()))
            .collect();
        Ok(PermissionReaderOutput {
            permissions,
            ancestors: output.ancestors.clone(),
        })
    }
}

/// One call received by a [`RecordingAuthorizer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizerCall {
    pub target: ResourceIdentifier,
    pub modes: AccessModes,
    pub only_if_target_missing: bool,
}

/// A decision engine that grants everything except configured targets and
/// records its calls.
///
/// Clones share the recorded calls.
#[derive(Clone, Default)]
pub struct RecordingAuthorizer {
    denied: HashSet<ResourceIdentifier>,
    existing: HashSet<ResourceIdentifier>,
    calls: Arc<Mutex<Vec<AuthorizerCall>>>,
}

impl RecordingAuthorizer {
    /// Grant every check.
    pub fn granting() -> Self {
        Self::default()
    }

    /// Deny every check on `target`.
    pub fn with_denied(mut self, target: impl Into<ResourceIdentifier>) -> Self {
        self.denied.insert(target.into());
        self
    }

    /// Treat `target` as existing for checks that only apply to missing targets.
    pub fn with_existing(mut self, target: impl Into<ResourceIdentifier>) -> Self {
        self.existing.insert(target.into());
        self
    }

    /// Calls received so far, in order.
    pub fn calls(&self) -> Vec<AuthorizerCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl Authorizer for RecordingAuthorizer {
    async fn authorize(&self, input: AuthorizerInput<'_>) -> Result<Verdict> {
        self.calls.lock().push(AuthorizerCall {
            target: input.target.clone(),
            modes: input.modes.clone(),
            only_if_target_missing: input.only_if_target_missing,
        });

        if input.only_if_target_missing && self.existing.contains(input.target) {
            return Ok(Verdict::SkippedExisting);
        }
        if self.denied.contains(input.target) {
            return Err(AuthorizationError::Forbidden {
                target: input.target.clone(),
                mode: input.modes.iter().next().unwrap_or(AccessMode::Read),
            }
            .into());
        }
        Ok(Verdict::Granted)
    }
}

/// A resource store that fails every existence query and records them.
///
/// Clones share the recorded queries.
#[derive(Clone)]
pub struct UnavailableStore {
    reason: String,
    queried: Arc<Mutex<Vec<ResourceIdentifier>>>,
}

impl UnavailableStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            queried: Arc::default(),
        }
    }

    /// Identifiers queried so far, in order.
    pub fn queried(&self) -> Vec<ResourceIdentifier> {
        self.queried.lock().clone()
    }
}

#[async_trait]
impl ResourceSet for UnavailableStore {
    async fn has_resource(
        &self,
        identifier: &ResourceIdentifier,
    ) -> std::result::Result<bool, StoreError> {
        self.queried.lock().push(identifier.clone());
        Err(StoreError::Unavailable(self.reason.clone()))
    }
}

/// A next handler that records the operations it receives.
///
/// Clones share the recorded operations.
#[derive(Clone, Default)]
pub struct RecordingHandler {
    received: Arc<Mutex<Vec<AuthorizedOperation>>>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Operations received so far, in order.
    pub fn received(&self) -> Vec<AuthorizedOperation> {
        self.received.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.received.lock().len()
    }
}

#[async_trait]
impl OperationHandler for RecordingHandler {
    type Output = ResourceIdentifier;

    async fn handle(&self, input: AuthorizedOperation) -> Result<ResourceIdentifier> {
        let target = input.operation.target.clone();
        self.received.lock().push(input);
        Ok(target)
    }
}
