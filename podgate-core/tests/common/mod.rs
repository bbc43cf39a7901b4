//! Common test utilities shared across test files.
//!
//! This module provides mock implementations and test helpers.
//! Items here may not be used by all test files, hence the module-level allow.
#![allow(dead_code)]

use async_trait::async_trait;
use podgate_core::{
    AuthorizationEvent, AuthorizationHook, AuthorizedOperation, Authorizer, AuthorizerInput,
    Credential, CredentialGroup, CredentialSet, CredentialsExtractor, OperationHandler,
    PermissionReader, PermissionReaderInput, PermissionReaderOutput, ResourceIdentifier,
    ResourceSet, Result, StoreError, Verdict,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const BASE: &str = "http://localhost:3000/";

pub fn parts() -> http::request::Parts {
    http::Request::new(()).into_parts().0
}

pub fn alice() -> CredentialSet {
    CredentialSet::public().with(
        CredentialGroup::Agent,
        Credential::with_id("https://alice.example/profile#me"),
    )
}

// ===== Credentials =====

/// Hands out the same credentials for every request.
pub struct StaticCredentials(pub CredentialSet);

#[async_trait]
impl CredentialsExtractor for StaticCredentials {
    async fn extract_credentials(&self, _request: &http::request::Parts) -> CredentialSet {
        self.0.clone()
    }
}

// ===== Permission Sources =====

/// Reports a fixed ancestor list for one target and nothing else.
pub struct AncestorListReader {
    pub target: ResourceIdentifier,
    pub ancestors: Vec<ResourceIdentifier>,
}

#[async_trait]
impl PermissionReader for AncestorListReader {
    async fn read_permissions(
        &self,
        input: PermissionReaderInput<'_>,
    ) -> Result<PermissionReaderOutput> {
        let mut output = PermissionReaderOutput::default();
        if input.target == &self.target {
            output.ancestors = Some(self.ancestors.clone());
        }
        Ok(output)
    }
}

// ===== Resource Store =====

/// A store that cannot answer any existence query.
pub struct FailingStore;

#[async_trait]
impl ResourceSet for FailingStore {
    async fn has_resource(
        &self,
        _identifier: &ResourceIdentifier,
    ) -> std::result::Result<bool, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

// ===== Decision Engine =====

/// Wraps a decision engine and records the checks it was asked for.
pub struct RecordingAuthorizer<A> {
    pub inner: A,
    pub checks: Arc<Mutex<Vec<(ResourceIdentifier, bool)>>>,
}

impl<A> RecordingAuthorizer<A> {
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            checks: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl<A: Authorizer> Authorizer for RecordingAuthorizer<A> {
    async fn authorize(&self, input: AuthorizerInput<'_>) -> Result<Verdict> {
        self.checks
            .lock()
            .unwrap()
            .push((input.target.clone(), input.only_if_target_missing));
        self.inner.authorize(input).await
    }
}

// ===== Next Handler =====

/// Counts invocations and returns the target it was called for.
#[derive(Clone, Default)]
pub struct CountingHandler {
    pub calls: Arc<Mutex<usize>>,
}

impl CountingHandler {
    pub fn count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl OperationHandler for CountingHandler {
    type Output = ResourceIdentifier;

    async fn handle(&self, input: AuthorizedOperation) -> Result<ResourceIdentifier> {
        *self.calls.lock().unwrap() += 1;
        Ok(input.operation.target)
    }
}

// ===== Event Collector =====

/// Collects event names per request id.
#[derive(Clone, Default)]
pub struct EventCollector {
    pub events: Arc<Mutex<HashMap<uuid::Uuid, Vec<&'static str>>>>,
}

impl EventCollector {
    pub fn for_only_request(&self) -> Vec<&'static str> {
        let events = self.events.lock().unwrap();
        assert_eq!(events.len(), 1, "expected exactly one request");
        events.values().next().cloned().unwrap_or_default()
    }
}

impl AuthorizationHook for EventCollector {
    fn on_event(&self, event: &AuthorizationEvent) {
        let name = match event {
            AuthorizationEvent::CredentialsExtracted { .. } => "credentials",
            AuthorizationEvent::ModesExtracted { .. } => "modes",
            AuthorizationEvent::PermissionsRead { .. } => "permissions",
            AuthorizationEvent::TargetAuthorized { .. } => "target",
            AuthorizationEvent::AncestorChecked { .. } => "ancestor",
            AuthorizationEvent::AuthorizationFailed { .. } => "failed",
            AuthorizationEvent::Delegated { .. } => "delegated",
        };
        self.events
            .lock()
            .unwrap()
            .entry(event.request_id())
            .or_default()
            .push(name);
    }
}
