//! The authorizing handler.
//!
//! Runs every request through a fixed sequence of stages before handing it
//! to the next [`OperationHandler`]:
//!
//! 1. Extract credentials from the request
//! 2. Derive the required access modes from the operation
//! 3. Read the permissions of the target
//! 4. Authorize the target
//! 5. For create-capable operations, authorize creation of every missing
//!    ancestor, nearest first
//! 6. Delegate to the next handler
//!
//! The first failure ends the request; later stages never run.

mod builder;

pub use builder::AuthorizingHandlerBuilder;

use http::request::Parts;
use std::sync::Arc;
use uuid::Uuid;

use crate::ancestry::AncestorResolver;
use crate::authorizer::{Authorizer, AuthorizerInput, Verdict};
use crate::credentials::{CredentialSet, CredentialsExtractor};
use crate::error::{Error, Result};
use crate::events::{AuthorizationEvent, AuthorizationHook};
use crate::identifier::ResourceIdentifier;
use crate::modes::ModesStrategy;
use crate::operation::{AuthorizedOperation, Operation, OperationHandler};
use crate::permission::{AccessModes, PermissionReader, PermissionReaderInput, PermissionReaderOutput};

/// Authorizes operations and delegates the permitted ones.
///
/// Holds only immutable configuration, so one instance can serve any number
/// of concurrent requests.
pub struct AuthorizingHandler<H> {
    credentials: Arc<dyn CredentialsExtractor>,
    modes: ModesStrategy,
    reader: Arc<dyn PermissionReader>,
    authorizer: Arc<dyn Authorizer>,
    resolver: Arc<dyn AncestorResolver>,
    hooks: Vec<Arc<dyn AuthorizationHook>>,
    stop_at_existing_ancestor: bool,
    handler: H,
}

impl<H: OperationHandler> AuthorizingHandler<H> {
    /// Create a new builder for fluent configuration
    pub fn builder() -> AuthorizingHandlerBuilder<H> {
        AuthorizingHandlerBuilder::new()
    }

    /// The handler authorized operations are delegated to.
    pub fn inner(&self) -> &H {
        &self.handler
    }

    /// The configured modes strategy.
    pub fn modes_strategy(&self) -> &ModesStrategy {
        &self.modes
    }

    /// Run stages 1 to 5 for `operation`.
    ///
    /// On success the operation is returned together with the credentials
    /// and the resolved target permissions, ready to be delegated.
    pub async fn authorize(&self, request: &Parts, operation: Operation) -> Result<AuthorizedOperation> {
        let request_id = Uuid::new_v4();
        let target = operation.target.clone();

        match self.run_checks(request_id, request, operation).await {
            Ok(authorized) => Ok(authorized),
            Err((failed, err)) => {
                let failed = failed.unwrap_or(target);
                log::warn!("[{}] authorization failed on {}: {}", request_id, failed, err);
                self.emit(AuthorizationEvent::AuthorizationFailed {
                    request_id,
                    target: failed,
                    error: err.to_string(),
                });
                Err(err)
            }
        }
    }

    /// Run all stages and return the next handler's output unchanged.
    pub async fn handle(&self, request: &Parts, operation: Operation) -> Result<H::Output> {
        let authorized = self.authorize(request, operation).await?;

        log::debug!(
            "[{}] delegating {} {}",
            authorized.request_id,
            authorized.operation.method,
            authorized.operation.target
        );
        self.emit(AuthorizationEvent::Delegated {
            request_id: authorized.request_id,
            target: authorized.operation.target.clone(),
        });

        self.handler.handle(authorized).await
    }

    fn emit(&self, event: AuthorizationEvent) {
        for hook in &self.hooks {
            hook.on_event(&event);
        }
    }

    /// Stages 1 to 5. Errors carry the resource whose check failed when it
    /// is not the target.
    async fn run_checks(
        &self,
        request_id: Uuid,
        request: &Parts,
        operation: Operation,
    ) -> std::result::Result<AuthorizedOperation, (Option<ResourceIdentifier>, Error)> {
        let target = operation.target.clone();

        // ===== ExtractCredentials =====
        let credentials = self.credentials.extract_credentials(request).await;
        log::debug!(
            "[{}] credentials for {} {}: {:?}",
            request_id,
            operation.method,
            target,
            credentials.groups().collect::<Vec<_>>()
        );
        self.emit(AuthorizationEvent::CredentialsExtracted {
            request_id,
            groups: credentials.groups().collect(),
        });

        // ===== ExtractModes =====
        let modes = self
            .modes
            .extract_modes(&operation)
            .await
            .map_err(|err| (None, err))?;
        log::debug!("[{}] required modes on {}: {}", request_id, target, modes);
        self.emit(AuthorizationEvent::ModesExtracted {
            request_id,
            target: target.clone(),
            modes: modes.clone(),
        });

        // ===== ReadTargetPermissions =====
        let output = self
            .read(&credentials, &target, &modes, true)
            .await
            .map_err(|err| (None, err))?;
        self.emit(AuthorizationEvent::PermissionsRead {
            request_id,
            target: target.clone(),
            permissions: output.permissions.clone(),
            ancestor_count: output.ancestors().len(),
        });

        // ===== AuthorizeTarget =====
        self.check(&credentials, &target, &modes, &output, false)
            .await
            .map_err(|err| (None, err))?;
        log::debug!("[{}] {} authorized on {}", request_id, modes, target);
        self.emit(AuthorizationEvent::TargetAuthorized {
            request_id,
            target: target.clone(),
        });

        // ===== AncestorChain =====
        if modes.is_create_capable() {
            self.check_ancestors(request_id, &credentials, &target, output.ancestors())
                .await?;
        }

        Ok(AuthorizedOperation {
            request_id,
            operation,
            credentials,
            permissions: output.permissions,
        })
    }

    async fn check_ancestors(
        &self,
        request_id: Uuid,
        credentials: &CredentialSet,
        target: &ResourceIdentifier,
        reported: &[ResourceIdentifier],
    ) -> std::result::Result<(), (Option<ResourceIdentifier>, Error)> {
        let ancestors = self
            .resolver
            .resolve(target, reported)
            .await
            .map_err(|err| (None, err))?;
        if ancestors.is_empty() {
            return Ok(());
        }

        let modes = AccessModes::ancestor_creation();
        for ancestor in ancestors {
            let verdict = async {
                let output = self.read(credentials, &ancestor, &modes, false).await?;
                self.check(credentials, &ancestor, &modes, &output, true).await
            }
            .await
            .map_err(|err| (Some(ancestor.clone()), err))?;

            log::debug!("[{}] ancestor {}: {:?}", request_id, ancestor, verdict);
            self.emit(AuthorizationEvent::AncestorChecked {
                request_id,
                ancestor,
                verdict,
            });

            // Everything above an existing container exists as well.
            if verdict.is_skipped() && self.stop_at_existing_ancestor {
                break;
            }
        }

        Ok(())
    }

    async fn read(
        &self,
        credentials: &CredentialSet,
        target: &ResourceIdentifier,
        modes: &AccessModes,
        report_ancestors: bool,
    ) -> Result<PermissionReaderOutput> {
        self.reader
            .read_permissions(PermissionReaderInput {
                credentials,
                target,
                modes,
                report_ancestors,
            })
            .await
    }

    async fn check(
        &self,
        credentials: &CredentialSet,
        target: &ResourceIdentifier,
        modes: &AccessModes,
        output: &PermissionReaderOutput,
        only_if_target_missing: bool,
    ) -> Result<Verdict> {
        self.authorizer
            .authorize(AuthorizerInput {
                credentials,
                target,
                modes,
                permissions: &output.permissions,
                only_if_target_missing,
            })
            .await
    }
}
