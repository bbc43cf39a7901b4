//! # Podgate
//!
//! Authorization layer for resource servers with a hierarchical namespace.
//!
//! Permissions are held by credential groups (`public`, `agent`, `client`)
//! rather than by identities. Before an operation touches storage, podgate
//! decides whether the requester may perform the required access modes on
//! the target and, when the operation would implicitly create containers,
//! whether it may create each missing one.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use http::Method;
//! use podgate_core::operation::{AuthorizedOperation, Operation, OperationHandler};
//! use podgate_core::permission::AllStaticReader;
//! use podgate_core::store::MemoryResourceSet;
//! use podgate_core::AuthorizingHandler;
//!
//! struct Store;
//!
//! #[async_trait::async_trait]
//! impl OperationHandler for Store {
//!     type Output = &'static str;
//!
//!     async fn handle(&self, _input: AuthorizedOperation) -> podgate_core::Result<&'static str> {
//!         Ok("stored")
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let handler = AuthorizingHandler::builder()
//!     .with_reader(AllStaticReader::new(true))
//!     .with_store(Arc::new(MemoryResourceSet::new()))
//!     .with_handler(Store)
//!     .build()
//!     .unwrap();
//!
//! let (request, _) = http::Request::new(()).into_parts();
//! let operation = Operation::new(Method::PUT, "http://localhost:3000/notes/today");
//! assert_eq!(handler.handle(&request, operation).await.unwrap(), "stored");
//! # });
//! ```
//!
//! ## Composing Permission Sources
//!
//! Sources implement [`PermissionReader`](permission::PermissionReader) and
//! are merged with [`UnionPermissionReader`](permission::UnionPermissionReader):
//! an explicit denial from any source beats a grant from any other, and a
//! grant beats no opinion. See the [`permission`] module.
//!
//! ## Observing Decisions
//!
//! Register an [`AuthorizationHook`] (or a closure) on the builder to
//! receive an [`AuthorizationEvent`] for every stage of every request.

pub mod ancestry;
pub mod authorizer;
pub mod config;
pub mod credentials;
pub mod error;
pub mod events;
pub mod handler;
pub mod identifier;
pub mod modes;
pub mod operation;
pub mod permission;
pub mod store;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ancestry::{AncestorResolver, ParentWalk, ReportedAncestors};
pub use authorizer::{Authorizer, AuthorizerInput, PermissionBasedAuthorizer, Verdict};
pub use config::{load_config_file, AuthorizationConfig, SourceConfig};
pub use credentials::{Credential, CredentialGroup, CredentialSet, CredentialsExtractor};
pub use error::{AuthorizationError, Error, Result};
pub use events::{AuthorizationEvent, AuthorizationHook};
pub use handler::{AuthorizingHandler, AuthorizingHandlerBuilder};
pub use identifier::{IdentifierStrategy, ResourceIdentifier, SingleRootIdentifierStrategy};
pub use modes::{ModesExtractor, ModesStrategy};
pub use operation::{AuthorizedOperation, Operation, OperationHandler};

// Permission model
pub use permission::{
    AccessMode, AccessModes, Permission, PermissionReader, PermissionReaderInput,
    PermissionReaderOutput, PermissionSet,
};
pub use store::{MemoryResourceSet, ResourceSet, StoreError};
