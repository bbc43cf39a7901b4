//! Operations and the handlers they are delegated to.

use async_trait::async_trait;
use http::Method;
use uuid::Uuid;

use crate::credentials::CredentialSet;
use crate::error::Result;
use crate::identifier::ResourceIdentifier;
use crate::permission::PermissionSet;

/// A parsed request against one target resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Request method
    pub method: Method,
    /// Resource the request acts on
    pub target: ResourceIdentifier,
    /// Media type of the body, if any
    pub content_type: Option<String>,
    /// Request body, if any
    pub body: Option<String>,
}

impl Operation {
    /// Create an operation without a body.
    pub fn new(method: Method, target: impl Into<ResourceIdentifier>) -> Self {
        Self {
            method,
            target: target.into(),
            content_type: None,
            body: None,
        }
    }

    /// Attach a body and its media type.
    pub fn with_body(mut self, content_type: impl Into<String>, body: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self.body = Some(body.into());
        self
    }

    /// The media type without parameters, lowercased.
    pub fn media_type(&self) -> Option<String> {
        self.content_type.as_deref().map(|value| {
            value
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase()
        })
    }
}

/// An operation that passed authorization.
///
/// Carries the resolved permissions of the target so downstream handlers can
/// use them, for example to decide which headers to disclose.
#[derive(Debug, Clone)]
pub struct AuthorizedOperation {
    /// Identifier correlating events and log lines of this request
    pub request_id: Uuid,
    /// The operation itself
    pub operation: Operation,
    /// Credentials the request was authorized with
    pub credentials: CredentialSet,
    /// Permissions resolved for the target
    pub permissions: PermissionSet,
}

/// The next handler in the pipeline, invoked once authorization succeeds.
#[async_trait]
pub trait OperationHandler: Send + Sync {
    /// What the handler produces, typically a response.
    type Output: Send;

    /// Handle an authorized operation.
    async fn handle(&self, input: AuthorizedOperation) -> Result<Self::Output>;
}
