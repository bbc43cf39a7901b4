//! AuthorizingHandlerBuilder for fluent handler construction
//!
//! Components set explicitly take precedence over those derived from an
//! [`AuthorizationConfig`]. Anything left unset falls back to a default:
//! public credentials, the inline modes table, reported ancestors and a
//! [`PermissionBasedAuthorizer`] over the configured store.

use std::sync::Arc;

use crate::ancestry::{AncestorResolver, ReportedAncestors};
use crate::authorizer::{Authorizer, PermissionBasedAuthorizer};
use crate::config::AuthorizationConfig;
use crate::credentials::{CredentialsExtractor, PublicCredentialsExtractor};
use crate::error::{Error, Result};
use crate::events::AuthorizationHook;
use crate::modes::ModesStrategy;
use crate::operation::OperationHandler;
use crate::permission::PermissionReader;
use crate::store::ResourceSet;

use super::AuthorizingHandler;

/// Builder for creating an [`AuthorizingHandler`]
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use podgate_core::config::{AuthorizationConfig, SourceConfig};
/// use podgate_core::operation::{AuthorizedOperation, OperationHandler};
/// use podgate_core::store::MemoryResourceSet;
/// use podgate_core::AuthorizingHandler;
///
/// struct Echo;
///
/// #[async_trait::async_trait]
/// impl OperationHandler for Echo {
///     type Output = String;
///
///     async fn handle(&self, input: AuthorizedOperation) -> podgate_core::Result<String> {
///         Ok(input.operation.target.to_string())
///     }
/// }
///
/// let config = AuthorizationConfig::new("http://localhost:3000/")
///     .with_source(SourceConfig::AllStatic { allow: true });
///
/// let handler = AuthorizingHandler::builder()
///     .with_config(config)
///     .with_store(Arc::new(MemoryResourceSet::new()))
///     .with_handler(Echo)
///     .build()
///     .unwrap();
/// assert_eq!(handler.modes_strategy().name(), "inline");
/// ```
pub struct AuthorizingHandlerBuilder<H> {
    credentials: Option<Arc<dyn CredentialsExtractor>>,
    modes: Option<ModesStrategy>,
    reader: Option<Arc<dyn PermissionReader>>,
    authorizer: Option<Arc<dyn Authorizer>>,
    resolver: Option<Arc<dyn AncestorResolver>>,
    store: Option<Arc<dyn ResourceSet>>,
    config: Option<AuthorizationConfig>,
    hooks: Vec<Arc<dyn AuthorizationHook>>,
    stop_at_existing_ancestor: Option<bool>,
    handler: Option<H>,
}

impl<H: OperationHandler> Default for AuthorizingHandlerBuilder<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: OperationHandler> AuthorizingHandlerBuilder<H> {
    pub fn new() -> Self {
        Self {
            credentials: None,
            modes: None,
            reader: None,
            authorizer: None,
            resolver: None,
            store: None,
            config: None,
            hooks: Vec::new(),
            stop_at_existing_ancestor: None,
            handler: None,
        }
    }

    /// Set the credentials extractor (default: everyone is public)
    pub fn with_credentials_extractor(
        mut self,
        extractor: impl CredentialsExtractor + 'static,
    ) -> Self {
        self.credentials = Some(Arc::new(extractor));
        self
    }

    /// Set the modes strategy (default: inline table)
    pub fn with_modes_strategy(mut self, modes: ModesStrategy) -> Self {
        self.modes = Some(modes);
        self
    }

    /// Set the permission source
    pub fn with_reader(self, reader: impl PermissionReader + 'static) -> Self {
        self.with_shared_reader(Arc::new(reader))
    }

    /// Set an already shared permission source
    pub fn with_shared_reader(mut self, reader: Arc<dyn PermissionReader>) -> Self {
        self.reader = Some(reader);
        self
    }

    /// Set the decision engine (default: [`PermissionBasedAuthorizer`] over the store)
    pub fn with_authorizer(mut self, authorizer: impl Authorizer + 'static) -> Self {
        self.authorizer = Some(Arc::new(authorizer));
        self
    }

    /// Set the ancestor resolution strategy (default: [`ReportedAncestors`])
    pub fn with_ancestor_resolver(mut self, resolver: impl AncestorResolver + 'static) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    /// Set the resource store used by config-derived components
    pub fn with_store(mut self, store: Arc<dyn ResourceSet>) -> Self {
        self.store = Some(store);
        self
    }

    /// Derive unset components from a configuration
    pub fn with_config(mut self, config: AuthorizationConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Register an event hook
    pub fn with_hook(mut self, hook: impl AuthorizationHook + 'static) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    /// Stop the ancestor chain at the first existing ancestor (default: true)
    pub fn with_stop_at_existing_ancestor(mut self, stop: bool) -> Self {
        self.stop_at_existing_ancestor = Some(stop);
        self
    }

    /// Set the handler authorized operations are delegated to
    pub fn with_handler(mut self, handler: H) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Build the handler
    pub fn build(self) -> Result<AuthorizingHandler<H>> {
        let handler = self.handler.ok_or_else(|| {
            Error::Config("No handler configured. Call .with_handler() before .build()".to_string())
        })?;

        let store = self.store;
        let config = self.config;
        let require_store = |what: &str| {
            store.clone().ok_or_else(|| {
                Error::Config(format!("{} requires a store. Call .with_store()", what))
            })
        };

        let reader = match (self.reader, &config) {
            (Some(reader), _) => reader,
            (None, Some(config)) => config.build_reader(require_store("a configured reader")?)?,
            (None, None) => {
                return Err(Error::Config(
                    "No permission reader configured. Call .with_reader() or .with_config()"
                        .to_string(),
                ))
            }
        };

        let modes = match (self.modes, &config) {
            (Some(modes), _) => modes,
            (None, Some(config)) => config.build_modes(require_store("a configured modes strategy")?),
            (None, None) => ModesStrategy::Inline,
        };

        let resolver = match (self.resolver, &config) {
            (Some(resolver), _) => resolver,
            (None, Some(config)) => {
                config.build_resolver(require_store("a configured ancestor resolver")?)?
            }
            (None, None) => Arc::new(ReportedAncestors),
        };

        let authorizer = match self.authorizer {
            Some(authorizer) => authorizer,
            None => Arc::new(PermissionBasedAuthorizer::new(require_store(
                "the default authorizer",
            )?)),
        };

        let stop_at_existing_ancestor = self
            .stop_at_existing_ancestor
            .or_else(|| config.as_ref().map(|c| c.stop_at_existing_ancestor))
            .unwrap_or(true);

        log::debug!(
            "built authorizing handler (modes: {}, hooks: {}, stop at existing ancestor: {})",
            modes.name(),
            self.hooks.len(),
            stop_at_existing_ancestor
        );

        Ok(AuthorizingHandler {
            credentials: self
                .credentials
                .unwrap_or_else(|| Arc::new(PublicCredentialsExtractor)),
            modes,
            reader,
            authorizer,
            resolver,
            hooks: self.hooks,
            stop_at_existing_ancestor,
            handler,
        })
    }
}
