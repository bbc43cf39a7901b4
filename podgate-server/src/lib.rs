//! HTTP integration for the podgate authorization layer.
//!
//! Every request reaching the router is converted into an operation on the
//! resource at the request path and run through an
//! [`AuthorizingHandler`](podgate_core::AuthorizingHandler). Denials are
//! rendered as JSON errors:
//!
//! | Failure | Status |
//! |---------|--------|
//! | Authentication required | 401 |
//! | Authenticated but not permitted | 403 |
//! | Method without access mode mapping | 405 |
//! | Store, configuration or handler failure | 500 |
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use podgate_core::operation::{AuthorizedOperation, OperationHandler};
//! use podgate_core::{load_config_file, AuthorizingHandler, MemoryResourceSet};
//! use podgate_server::PodRouter;
//!
//! struct Ok200;
//!
//! #[async_trait::async_trait]
//! impl OperationHandler for Ok200 {
//!     type Output = &'static str;
//!
//!     async fn handle(&self, _input: AuthorizedOperation) -> podgate_core::Result<&'static str> {
//!         Ok("ok")
//!     }
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config_file("podgate.json").await?;
//! let base_url = config.base_url.clone();
//!
//! let handler = AuthorizingHandler::builder()
//!     .with_config(config)
//!     .with_store(Arc::new(MemoryResourceSet::new()))
//!     .with_handler(Ok200)
//!     .build()?;
//!
//! let app = PodRouter::new(handler, base_url).build()?;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod router;
pub(crate) mod state;

// Re-exports
pub use error::{BuildError, ServerError, ServerResult};
pub use router::{PodRouter, DEFAULT_BODY_LIMIT};
