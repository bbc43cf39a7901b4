//! Router builder for podgate HTTP endpoints.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
    Router,
};
use podgate_core::{
    AuthorizingHandler, Operation, OperationHandler, SingleRootIdentifierStrategy,
};
use tower_http::cors::CorsLayer;

use crate::error::{BuildError, ServerError, ServerResult};
use crate::state::AppState;

/// Default limit for request bodies (patch documents and uploads).
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Builder for an axum router that authorizes every request.
///
/// All paths are routed to the authorizing handler. Each request becomes an
/// [`Operation`] whose target is the base URL joined with the request path.
///
/// # Example
///
/// ```rust,no_run
/// use podgate_server::PodRouter;
/// use podgate_core::{AuthorizingHandler, OperationHandler};
///
/// # async fn example<H>(handler: AuthorizingHandler<H>) -> Result<(), Box<dyn std::error::Error>>
/// # where H: OperationHandler + 'static, H::Output: axum::response::IntoResponse {
/// let app = PodRouter::new(handler, "http://localhost:3000/").build()?;
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```
pub struct PodRouter<H> {
    handler: Arc<AuthorizingHandler<H>>,
    base_url: String,
    body_limit: usize,
    cors: Option<CorsLayer>,
}

impl<H> PodRouter<H>
where
    H: OperationHandler + 'static,
    H::Output: IntoResponse,
{
    /// Create a new router builder for the given handler and base URL.
    pub fn new(handler: AuthorizingHandler<H>, base_url: impl Into<String>) -> Self {
        Self::from_arc(Arc::new(handler), base_url)
    }

    /// Create a new router builder from an existing `Arc<AuthorizingHandler>`.
    pub fn from_arc(handler: Arc<AuthorizingHandler<H>>, base_url: impl Into<String>) -> Self {
        Self {
            handler,
            base_url: base_url.into(),
            body_limit: DEFAULT_BODY_LIMIT,
            cors: None,
        }
    }

    /// Set the largest accepted request body in bytes.
    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    /// Answer cross-origin requests with the given CORS policy.
    pub fn with_cors(mut self, cors: CorsLayer) -> Self {
        self.cors = Some(cors);
        self
    }

    /// Build the router.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidBaseUrl`] if the base URL is not an
    /// absolute URL.
    pub fn build(self) -> Result<Router, BuildError> {
        let root = SingleRootIdentifierStrategy::new(&self.base_url)?;
        let state = AppState {
            handler: self.handler,
            base_url: Arc::from(root.base_url()),
            body_limit: self.body_limit,
        };

        let router = Router::new().fallback(pod_handler::<H>).with_state(state);
        Ok(match self.cors {
            Some(cors) => router.layer(cors),
            None => router,
        })
    }
}

/// Turns a request into an operation and runs it through the handler.
async fn pod_handler<H>(State(state): State<AppState<H>>, request: Request) -> ServerResult<Response>
where
    H: OperationHandler + 'static,
    H::Output: IntoResponse,
{
    let (parts, body) = request.into_parts();
    let operation = to_operation(&state, &parts, body).await?;

    let output = state.handler.handle(&parts, operation).await?;
    Ok(output.into_response())
}

async fn to_operation<H>(
    state: &AppState<H>,
    parts: &axum::http::request::Parts,
    body: Body,
) -> ServerResult<Operation> {
    let target = state.target_for(parts.uri.path());
    let mut operation = Operation::new(parts.method.clone(), target);

    let bytes = axum::body::to_bytes(body, state.body_limit)
        .await
        .map_err(|e| ServerError::InvalidRequest(format!("unreadable body: {}", e)))?;
    if !bytes.is_empty() {
        let body = String::from_utf8(bytes.to_vec())
            .map_err(|_| ServerError::InvalidRequest("body is not UTF-8".to_string()))?;
        let content_type = parts
            .headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("application/octet-stream");
        operation = operation.with_body(content_type, body);
    }

    Ok(operation)
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
