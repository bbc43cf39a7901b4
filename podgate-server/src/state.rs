//! Application state for the podgate server.

use std::sync::Arc;

use podgate_core::AuthorizingHandler;

/// Shared application state containing the authorizing handler.
///
/// Cloned for each request; the handler itself is shared.
pub struct AppState<H> {
    /// The shared authorizing handler.
    pub handler: Arc<AuthorizingHandler<H>>,
    /// Base URL targets are resolved against, always ending in `/`.
    pub base_url: Arc<str>,
    /// Largest accepted request body in bytes.
    pub body_limit: usize,
}

impl<H> Clone for AppState<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            base_url: Arc::clone(&self.base_url),
            body_limit: self.body_limit,
        }
    }
}

impl<H> AppState<H> {
    /// The identifier of the resource at `path`.
    pub fn target_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }
}
