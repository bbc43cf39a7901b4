//! Derivation of the access modes an operation requires.
//!
//! A deployment picks one [`ModesStrategy`] for all requests:
//!
//! | Method | Inline | Delegated ([`MethodModesExtractor`]) |
//! |--------|--------|--------------------------------------|
//! | GET, HEAD, OPTIONS | `read` | `read` |
//! | PUT | `append, write` | `append, write` (+ `create` if missing) |
//! | PATCH | `append` (+ `write` if the patch deletes) | same (+ `create` if missing) |
//! | POST | `append` | `append` |
//! | DELETE | `write` | `delete` |
//!
//! Any other method fails with [`Error::UnsupportedMethod`](crate::Error::UnsupportedMethod).

mod method;
pub mod patch;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::operation::Operation;
use crate::permission::AccessModes;

pub use method::{InlineModesExtractor, MethodModesExtractor};
pub use patch::{patch_deletes, PatchLanguage};

/// Maps an operation to the access modes it requires on its target.
#[async_trait]
pub trait ModesExtractor: Send + Sync {
    async fn extract_modes(&self, operation: &Operation) -> Result<AccessModes>;
}

/// How the authorizing handler derives required modes.
#[derive(Clone, Default)]
pub enum ModesStrategy {
    /// Fixed method table, no store lookups
    #[default]
    Inline,
    /// An injected extractor owns the mapping
    Delegated(Arc<dyn ModesExtractor>),
}

impl ModesStrategy {
    /// Use `extractor` for every request.
    pub fn delegated(extractor: impl ModesExtractor + 'static) -> Self {
        Self::Delegated(Arc::new(extractor))
    }

    /// Required modes for `operation` under this strategy.
    pub async fn extract_modes(&self, operation: &Operation) -> Result<AccessModes> {
        match self {
            Self::Inline => InlineModesExtractor.extract_modes(operation).await,
            Self::Delegated(extractor) => extractor.extract_modes(operation).await,
        }
    }

    /// Short name used in logs and configuration.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::Delegated(_) => "delegated",
        }
    }
}

impl std::fmt::Debug for ModesStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
