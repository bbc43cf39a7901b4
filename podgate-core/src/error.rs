//! Top-level error types for podgate
//!
//! Authorization failures are split from infrastructure failures so callers
//! can tell "the requester may not do this" apart from "we could not decide".
//!
//! - [`Error::Authorization`] - The requester was denied; resubmit with other credentials
//! - [`Error::Store`] - The resource store could not answer an existence query
//! - [`Error::UnsupportedMethod`] - No access modes are known for the request method
//! - [`Error::Config`] - Fix the configuration (empty union, bad regex, bad base URL)
//! - [`Error::Handler`] - The downstream handler failed after authorization succeeded

use thiserror::Error;

use crate::identifier::ResourceIdentifier;
use crate::permission::AccessMode;
use crate::store::StoreError;

/// A denial issued by the decision engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    /// The requester holds no authenticated credentials and the mode is not
    /// available to the public.
    #[error("authentication required for {mode} on {target}")]
    Unauthenticated {
        /// Resource the check was made for
        target: ResourceIdentifier,
        /// First required mode that was not granted
        mode: AccessMode,
    },

    /// The requester is authenticated but lacks the mode.
    #[error("{mode} not permitted on {target}")]
    Forbidden {
        /// Resource the check was made for
        target: ResourceIdentifier,
        /// First required mode that was not granted
        mode: AccessMode,
    },
}

impl AuthorizationError {
    /// The resource whose check failed.
    pub fn target(&self) -> &ResourceIdentifier {
        match self {
            Self::Unauthenticated { target, .. } | Self::Forbidden { target, .. } => target,
        }
    }

    /// The mode that was not granted.
    pub fn mode(&self) -> AccessMode {
        match self {
            Self::Unauthenticated { mode, .. } | Self::Forbidden { mode, .. } => *mode,
        }
    }

    /// Returns true if the requester should authenticate and try again
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated { .. })
    }
}

/// Top-level error type for podgate operations
#[derive(Debug, Error)]
pub enum Error {
    /// The decision engine denied the target or a required ancestor
    #[error("authorization denied: {0}")]
    Authorization(#[from] AuthorizationError),

    /// The resource store failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The request method has no access mode mapping
    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),

    /// Configuration error (empty source list, invalid regex, bad base URL)
    #[error("configuration error: {0}")]
    Config(String),

    /// Downstream handler error
    #[error("handler error: {0}")]
    Handler(String),
}

impl Error {
    /// Returns true if this is an authorization denial
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Authorization(_))
    }

    /// Returns true if this is a store error
    pub fn is_store(&self) -> bool {
        matches!(self, Self::Store(_))
    }

    /// Returns true if this is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Returns the denial, if this is one
    pub fn as_denial(&self) -> Option<&AuthorizationError> {
        match self {
            Self::Authorization(denial) => Some(denial),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type for podgate operations
pub type Result<T> = std::result::Result<T, Error>;
