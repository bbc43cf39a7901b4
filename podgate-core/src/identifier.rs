//! Resource identifiers and the container hierarchy.
//!
//! A [`ResourceIdentifier`] is the full URL of a resource. Identifiers ending
//! in `/` denote containers. An [`IdentifierStrategy`] knows where the
//! namespace root is and how to compute the container holding a resource.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Error;

/// Identifies a resource or container in the namespace.
///
/// Two identifiers are equal iff their paths are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceIdentifier {
    path: String,
}

impl ResourceIdentifier {
    /// Create an identifier from a full resource URL.
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// The full URL of the resource.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether this identifier denotes a container.
    pub fn is_container(&self) -> bool {
        self.path.ends_with('/')
    }
}

impl std::fmt::Display for ResourceIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path)
    }
}

impl From<&str> for ResourceIdentifier {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for ResourceIdentifier {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}

/// Knows the shape of the identifier namespace.
pub trait IdentifierStrategy: Send + Sync {
    /// Whether the identifier belongs to the namespace handled by this strategy.
    fn supports_identifier(&self, identifier: &ResourceIdentifier) -> bool;

    /// Whether the identifier is a root container.
    fn is_root(&self, identifier: &ResourceIdentifier) -> bool;

    /// The container holding `identifier`.
    ///
    /// The root is its own parent, so repeatedly asking for parents always
    /// ends at a fixed point.
    fn parent_container(&self, identifier: &ResourceIdentifier) -> ResourceIdentifier;
}

/// An identifier strategy with exactly one root, the base URL of the server.
#[derive(Debug, Clone)]
pub struct SingleRootIdentifierStrategy {
    base_url: String,
}

impl SingleRootIdentifierStrategy {
    /// Create a strategy rooted at `base_url`.
    ///
    /// The base URL must be an absolute URL. A trailing slash is added when
    /// missing since the root is always a container.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, Error> {
        let parsed = Url::parse(base_url.as_ref())
            .map_err(|e| Error::Config(format!("invalid base URL '{}': {}", base_url.as_ref(), e)))?;
        if parsed.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "base URL '{}' cannot contain resources",
                parsed
            )));
        }

        let mut base_url = parsed.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Ok(Self { base_url })
    }

    /// The root container.
    pub fn root(&self) -> ResourceIdentifier {
        ResourceIdentifier::new(self.base_url.clone())
    }

    /// The base URL, always ending in `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl IdentifierStrategy for SingleRootIdentifierStrategy {
    fn supports_identifier(&self, identifier: &ResourceIdentifier) -> bool {
        identifier.path().starts_with(&self.base_url)
    }

    fn is_root(&self, identifier: &ResourceIdentifier) -> bool {
        identifier.path() == self.base_url
    }

    fn parent_container(&self, identifier: &ResourceIdentifier) -> ResourceIdentifier {
        if self.is_root(identifier) || !self.supports_identifier(identifier) {
            return self.root();
        }

        // Drop the trailing slash of containers, then cut after the last slash.
        let path = identifier.path();
        let trimmed = path.strip_suffix('/').unwrap_or(path);
        match trimmed.rfind('/') {
            Some(index) if index + 1 >= self.base_url.len() => {
                ResourceIdentifier::new(&trimmed[..=index])
            }
            _ => self.root(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strategy() -> SingleRootIdentifierStrategy {
        SingleRootIdentifierStrategy::new("http://localhost:3000/").unwrap()
    }

    #[test]
    fn test_new_adds_trailing_slash() {
        let strategy = SingleRootIdentifierStrategy::new("http://localhost:3000/pods").unwrap();
        assert_eq!(strategy.base_url(), "http://localhost:3000/pods/");
    }

    #[test]
    fn test_new_rejects_relative_url() {
        let err = SingleRootIdentifierStrategy::new("/just/a/path").unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_container_detection() {
        assert!(ResourceIdentifier::new("http://localhost:3000/a/").is_container());
        assert!(!ResourceIdentifier::new("http://localhost:3000/a/b").is_container());
    }

    #[test]
    fn test_supports_identifier() {
        let strategy = strategy();
        assert!(strategy.supports_identifier(&"http://localhost:3000/a/b".into()));
        assert!(!strategy.supports_identifier(&"http://example.com/a/b".into()));
    }

    #[test]
    fn test_parent_container() {
        let strategy = strategy();
        let cases = [
            ("http://localhost:3000/a/b/c", "http://localhost:3000/a/b/"),
            ("http://localhost:3000/a/b/", "http://localhost:3000/a/"),
            ("http://localhost:3000/a/", "http://localhost:3000/"),
            ("http://localhost:3000/file.ttl", "http://localhost:3000/"),
        ];

        for (child, parent) in cases {
            assert_eq!(
                strategy.parent_container(&child.into()),
                ResourceIdentifier::new(parent),
                "parent of {}",
                child
            );
        }
    }

    #[test]
    fn test_root_is_its_own_parent() {
        let strategy = strategy();
        let root = strategy.root();
        assert!(strategy.is_root(&root));
        assert_eq!(strategy.parent_container(&root), root);
    }

    #[test]
    fn test_foreign_identifier_resolves_to_root() {
        let strategy = strategy();
        let parent = strategy.parent_container(&"http://example.com/a/b".into());
        assert_eq!(parent, strategy.root());
    }

    #[test]
    fn test_nested_base_url() {
        let strategy = SingleRootIdentifierStrategy::new("http://localhost:3000/pods/").unwrap();
        assert_eq!(
            strategy.parent_container(&"http://localhost:3000/pods/alice/".into()),
            strategy.root()
        );
        assert_eq!(
            strategy.parent_container(&"http://localhost:3000/pods/alice/notes".into()),
            ResourceIdentifier::new("http://localhost:3000/pods/alice/")
        );
    }
}
