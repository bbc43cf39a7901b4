//! Routes permission lookups by target path.

use async_trait::async_trait;
use regex::Regex;
use std::sync::Arc;

use super::reader::{PermissionReader, PermissionReaderInput, PermissionReaderOutput};
use crate::error::Result;
use crate::identifier::SingleRootIdentifierStrategy;

/// Sends each lookup to the first source whose pattern matches the target
/// path.
///
/// Patterns are matched against the path relative to the base URL, with a
/// leading slash (`/admin/users`). A target outside the base URL, or one no
/// pattern matches, yields an empty output.
///
/// # Example
///
/// ```rust
/// use podgate_core::permission::{AllStaticReader, PathBasedReader};
///
/// let reader = PathBasedReader::new("http://localhost:3000/")
///     .unwrap()
///     .with_path("^/public/", AllStaticReader::new(true))
///     .unwrap()
///     .with_path("^/", AllStaticReader::new(false))
///     .unwrap();
/// assert_eq!(reader.len(), 2);
/// ```
#[derive(Clone)]
pub struct PathBasedReader {
    base: SingleRootIdentifierStrategy,
    paths: Vec<(Regex, Arc<dyn PermissionReader>)>,
}

impl std::fmt::Debug for PathBasedReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let patterns: Vec<&str> = self.paths.iter().map(|(re, _)| re.as_str()).collect();
        f.debug_struct("PathBasedReader")
            .field("base_url", &self.base.base_url())
            .field("paths", &patterns)
            .finish()
    }
}

impl PathBasedReader {
    /// Create a reader without routes for the given base URL.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            base: SingleRootIdentifierStrategy::new(base_url)?,
            paths: Vec::new(),
        })
    }

    /// Add a route. Earlier routes take precedence.
    pub fn with_path(self, pattern: &str, reader: impl PermissionReader + 'static) -> Result<Self> {
        self.with_shared_path(pattern, Arc::new(reader))
    }

    /// Add a route to an already shared reader.
    pub fn with_shared_path(
        mut self,
        pattern: &str,
        reader: Arc<dyn PermissionReader>,
    ) -> Result<Self> {
        self.paths.push((Regex::new(pattern)?, reader));
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    fn relative_path<'a>(&self, path: &'a str) -> Option<&'a str> {
        let base = self.base.base_url();
        // Keep the slash that ends the base URL as the leading slash.
        path.starts_with(base).then(|| &path[base.len() - 1..])
    }
}

#[async_trait]
impl PermissionReader for PathBasedReader {
    async fn read_permissions(
        &self,
        input: PermissionReaderInput<'_>,
    ) -> Result<PermissionReaderOutput> {
        let Some(path) = self.relative_path(input.target.path()) else {
            return Ok(PermissionReaderOutput::default());
        };

        match self.paths.iter().find(|(re, _)| re.is_match(path)) {
            Some((re, reader)) => {
                log::trace!("{} matched path pattern {}", input.target, re.as_str());
                reader.read_permissions(input).await
            }
            None => Ok(PermissionReaderOutput::default()),
        }
    }
}
