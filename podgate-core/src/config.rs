//! Deployment configuration.
//!
//! An [`AuthorizationConfig`] describes which permission sources a server
//! uses and which strategies the authorizing handler follows. It is usually
//! loaded from a JSON file:
//!
//! ```json
//! {
//!   "baseUrl": "http://localhost:3000/",
//!   "modes": "delegated",
//!   "ancestors": "reported",
//!   "sources": [
//!     { "type": "ancestors", "source": {
//!       "type": "pathBased", "paths": [
//!         { "pattern": "^/public/", "source": { "type": "allStatic", "allow": true } }
//!       ]
//!     } },
//!     { "type": "allStatic", "allow": false }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::ancestry::{AncestorResolver, ParentWalk, ReportedAncestors};
use crate::error::{Error, Result};
use crate::identifier::SingleRootIdentifierStrategy;
use crate::modes::{MethodModesExtractor, ModesStrategy};
use crate::permission::{
    AllStaticReader, AncestorReportingReader, PathBasedReader, PermissionReader,
    UnionPermissionReader,
};
use crate::store::ResourceSet;

/// Which modes strategy the handler uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModesKind {
    /// Fixed method table
    #[default]
    Inline,
    /// Store-aware [`MethodModesExtractor`]
    Delegated,
}

/// Which ancestor resolution strategy the handler uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AncestorKind {
    /// Ancestor list reported by the permission sources
    #[default]
    Reported,
    /// Walk parent containers against the store
    ParentWalk,
}

/// One route of a path-based source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathRule {
    /// Regex matched against the target path relative to the base URL
    pub pattern: String,
    pub source: SourceConfig,
}

/// A permission source and, for composite sources, its children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SourceConfig {
    /// Grants or denies every mode to every group present
    AllStatic { allow: bool },
    /// Routes by target path, first matching rule wins
    PathBased { paths: Vec<PathRule> },
    /// Merges several sources, denial wins
    Union { sources: Vec<SourceConfig> },
    /// Reports the container chain of missing targets
    Ancestors { source: Box<SourceConfig> },
}

impl SourceConfig {
    fn build(
        &self,
        base: &Arc<SingleRootIdentifierStrategy>,
        store: &Arc<dyn ResourceSet>,
    ) -> Result<Arc<dyn PermissionReader>> {
        let reader: Arc<dyn PermissionReader> = match self {
            Self::AllStatic { allow } => Arc::new(AllStaticReader::new(*allow)),
            Self::PathBased { paths } => {
                let mut reader = PathBasedReader::new(base.base_url())?;
                for rule in paths {
                    reader = reader.with_shared_path(&rule.pattern, rule.source.build(base, store)?)?;
                }
                Arc::new(reader)
            }
            Self::Union { sources } => Arc::new(UnionPermissionReader::new(
                sources
                    .iter()
                    .map(|source| source.build(base, store))
                    .collect::<Result<Vec<_>>>()?,
            )?),
            Self::Ancestors { source } => Arc::new(AncestorReportingReader::new(
                source.build(base, store)?,
                base.clone(),
                Arc::clone(store),
            )),
        };
        Ok(reader)
    }
}

fn default_stop_at_existing_ancestor() -> bool {
    true
}

/// Configuration of an authorizing handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationConfig {
    /// Base URL of the server, the namespace root
    pub base_url: String,
    #[serde(default)]
    pub modes: ModesKind,
    #[serde(default)]
    pub ancestors: AncestorKind,
    /// Stop checking ancestors once one exists
    #[serde(default = "default_stop_at_existing_ancestor")]
    pub stop_at_existing_ancestor: bool,
    /// Permission sources, merged in order
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

impl AuthorizationConfig {
    /// Configuration with default strategies and no sources.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            modes: ModesKind::default(),
            ancestors: AncestorKind::default(),
            stop_at_existing_ancestor: default_stop_at_existing_ancestor(),
            sources: Vec::new(),
        }
    }

    pub fn with_modes(mut self, modes: ModesKind) -> Self {
        self.modes = modes;
        self
    }

    pub fn with_ancestors(mut self, ancestors: AncestorKind) -> Self {
        self.ancestors = ancestors;
        self
    }

    pub fn with_stop_at_existing_ancestor(mut self, stop: bool) -> Self {
        self.stop_at_existing_ancestor = stop;
        self
    }

    pub fn with_source(mut self, source: SourceConfig) -> Self {
        self.sources.push(source);
        self
    }

    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The identifier strategy rooted at the base URL.
    pub fn identifier_strategy(&self) -> Result<Arc<SingleRootIdentifierStrategy>> {
        Ok(Arc::new(SingleRootIdentifierStrategy::new(&self.base_url)?))
    }

    /// Build the permission reader described by `sources`.
    ///
    /// A single source is used as-is; several are wrapped in a union.
    pub fn build_reader(&self, store: Arc<dyn ResourceSet>) -> Result<Arc<dyn PermissionReader>> {
        let base = self.identifier_strategy()?;
        match self.sources.as_slice() {
            [] => Err(Error::Config(
                "at least one permission source must be configured".to_string(),
            )),
            [single] => single.build(&base, &store),
            sources => {
                let readers = sources
                    .iter()
                    .map(|source| source.build(&base, &store))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Arc::new(UnionPermissionReader::new(readers)?))
            }
        }
    }

    /// Build the configured modes strategy.
    pub fn build_modes(&self, store: Arc<dyn ResourceSet>) -> ModesStrategy {
        match self.modes {
            ModesKind::Inline => ModesStrategy::Inline,
            ModesKind::Delegated => ModesStrategy::delegated(MethodModesExtractor::new(store)),
        }
    }

    /// Build the configured ancestor resolver.
    pub fn build_resolver(&self, store: Arc<dyn ResourceSet>) -> Result<Arc<dyn AncestorResolver>> {
        let resolver: Arc<dyn AncestorResolver> = match self.ancestors {
            AncestorKind::Reported => Arc::new(ReportedAncestors),
            AncestorKind::ParentWalk => {
                Arc::new(ParentWalk::new(self.identifier_strategy()?, store))
            }
        };
        Ok(resolver)
    }
}

/// Load an [`AuthorizationConfig`] from a JSON file.
pub async fn load_config_file(path: impl AsRef<Path>) -> Result<AuthorizationConfig> {
    let content = tokio::fs::read_to_string(path.as_ref()).await?;
    let config = AuthorizationConfig::from_json(&content)?;
    log::debug!(
        "loaded authorization config from {} ({} sources)",
        path.as_ref().display(),
        config.sources.len()
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::CredentialSet;
    use crate::identifier::ResourceIdentifier;
    use crate::permission::{AccessMode, AccessModes, PermissionReaderInput};
    use crate::store::MemoryResourceSet;
    use std::io::Write;

    const CONFIG: &str = r#"{
        "baseUrl": "http://localhost:3000/",
        "modes": "delegated",
        "ancestors": "parentWalk",
        "sources": [
            { "type": "ancestors", "source": {
                "type": "pathBased", "paths": [
                    { "pattern": "^/public/", "source": { "type": "allStatic", "allow": true } }
                ]
            } },
            { "type": "union", "sources": [ { "type": "allStatic", "allow": true } ] }
        ]
    }"#;

    fn store() -> Arc<dyn ResourceSet> {
        Arc::new(MemoryResourceSet::with_resources(["http://localhost:3000/"]))
    }

    async fn allows_read(reader: &dyn PermissionReader, target: &str) -> (bool, usize) {
        let credentials = CredentialSet::public();
        let target = ResourceIdentifier::new(target);
        let modes = AccessModes::from([AccessMode::Read]);
        let output = reader
            .read_permissions(PermissionReaderInput {
                credentials: &credentials,
                target: &target,
                modes: &modes,
                report_ancestors: true,
            })
            .await
            .unwrap();
        (
            output.permissions.any_allows(AccessMode::Read),
            output.ancestors().len(),
        )
    }

    #[test]
    fn test_parse_config() {
        let config = AuthorizationConfig::from_json(CONFIG).unwrap();
        assert_eq!(config.base_url, "http://localhost:3000/");
        assert_eq!(config.modes, ModesKind::Delegated);
        assert_eq!(config.ancestors, AncestorKind::ParentWalk);
        assert!(config.stop_at_existing_ancestor);
        assert_eq!(config.sources.len(), 2);
        assert!(matches!(config.sources[0], SourceConfig::Ancestors { .. }));
    }

    #[test]
    fn test_defaults() {
        let config = AuthorizationConfig::from_json(r#"{"baseUrl": "http://localhost:3000/"}"#).unwrap();
        assert_eq!(config, AuthorizationConfig::new("http://localhost:3000/"));
        assert_eq!(config.modes, ModesKind::Inline);
        assert_eq!(config.ancestors, AncestorKind::Reported);
    }

    #[test]
    fn test_invalid_configs() {
        let cases = [
            r#"{"baseUrl": "http://localhost:3000/", "modes": "magic"}"#,
            r#"{"baseUrl": "http://localhost:3000/", "sources": [{"type": "acl"}]}"#,
            r#"{"sources": []}"#,
        ];

        for json in cases {
            let err = AuthorizationConfig::from_json(json).unwrap_err();
            assert!(err.is_config(), "json: {}", json);
        }
    }

    #[test]
    fn test_build_reader_errors() {
        let err = AuthorizationConfig::new("http://localhost:3000/")
            .build_reader(store())
            .err()
            .unwrap();
        assert!(err.is_config());

        let err = AuthorizationConfig::new("http://localhost:3000/")
            .with_source(SourceConfig::PathBased {
                paths: vec![PathRule {
                    pattern: "(unclosed".to_string(),
                    source: SourceConfig::AllStatic { allow: true },
                }],
            })
            .build_reader(store())
            .err()
            .unwrap();
        assert!(err.is_config());

        let err = AuthorizationConfig::new("not a url")
            .with_source(SourceConfig::AllStatic { allow: true })
            .build_reader(store())
            .err()
            .unwrap();
        assert!(err.is_config());
    }

    #[tokio::test]
    async fn test_build_reader_composes_sources() {
        let config = AuthorizationConfig::new("http://localhost:3000/")
            .with_source(SourceConfig::Ancestors {
                source: Box::new(SourceConfig::PathBased {
                    paths: vec![PathRule {
                        pattern: "^/private/".to_string(),
                        source: SourceConfig::AllStatic { allow: false },
                    }],
                }),
            })
            .with_source(SourceConfig::AllStatic { allow: true });
        let reader = config.build_reader(store()).unwrap();

        assert_eq!(allows_read(reader.as_ref(), "http://localhost:3000/doc").await, (true, 1));
        assert_eq!(
            allows_read(reader.as_ref(), "http://localhost:3000/private/a/doc").await,
            (false, 3)
        );
    }

    #[tokio::test]
    async fn test_build_strategies() {
        let config = AuthorizationConfig::from_json(CONFIG).unwrap();
        assert_eq!(config.build_modes(store()).name(), "delegated");

        let resolver = config.build_resolver(store()).unwrap();
        let ancestors = resolver
            .resolve(&"http://localhost:3000/a/b".into(), &[])
            .await
            .unwrap();
        assert_eq!(ancestors, vec![ResourceIdentifier::new("http://localhost:3000/a/")]);

        let config = config.with_modes(ModesKind::Inline).with_ancestors(AncestorKind::Reported);
        assert_eq!(config.build_modes(store()).name(), "inline");
        let resolver = config.build_resolver(store()).unwrap();
        let reported = vec![ResourceIdentifier::new("http://localhost:3000/x/")];
        assert_eq!(
            resolver
                .resolve(&"http://localhost:3000/x/y".into(), &reported)
                .await
                .unwrap(),
            reported
        );
    }

    #[tokio::test]
    async fn test_load_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CONFIG.as_bytes()).unwrap();

        let config = load_config_file(file.path()).await.unwrap();
        assert_eq!(config, AuthorizationConfig::from_json(CONFIG).unwrap());

        let err = load_config_file("/nonexistent/podgate.json").await.unwrap_err();
        assert!(err.is_config());
    }
}
