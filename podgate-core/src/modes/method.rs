use async_trait::async_trait;
use http::Method;
use std::sync::Arc;

use super::patch::patch_deletes;
use super::ModesExtractor;
use crate::error::{Error, Result};
use crate::operation::Operation;
use crate::permission::{AccessMode, AccessModes};
use crate::store::ResourceSet;

fn patch_modes(operation: &Operation) -> AccessModes {
    let body = operation.body.as_deref().unwrap_or_default();
    let media_type = operation.media_type();
    if patch_deletes(media_type.as_deref(), body) {
        AccessModes::from([AccessMode::Append, AccessMode::Write])
    } else {
        AccessModes::from([AccessMode::Append])
    }
}

fn unsupported(method: &Method) -> Error {
    Error::UnsupportedMethod(method.to_string())
}

/// Maps methods to modes with a fixed table and no store lookups.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineModesExtractor;

impl InlineModesExtractor {
    /// The modes for `operation`, computed synchronously.
    pub fn modes_for(&self, operation: &Operation) -> Result<AccessModes> {
        let modes = match operation.method {
            Method::GET | Method::HEAD | Method::OPTIONS => AccessModes::from([AccessMode::Read]),
            Method::PUT => AccessModes::from([AccessMode::Append, AccessMode::Write]),
            Method::PATCH => patch_modes(operation),
            Method::POST => AccessModes::from([AccessMode::Append]),
            Method::DELETE => AccessModes::from([AccessMode::Write]),
            ref other => return Err(unsupported(other)),
        };
        Ok(modes)
    }
}

#[async_trait]
impl ModesExtractor for InlineModesExtractor {
    async fn extract_modes(&self, operation: &Operation) -> Result<AccessModes> {
        self.modes_for(operation)
    }
}

/// Method-based extractor that also asks the store whether the target exists.
///
/// Writes to a missing target additionally require `create`, and removal
/// requires `delete` instead of `write`.
#[derive(Clone)]
pub struct MethodModesExtractor {
    store: Arc<dyn ResourceSet>,
}

impl MethodModesExtractor {
    pub fn new(store: Arc<dyn ResourceSet>) -> Self {
        Self { store }
    }

    async fn with_create_if_missing(
        &self,
        operation: &Operation,
        mut modes: AccessModes,
    ) -> Result<AccessModes> {
        if !self.store.has_resource(&operation.target).await? {
            modes.insert(AccessMode::Create);
        }
        Ok(modes)
    }
}

#[async_trait]
impl ModesExtractor for MethodModesExtractor {
    async fn extract_modes(&self, operation: &Operation) -> Result<AccessModes> {
        match operation.method {
            Method::GET | Method::HEAD | Method::OPTIONS => Ok(AccessModes::from([AccessMode::Read])),
            Method::PUT => {
                let modes = AccessModes::from([AccessMode::Append, AccessMode::Write]);
                self.with_create_if_missing(operation, modes).await
            }
            Method::PATCH => {
                self.with_create_if_missing(operation, patch_modes(operation))
                    .await
            }
            Method::POST => Ok(AccessModes::from([AccessMode::Append])),
            Method::DELETE => Ok(AccessModes::from([AccessMode::Delete])),
            ref other => Err(unsupported(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::ModesStrategy;
    use crate::store::MemoryResourceSet;

    const DOC: &str = "http://localhost:3000/doc";

    fn modes(list: &[AccessMode]) -> AccessModes {
        list.iter().copied().collect()
    }

    #[test]
    fn test_inline_table() {
        use AccessMode::*;

        let cases = [
            (Method::GET, modes(&[Read])),
            (Method::HEAD, modes(&[Read])),
            (Method::OPTIONS, modes(&[Read])),
            (Method::PUT, modes(&[Append, Write])),
            (Method::PATCH, modes(&[Append])),
            (Method::POST, modes(&[Append])),
            (Method::DELETE, modes(&[Write])),
        ];

        for (method, expected) in cases {
            let operation = Operation::new(method.clone(), DOC);
            assert_eq!(
                InlineModesExtractor.modes_for(&operation).unwrap(),
                expected,
                "method: {}",
                method
            );
        }
    }

    #[test]
    fn test_inline_patch_with_deletion() {
        let operation = Operation::new(Method::PATCH, DOC)
            .with_body("application/sparql-update", "DELETE DATA { <a> <b> <c> }");
        assert_eq!(
            InlineModesExtractor.modes_for(&operation).unwrap(),
            modes(&[AccessMode::Append, AccessMode::Write])
        );

        let operation = Operation::new(Method::PATCH, DOC)
            .with_body("application/sparql-update", "INSERT DATA { <a> <b> \"DELETE\" }");
        assert_eq!(
            InlineModesExtractor.modes_for(&operation).unwrap(),
            modes(&[AccessMode::Append])
        );
    }

    #[test]
    fn test_inline_unknown_method() {
        let method = Method::from_bytes(b"PROPFIND").unwrap();
        let err = InlineModesExtractor
            .modes_for(&Operation::new(method, DOC))
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedMethod(ref m) if m == "PROPFIND"));
    }

    #[tokio::test]
    async fn test_method_extractor_adds_create_for_missing_target() {
        use AccessMode::*;

        let extractor = MethodModesExtractor::new(Arc::new(MemoryResourceSet::new()));

        let cases = [
            (Method::GET, modes(&[Read])),
            (Method::PUT, modes(&[Append, Write, Create])),
            (Method::PATCH, modes(&[Append, Create])),
            (Method::POST, modes(&[Append])),
            (Method::DELETE, modes(&[Delete])),
        ];

        for (method, expected) in cases {
            let operation = Operation::new(method.clone(), DOC);
            assert_eq!(
                extractor.extract_modes(&operation).await.unwrap(),
                expected,
                "method: {}",
                method
            );
        }
    }

    #[tokio::test]
    async fn test_method_extractor_existing_target() {
        use AccessMode::*;

        let store = MemoryResourceSet::with_resources([DOC]);
        let extractor = MethodModesExtractor::new(Arc::new(store));

        let put = Operation::new(Method::PUT, DOC);
        assert_eq!(
            extractor.extract_modes(&put).await.unwrap(),
            modes(&[Append, Write])
        );

        let patch = Operation::new(Method::PATCH, DOC).with_body(
            "text/n3",
            "@prefix solid: <http://www.w3.org/ns/solid/terms#>. _:p solid:deletes { <#a> <#b> <#c>. }.",
        );
        assert_eq!(
            extractor.extract_modes(&patch).await.unwrap(),
            modes(&[Append, Write])
        );
    }

    #[tokio::test]
    async fn test_strategy_dispatch() {
        let strategy = ModesStrategy::delegated(MethodModesExtractor::new(
            Arc::new(MemoryResourceSet::new()),
        ));
        let delete = Operation::new(Method::DELETE, DOC);
        assert_eq!(
            strategy.extract_modes(&delete).await.unwrap(),
            modes(&[AccessMode::Delete])
        );
        assert_eq!(
            ModesStrategy::Inline
                .extract_modes(&delete)
                .await
                .unwrap(),
            modes(&[AccessMode::Write])
        );
    }
}
