//! In-memory pod with authorization.
//!
//! Resources only exist as identifiers; PUT, PATCH and POST create them and
//! DELETE removes them. Requests are authenticated with the unverified
//! `Authorization: WebID <iri>` header.
//!
//! Run with:
//! ```sh
//! cargo run -p podgate-server --example memory_pod [config.json]
//! ```
//!
//! Without a config file `/public/` is writable by everyone and everything
//! else requires a WebID.
//!
//! Test with curl:
//! ```sh
//! curl -X PUT http://localhost:3000/public/notes/today -d 'hello'
//! curl -X PUT http://localhost:3000/private/doc -d 'hello'
//! curl -X PUT http://localhost:3000/private/doc -d 'hello' \
//!   -H "Authorization: WebID https://alice.example/profile#me"
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{Method, StatusCode};
use podgate_core::config::{AncestorKind, ModesKind, PathRule};
use podgate_core::credentials::{
    PublicCredentialsExtractor, UnionCredentialsExtractor, UnsecureWebIdExtractor,
};
use podgate_core::{
    load_config_file, AuthorizationConfig, AuthorizationEvent, AuthorizedOperation,
    AuthorizingHandler, MemoryResourceSet, OperationHandler, ResourceIdentifier, ResourceSet,
    SourceConfig,
};
use podgate_server::PodRouter;
use tower_http::cors::CorsLayer;

const BASE_URL: &str = "http://localhost:3000/";

struct MemoryPod {
    store: Arc<MemoryResourceSet>,
}

#[async_trait]
impl OperationHandler for MemoryPod {
    type Output = (StatusCode, String);

    async fn handle(&self, input: AuthorizedOperation) -> podgate_core::Result<Self::Output> {
        let target = input.operation.target;
        let output = match input.operation.method {
            Method::PUT | Method::PATCH | Method::POST => {
                let status = if self.store.add(target.clone()) {
                    StatusCode::CREATED
                } else {
                    StatusCode::NO_CONTENT
                };
                (status, String::new())
            }
            Method::DELETE => {
                if self.store.remove(&target) {
                    (StatusCode::NO_CONTENT, String::new())
                } else {
                    (StatusCode::NOT_FOUND, format!("{} not found\n", target))
                }
            }
            _ => {
                if self.store.has_resource(&target).await? {
                    (StatusCode::OK, format!("{}\n", target))
                } else {
                    (StatusCode::NOT_FOUND, format!("{} not found\n", target))
                }
            }
        };
        Ok(output)
    }
}

fn default_config() -> AuthorizationConfig {
    let rule = |pattern: &str, source: SourceConfig| PathRule {
        pattern: pattern.to_string(),
        source,
    };

    AuthorizationConfig::new(BASE_URL)
        .with_modes(ModesKind::Delegated)
        .with_ancestors(AncestorKind::ParentWalk)
        .with_source(SourceConfig::PathBased {
            paths: vec![
                rule("^/public/", SourceConfig::AllStatic { allow: true }),
                rule("^/$", SourceConfig::AllStatic { allow: false }),
            ],
        })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => load_config_file(path).await?,
        None => default_config(),
    };
    let base_url = config.base_url.clone();

    let root = config.identifier_strategy()?;
    let store = Arc::new(MemoryResourceSet::with_resources([
        root.root(),
        ResourceIdentifier::new(format!("{}public/", root.base_url())),
    ]));
    let shared_store: Arc<dyn ResourceSet> = store.clone();

    let handler = AuthorizingHandler::builder()
        .with_credentials_extractor(
            UnionCredentialsExtractor::new()
                .with_extractor(PublicCredentialsExtractor)
                .with_extractor(UnsecureWebIdExtractor),
        )
        .with_config(config)
        .with_store(shared_store)
        .with_hook(|event: &AuthorizationEvent| match event {
            AuthorizationEvent::AuthorizationFailed { target, error, .. } => {
                println!("denied {}: {}", target, error);
            }
            AuthorizationEvent::Delegated { target, .. } => println!("allowed {}", target),
            _ => {}
        })
        .with_handler(MemoryPod { store })
        .build()?;

    let app = PodRouter::new(handler, base_url.as_str())
        .with_cors(CorsLayer::permissive())
        .build()?;

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    println!("Pod running at {}", root.base_url());

    axum::serve(listener, app).await?;

    Ok(())
}
