//! Credential extraction from incoming requests.

use async_trait::async_trait;
use http::header::AUTHORIZATION;
use http::request::Parts;
use std::sync::Arc;

use super::{Credential, CredentialGroup, CredentialSet};

/// Turns a request into the set of credential groups it qualifies for.
///
/// Extraction never fails: a request that cannot be authenticated simply
/// yields fewer groups (possibly none).
#[async_trait]
pub trait CredentialsExtractor: Send + Sync {
    /// Extract the credentials of the request.
    async fn extract_credentials(&self, request: &Parts) -> CredentialSet;
}

/// Marks every request as public.
#[derive(Debug, Clone, Copy, Default)]
pub struct PublicCredentialsExtractor;

#[async_trait]
impl CredentialsExtractor for PublicCredentialsExtractor {
    async fn extract_credentials(&self, _request: &Parts) -> CredentialSet {
        CredentialSet::public()
    }
}

/// Trusts the WebID in an `Authorization: WebID <iri>` header.
///
/// Nothing is verified. Only use this for development and testing.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsecureWebIdExtractor;

impl UnsecureWebIdExtractor {
    const SCHEME: &'static str = "webid";

    fn parse_header(value: &str) -> Option<&str> {
        let (scheme, web_id) = value.trim().split_once(char::is_whitespace)?;
        if !scheme.eq_ignore_ascii_case(Self::SCHEME) {
            return None;
        }
        let web_id = web_id.trim();
        (!web_id.is_empty()).then_some(web_id)
    }
}

#[async_trait]
impl CredentialsExtractor for UnsecureWebIdExtractor {
    async fn extract_credentials(&self, request: &Parts) -> CredentialSet {
        let web_id = request
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(Self::parse_header);

        match web_id {
            Some(web_id) => {
                log::debug!("Extracted unverified WebID {}", web_id);
                CredentialSet::new().with(CredentialGroup::Agent, Credential::with_id(web_id))
            }
            None => CredentialSet::new(),
        }
    }
}

/// Runs several extractors and merges their results.
///
/// Extractors run in list order; when two produce the same group the later
/// one wins.
#[derive(Clone, Default)]
pub struct UnionCredentialsExtractor {
    extractors: Vec<Arc<dyn CredentialsExtractor>>,
}

impl UnionCredentialsExtractor {
    /// Create an empty union. With no extractors it yields empty sets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an extractor to the end of the list.
    pub fn with_extractor(mut self, extractor: impl CredentialsExtractor + 'static) -> Self {
        self.extractors.push(Arc::new(extractor));
        self
    }
}

#[async_trait]
impl CredentialsExtractor for UnionCredentialsExtractor {
    async fn extract_credentials(&self, request: &Parts) -> CredentialSet {
        let mut credentials = CredentialSet::new();
        for extractor in &self.extractors {
            credentials.extend(extractor.extract_credentials(request).await);
        }
        credentials
    }
}
