//! Credentials of the requester.
//!
//! Permissions are never held by individual identities. A request qualifies
//! for one or more [`CredentialGroup`]s, and permission sources assign a
//! [`Permission`](crate::permission::Permission) per group.
//!
//! - **[`CredentialSet`]**: The groups a request qualifies for
//! - **[`CredentialsExtractor`]**: Trait for turning a request into a credential set
//! - **[`PublicCredentialsExtractor`]**: Every request is public
//! - **[`UnsecureWebIdExtractor`]**: Trusts an `Authorization: WebID <iri>` header
//! - **[`UnionCredentialsExtractor`]**: Merges several extractors

mod extractor;

pub use extractor::{
    CredentialsExtractor, PublicCredentialsExtractor, UnionCredentialsExtractor,
    UnsecureWebIdExtractor,
};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A class of requester that is granted permissions collectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialGroup {
    /// Anyone, authenticated or not.
    Public,
    /// An authenticated agent.
    Agent,
    /// The client application acting on behalf of the agent.
    Client,
}

impl std::fmt::Display for CredentialGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialGroup::Public => write!(f, "public"),
            CredentialGroup::Agent => write!(f, "agent"),
            CredentialGroup::Client => write!(f, "client"),
        }
    }
}

/// The credential backing membership in a group.
///
/// The authorization layer only cares that a credential is present; the
/// identifier is carried along for downstream handlers and logging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// WebID or client identifier, if the group has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Credential {
    /// A credential without an identifier.
    pub fn anonymous() -> Self {
        Self { id: None }
    }

    /// A credential for the given identifier.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
        }
    }
}

/// Mapping from credential group to credential.
///
/// Presence of a key means the requester qualifies for that group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialSet {
    credentials: BTreeMap<CredentialGroup, Credential>,
}

impl CredentialSet {
    /// An empty credential set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The set for an unauthenticated request.
    pub fn public() -> Self {
        Self::new().with(CredentialGroup::Public, Credential::anonymous())
    }

    /// Add a credential, builder style.
    pub fn with(mut self, group: CredentialGroup, credential: Credential) -> Self {
        self.insert(group, credential);
        self
    }

    /// Add or replace the credential for a group.
    pub fn insert(&mut self, group: CredentialGroup, credential: Credential) {
        self.credentials.insert(group, credential);
    }

    /// Whether the requester qualifies for `group`.
    pub fn contains(&self, group: CredentialGroup) -> bool {
        self.credentials.contains_key(&group)
    }

    /// The credential for `group`, if present.
    pub fn get(&self, group: CredentialGroup) -> Option<&Credential> {
        self.credentials.get(&group)
    }

    /// The groups the requester qualifies for, in a stable order.
    pub fn groups(&self) -> impl Iterator<Item = CredentialGroup> + '_ {
        self.credentials.keys().copied()
    }

    /// Iterate over `(group, credential)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (CredentialGroup, &Credential)> {
        self.credentials.iter().map(|(g, c)| (*g, c))
    }

    /// Whether the requester is authenticated as an agent.
    pub fn is_authenticated(&self) -> bool {
        self.contains(CredentialGroup::Agent)
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    /// Merge `other` into this set. Entries of `other` win.
    pub fn extend(&mut self, other: CredentialSet) {
        self.credentials.extend(other.credentials);
    }
}

impl FromIterator<(CredentialGroup, Credential)> for CredentialSet {
    fn from_iter<I: IntoIterator<Item = (CredentialGroup, Credential)>>(iter: I) -> Self {
        Self {
            credentials: iter.into_iter().collect(),
        }
    }
}
