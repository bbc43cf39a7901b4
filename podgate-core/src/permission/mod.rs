//! Permission model and permission sources.
//!
//! Credential groups, not identities, hold permissions. Every source answers
//! the same question ("what may each of these groups do on this target?") and
//! sources are composed by merging their answers.
//!
//! # Overview
//!
//! - **[`Permission`]**: Per-mode grant / deny / no-opinion for one group
//! - **[`PermissionSet`]**: Permission per credential group
//! - **[`PermissionReader`]**: Trait implemented by every permission source
//! - **[`AllStaticReader`]**: Grants or denies everything to everyone present
//! - **[`UnionPermissionReader`]**: Merges several sources, denial wins
//! - **[`PathBasedReader`]**: Routes lookups by target path
//! - **[`AncestorReportingReader`]**: Adds the container chain of missing targets
//!
//! # Merge rule
//!
//! | Running | Incoming | Result |
//! |---------|----------|--------|
//! | none | none | none |
//! | none | `true` | `true` |
//! | `true` | `false` | `false` |
//! | `false` | anything | `false` |
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use podgate_core::permission::{
//!     AllStaticReader, PermissionReader, PermissionReaderInput, UnionPermissionReader,
//! };
//! use podgate_core::{AccessMode, AccessModes, CredentialSet, ResourceIdentifier};
//!
//! # tokio_test::block_on(async {
//! let union = UnionPermissionReader::new(vec![
//!     Arc::new(AllStaticReader::new(true)),
//!     Arc::new(AllStaticReader::new(false)),
//! ])
//! .unwrap();
//!
//! let credentials = CredentialSet::public();
//! let target = ResourceIdentifier::new("http://localhost:3000/doc");
//! let modes = AccessModes::from([AccessMode::Read]);
//! let output = union
//!     .read_permissions(PermissionReaderInput {
//!         credentials: &credentials,
//!         target: &target,
//!         modes: &modes,
//!         report_ancestors: true,
//!     })
//!     .await
//!     .unwrap();
//!
//! // The denial wins.
//! assert!(!output.permissions.any_allows(AccessMode::Read));
//! # });
//! ```

mod ancestors;
mod model;
mod path_based;
mod reader;
mod static_reader;
mod union;

pub use ancestors::AncestorReportingReader;
pub use model::{AccessMode, AccessModes, Permission, PermissionSet};
pub use path_based::PathBasedReader;
pub use reader::{PermissionReader, PermissionReaderInput, PermissionReaderOutput};
pub use static_reader::AllStaticReader;
pub use union::UnionPermissionReader;
