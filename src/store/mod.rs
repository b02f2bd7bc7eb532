// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Provenance Vault

//! # Object Store Adapter
//!
//! Thin put/get/list/exists operations against a durable blob store with
//! per-object key-value metadata. The provenance service addresses objects
//! by name:
//!
//! ```text
//! {device_id}/{attach|prov}/{sha256-hex-of-ciphertext}
//! ```
//!
//! Objects are written exactly once and never mutated or deleted by this
//! crate. Two backends are provided:
//!
//! - [`FsObjectStore`] — durable, filesystem-backed; metadata lives in a
//!   `<name>.meta.json` sidecar next to each blob
//! - [`MemoryObjectStore`] — in-memory double for tests

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod fs;
pub mod memory;

pub use fs::FsObjectStore;
pub use memory::MemoryObjectStore;

/// Error type for object store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The named object does not exist.
    #[error("object not found: {0}")]
    NotFound(String),
    /// I/O failure in the underlying store.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Object metadata could not be read or written.
    #[error("object metadata error: {0}")]
    Metadata(String),
}

/// Result type for object store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Which kind of object a name refers to. Determines the middle path
/// segment of the storage name and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectClass {
    /// Binary attachment referenced by a provenance record.
    Attachment,
    /// Serialized provenance record.
    Record,
}

impl ObjectClass {
    /// Storage path segment for this class.
    pub fn segment(self) -> &'static str {
        match self {
            ObjectClass::Attachment => "attach",
            ObjectClass::Record => "prov",
        }
    }
}

/// Key-value metadata stored alongside each object.
///
/// All fields are optional at this layer; the provenance service decides
/// which absences are fatal (a missing salt is, a missing plaintext hash
/// is tolerated).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMetadata {
    /// MIME type of the decrypted payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Hex SHA-256 of the decrypted payload, for integrity verification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plain_hash: Option<String>,
    /// Hex-encoded 16-byte salt used to encrypt the payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,
}

/// Durable blob storage with per-object metadata.
///
/// Implementations are synchronous; callers on async executors accept the
/// blocking I/O the same way the repository layer of a typical service does.
pub trait ObjectStore: Send + Sync {
    /// Store `data` under `name` with its metadata.
    ///
    /// Names are content-derived, so writing an existing name again stores
    /// the same bytes; implementations may treat it as a no-op overwrite.
    fn put(&self, name: &str, data: &[u8], metadata: &ObjectMetadata) -> StoreResult<()>;

    /// Fetch the bytes stored under `name`.
    ///
    /// Returns [`StoreError::NotFound`] if the object does not exist.
    fn get(&self, name: &str) -> StoreResult<Vec<u8>>;

    /// Fetch the metadata stored under `name`.
    ///
    /// Returns [`StoreError::NotFound`] if the object does not exist.
    fn metadata(&self, name: &str) -> StoreResult<ObjectMetadata>;

    /// List the names of all objects whose name starts with `prefix`.
    ///
    /// A prefix under which nothing was ever written yields an empty list,
    /// not an error. Order is unspecified.
    fn list(&self, prefix: &str) -> StoreResult<Vec<String>>;

    /// Whether an object named `name` exists.
    fn exists(&self, name: &str) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_segments_match_storage_layout() {
        assert_eq!(ObjectClass::Attachment.segment(), "attach");
        assert_eq!(ObjectClass::Record.segment(), "prov");
    }

    #[test]
    fn metadata_serializes_without_absent_fields() {
        let meta = ObjectMetadata {
            content_type: Some("image/png".into()),
            plain_hash: None,
            salt: None,
        };
        let json = serde_json::to_string(&meta).unwrap();
        assert_eq!(json, r#"{"content_type":"image/png"}"#);

        let back: ObjectMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(back, meta);
    }
}
