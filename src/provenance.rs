// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Provenance Vault

//! # Provenance Service
//!
//! Composes the key codec, cipher, content hasher, and object store into the
//! storage protocol:
//!
//! - every payload is encrypted under the caller's device key with a fresh
//!   random salt, then stored under the SHA-256 of its *ciphertext*
//! - object metadata carries the salt, the plaintext hash, and the content
//!   type; reads decrypt with the metadata salt and re-verify the plaintext
//!   hash before returning anything
//! - records are opaque JSON objects; the service appends one reserved
//!   `attachments` field listing the ids of the attachments uploaded with
//!   them
//!
//! Objects are write-once. Re-uploading identical payload + key produces a
//! new object under a new name (the salt differs), never an overwrite, so
//! every upload is additive. If storing a record fails partway through, the
//! attachments already written stay behind as orphans; there is no
//! compensating deletion.

use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::crypto;
use crate::keys::{DeviceKey, KeyDecodeError};
use crate::store::{ObjectClass, ObjectMetadata, ObjectStore, StoreError};

/// Reserved field appended to every stored record.
pub const ATTACHMENTS_FIELD: &str = "attachments";

/// Content type recorded for serialized records.
const RECORD_CONTENT_TYPE: &str = "application/json";

/// Content type assumed when an object's metadata does not record one.
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Error taxonomy of the storage protocol.
///
/// All variants are surfaced to the caller undecorated; no operation
/// recovers, retries, or substitutes default data for unverifiable data.
#[derive(Debug, Error)]
pub enum ProvenanceError {
    /// The device key text form could not be decoded.
    #[error(transparent)]
    KeyDecode(#[from] KeyDecodeError),
    /// Object metadata lacks the salt needed for decryption. The object was
    /// written by an incompatible process or its metadata was corrupted.
    #[error("object {0} has no usable salt metadata")]
    MissingSalt(String),
    /// Wrong key or corrupted ciphertext.
    #[error("object {0} could not be decrypted")]
    Decryption(String),
    /// Decrypted plaintext does not match the recorded hash: tampering or
    /// corruption.
    #[error("object {0} failed integrity verification")]
    Integrity(String),
    /// Namespace, record, or attachment absent.
    #[error("not found: {0}")]
    NotFound(String),
    /// A stored record's plaintext is not valid JSON.
    #[error("stored record could not be parsed: {0}")]
    RecordParse(#[from] serde_json::Error),
    /// Failure in the underlying object store.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for provenance operations.
pub type ProvenanceResult<T> = Result<T, ProvenanceError>;

/// A decrypted, verified object and its recorded content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Identifiers returned by [`ProvenanceService::store_provenance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredProvenance {
    /// Content hash (hex) of the encrypted record.
    pub record_id: String,
    /// Content hashes (hex) of the encrypted attachments, in input order.
    pub attachment_ids: Vec<String>,
}

/// Stateless service over an injected object store.
///
/// Constructed once at the process entry point; every operation derives all
/// per-device state from the device key passed into it.
pub struct ProvenanceService {
    store: Arc<dyn ObjectStore>,
}

impl ProvenanceService {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    fn object_name(device_id: u64, class: ObjectClass, hash: &str) -> String {
        format!("{device_id}/{}/{hash}", class.segment())
    }

    /// Encrypt and persist one payload; returns its content-addressed id.
    ///
    /// The id is the hex SHA-256 of the *encrypted* bytes. Callers must
    /// record it (records embed their attachment ids) or the object becomes
    /// undiscoverable.
    pub fn upload(
        &self,
        key: &DeviceKey,
        payload: &[u8],
        class: ObjectClass,
        content_type: &str,
    ) -> ProvenanceResult<String> {
        let device_id = key.device_id();
        let (salt, ciphertext) = crypto::encrypt(key.as_bytes(), payload);
        let hash = crypto::digest_hex(&ciphertext);
        let name = Self::object_name(device_id, class, &hash);

        let metadata = ObjectMetadata {
            content_type: Some(content_type.to_string()),
            plain_hash: Some(crypto::digest_hex(payload)),
            salt: Some(hex::encode(salt)),
        };
        self.store.put(&name, &ciphertext, &metadata)?;

        tracing::debug!(
            device_id,
            class = class.segment(),
            hash,
            plain_len = payload.len(),
            cipher_len = ciphertext.len(),
            "stored object"
        );
        Ok(hash)
    }

    /// Read, decrypt, and verify one object by name.
    ///
    /// A missing salt is fatal. A missing plaintext hash skips verification
    /// (fail-open tolerance for objects written before hashes were recorded)
    /// but is logged; a present hash must match or the read fails.
    pub fn fetch_and_verify(&self, key: &DeviceKey, name: &str) -> ProvenanceResult<FetchedObject> {
        let metadata = match self.store.metadata(name) {
            Ok(metadata) => metadata,
            Err(StoreError::NotFound(n)) => return Err(ProvenanceError::NotFound(n)),
            Err(e) => return Err(e.into()),
        };

        let salt = metadata
            .salt
            .as_deref()
            .and_then(|s| hex::decode(s).ok())
            .ok_or_else(|| ProvenanceError::MissingSalt(name.to_string()))?;

        let ciphertext = match self.store.get(name) {
            Ok(bytes) => bytes,
            Err(StoreError::NotFound(n)) => return Err(ProvenanceError::NotFound(n)),
            Err(e) => return Err(e.into()),
        };

        let plaintext = crypto::decrypt(key.as_bytes(), &salt, &ciphertext)
            .map_err(|_| ProvenanceError::Decryption(name.to_string()))?;

        match metadata.plain_hash.as_deref() {
            Some(expected) => {
                if crypto::digest_hex(&plaintext) != expected {
                    return Err(ProvenanceError::Integrity(name.to_string()));
                }
            }
            None => {
                tracing::warn!(name, "object has no plaintext hash; integrity not verified");
            }
        }

        Ok(FetchedObject {
            bytes: plaintext,
            content_type: metadata
                .content_type
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
        })
    }

    /// Store a record and its attachments.
    ///
    /// Attachments are uploaded first, in input order; the record upload is
    /// strictly sequenced after all of them so its payload can embed their
    /// ids. An attachment failure aborts the whole operation, leaving any
    /// already-written attachments behind.
    pub fn store_provenance(
        &self,
        key: &DeviceKey,
        record: Map<String, Value>,
        attachments: &[(Vec<u8>, String)],
    ) -> ProvenanceResult<StoredProvenance> {
        let mut attachment_ids = Vec::with_capacity(attachments.len());
        for (bytes, content_type) in attachments {
            attachment_ids.push(self.upload(key, bytes, ObjectClass::Attachment, content_type)?);
        }

        let mut record = record;
        record.insert(
            ATTACHMENTS_FIELD.to_string(),
            Value::Array(attachment_ids.iter().cloned().map(Value::String).collect()),
        );
        let payload = serde_json::to_vec(&Value::Object(record))?;

        let record_id = self.upload(key, &payload, ObjectClass::Record, RECORD_CONTENT_TYPE)?;
        tracing::debug!(
            record_id,
            attachment_count = attachment_ids.len(),
            "stored provenance record"
        );
        Ok(StoredProvenance {
            record_id,
            attachment_ids,
        })
    }

    /// Decode every record stored for this device.
    ///
    /// Order is whatever the store returns for the namespace listing. A
    /// device namespace that was never written yields an empty vec.
    pub fn list_records(&self, key: &DeviceKey) -> ProvenanceResult<Vec<Value>> {
        let prefix = format!("{}/{}/", key.device_id(), ObjectClass::Record.segment());
        let names = self.store.list(&prefix)?;

        let mut records = Vec::with_capacity(names.len());
        for name in names {
            let fetched = self.fetch_and_verify(key, &name)?;
            records.push(serde_json::from_slice(&fetched.bytes)?);
        }
        Ok(records)
    }

    /// Fetch one attachment by the id returned at upload time.
    pub fn fetch_attachment(
        &self,
        key: &DeviceKey,
        attachment_id: &str,
    ) -> ProvenanceResult<FetchedObject> {
        // Ids are hex content hashes; anything else can never name a stored
        // object and must not reach the store as a path fragment.
        if attachment_id.is_empty() || !attachment_id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ProvenanceError::NotFound(attachment_id.to_string()));
        }
        let name = Self::object_name(key.device_id(), ObjectClass::Attachment, attachment_id);
        if !self.store.exists(&name) {
            return Err(ProvenanceError::NotFound(attachment_id.to_string()));
        }
        self.fetch_and_verify(key, &name)
    }
}
