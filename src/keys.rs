// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Provenance Vault

//! Device key codec and namespace derivation.
//!
//! A device key is an opaque secret byte sequence; possession of it is the
//! only capability needed to read or write a device's data. Keys travel in
//! URLs as unpadded URL-safe base64 and are held in memory only for the
//! duration of a request.
//!
//! The device id is a 64-bit FNV-1 hash of the raw key bytes. It partitions
//! the object store, nothing more: it is not a secret and collisions are
//! accepted as negligible rather than cryptographically defended. Callers
//! rely on it being identical for the same key across processes and versions,
//! so the constants below must never change.

use base64ct::{Base64UrlUnpadded, Encoding};
use thiserror::Error;

/// 64-bit FNV-1 offset basis.
const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

/// 64-bit FNV-1 prime.
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Error for a device key that cannot be decoded from its text form.
#[derive(Debug, Error)]
#[error("malformed device key encoding")]
pub struct KeyDecodeError;

/// A device's secret key.
///
/// Never serialized or persisted by this crate; `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct DeviceKey(Vec<u8>);

impl DeviceKey {
    /// Wrap raw key bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Decode a key from its URL-safe unpadded base64 text form.
    pub fn from_encoded(text: &str) -> Result<Self, KeyDecodeError> {
        let bytes = Base64UrlUnpadded::decode_vec(text).map_err(|_| KeyDecodeError)?;
        Ok(Self(bytes))
    }

    /// Encode the key for use in URLs and identifiers.
    ///
    /// `DeviceKey::from_encoded(&key.encoded())` round-trips for all keys.
    pub fn encoded(&self) -> String {
        Base64UrlUnpadded::encode_string(&self.0)
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Derive the storage namespace id for this key.
    ///
    /// FNV-1 (multiply then XOR), wrapping 64-bit arithmetic. Deterministic
    /// and stable: previously written data is located through this value.
    pub fn device_id(&self) -> u64 {
        let mut hash = FNV_OFFSET_BASIS;
        for &byte in &self.0 {
            hash = hash.wrapping_mul(FNV_PRIME);
            hash ^= byte as u64;
        }
        hash
    }
}

impl std::fmt::Debug for DeviceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DeviceKey(<{} bytes redacted>)", self.0.len())
    }
}
