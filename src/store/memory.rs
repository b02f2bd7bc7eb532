// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Provenance Vault

//! In-memory object store, used as a test double.
//!
//! Thread-safe via `RwLock`. Not persistent; contents are lost on drop.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{ObjectMetadata, ObjectStore, StoreError, StoreResult};

#[derive(Debug, Clone)]
struct StoredObject {
    data: Vec<u8>,
    metadata: ObjectMetadata,
}

/// In-memory [`ObjectStore`] for unit tests.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace the bytes of a stored object, bypassing the normal write
    /// path. Only exists so tests can simulate corruption in the store.
    #[cfg(test)]
    pub fn corrupt(&self, name: &str, mutate: impl FnOnce(&mut Vec<u8>)) {
        let mut objects = self.objects.write().unwrap();
        if let Some(object) = objects.get_mut(name) {
            mutate(&mut object.data);
        }
    }

    /// Replace the metadata of a stored object. Test-only, see [`corrupt`].
    ///
    /// [`corrupt`]: MemoryObjectStore::corrupt
    #[cfg(test)]
    pub fn rewrite_metadata(&self, name: &str, metadata: ObjectMetadata) {
        let mut objects = self.objects.write().unwrap();
        if let Some(object) = objects.get_mut(name) {
            object.metadata = metadata;
        }
    }
}

impl ObjectStore for MemoryObjectStore {
    fn put(&self, name: &str, data: &[u8], metadata: &ObjectMetadata) -> StoreResult<()> {
        self.objects.write().unwrap().insert(
            name.to_string(),
            StoredObject {
                data: data.to_vec(),
                metadata: metadata.clone(),
            },
        );
        Ok(())
    }

    fn get(&self, name: &str) -> StoreResult<Vec<u8>> {
        self.objects
            .read()
            .unwrap()
            .get(name)
            .map(|object| object.data.clone())
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    fn metadata(&self, name: &str) -> StoreResult<ObjectMetadata> {
        self.objects
            .read()
            .unwrap()
            .get(name)
            .map(|object| object.metadata.clone())
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    fn list(&self, prefix: &str) -> StoreResult<Vec<String>> {
        Ok(self
            .objects
            .read()
            .unwrap()
            .keys()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn exists(&self, name: &str) -> bool {
        self.objects.read().unwrap().contains_key(name)
    }
}
